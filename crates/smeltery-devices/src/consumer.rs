/// A device that is heated by a neighbouring heat source.
pub trait HeatConsumer {
    fn temperature(&self) -> f64;

    /// Offer heat at `temperature`. Called once per tick by each linked
    /// source that is warm.
    fn receive_heat(&mut self, temperature: f64);
}
