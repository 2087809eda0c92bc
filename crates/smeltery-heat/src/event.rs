use serde::{Deserialize, Serialize};

/// Events emitted by heat sources and consumers.
///
/// Events fire only on transitions, never every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HeatEvent {
    /// An unlit burner took its first charge.
    Ignited { burn_temperature: f64 },
    /// The active charge ran out and the next one was pulled.
    ChargeConsumed { burn_temperature: f64 },
    /// The last charge ran out with nothing queued behind it.
    Extinguished,
    /// The device temperature returned to 0 °C.
    CooledDown,
}
