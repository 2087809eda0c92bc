//! Melting container heated from outside.
//!
//! The crucible has no fuel of its own. A heat source sets its target through
//! [`HeatConsumer::receive_heat`]; the target holds for a few stability ticks
//! and then decays towards 0 °C, so a crucible taken off the fire cools down.
//! Solid material melts into the mixture only at or above its melt
//! temperature, and the mixture can be poured only while it is molten.

use serde::{Deserialize, Serialize};
use smeltery_core::catalog::Catalog;
use smeltery_core::id::ComponentId;
use smeltery_core::mixture::{Action, Extracted, Mixture};
use smeltery_core::validation::ConfigError;
use smeltery_core::Ticks;
use smeltery_heat::heat::{adjust_towards, passive_cooling};
use smeltery_heat::{HeatEvent, TemperatureController};

use crate::config::CrucibleConfig;
use crate::consumer::HeatConsumer;
use crate::error::DeviceError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crucible {
    mixture: Mixture,
    controller: TemperatureController,
    target: f64,
    stability_ticks: u32,
    max_stability_ticks: u32,
}

impl Crucible {
    pub fn new(config: &CrucibleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            mixture: Mixture::new(config.capacity),
            controller: TemperatureController::from_config(&config.controller)?,
            target: 0.0,
            stability_ticks: 0,
            max_stability_ticks: config.stability_ticks,
        })
    }

    pub fn mixture(&self) -> &Mixture {
        &self.mixture
    }

    pub fn target_temperature(&self) -> f64 {
        self.target
    }

    /// Ticks left before the current target starts to decay.
    pub fn stability_ticks(&self) -> u32 {
        self.stability_ticks
    }

    /// Melt temperature of whatever the contents currently resolve to.
    pub fn melt_temperature(&self, catalog: &Catalog) -> f64 {
        let identity = self.mixture.resolve(catalog);
        catalog
            .melt_temperature(identity)
            .or_else(|| catalog.melt_temperature(ComponentId::UNKNOWN))
            .unwrap_or(0.0)
    }

    /// Returns `true` if the contents are hot enough to pour.
    pub fn is_molten(&self, catalog: &Catalog) -> bool {
        !self.mixture.is_empty() && self.controller.current() > self.melt_temperature(catalog)
    }

    /// Melt `amount` of solid `component` into the mixture. Returns the
    /// amount accepted, which may be clamped by capacity.
    pub fn melt(
        &mut self,
        component: ComponentId,
        amount: f64,
        catalog: &Catalog,
    ) -> Result<f64, DeviceError> {
        let melt_temperature = catalog
            .melt_temperature(component)
            .ok_or(DeviceError::UnknownComponent(component))?;
        let temperature = self.controller.current();
        if temperature < melt_temperature {
            return Err(DeviceError::TooCold {
                component,
                temperature,
                melt_temperature,
            });
        }
        Ok(self.mixture.add(component, amount))
    }

    /// Pour an already molten mixture in. Returns the amount accepted; on
    /// overflow the accepted part keeps the ratios of `other`.
    pub fn fill(&mut self, other: &Mixture) -> f64 {
        self.mixture.merge(other)
    }

    /// Pour up to `amount` out. Fails while the contents are not molten.
    pub fn pour(
        &mut self,
        amount: f64,
        action: Action,
        catalog: &Catalog,
    ) -> Result<Extracted, DeviceError> {
        if !self.mixture.is_empty() && !self.is_molten(catalog) {
            return Err(DeviceError::NotMolten {
                temperature: self.controller.current(),
                melt_temperature: self.melt_temperature(catalog),
            });
        }
        Ok(self.mixture.extract(amount, action, catalog))
    }

    pub fn tick(&mut self) -> Vec<HeatEvent> {
        let was_hot = self.controller.current() > 0.0;
        self.controller.tick(self.target, false);

        if self.stability_ticks > 0 {
            self.stability_ticks -= 1;
        } else if self.target > 0.0 {
            self.target = adjust_towards(self.target, 0.0, 0.0, self.controller.cooling_rate());
        }

        if was_hot && self.controller.current() == 0.0 {
            vec![HeatEvent::CooledDown]
        } else {
            Vec::new()
        }
    }

    /// Cool across a time skip with no heat supplied.
    pub fn catch_up(&mut self, ticks: Ticks) -> Vec<HeatEvent> {
        let was_hot = self.controller.current() > 0.0;
        let skipped = ticks.saturating_sub(u64::from(self.stability_ticks));
        self.stability_ticks = self.stability_ticks.saturating_sub(ticks.min(u64::from(u32::MAX)) as u32);
        // The held target cools like an object of unit heat capacity.
        self.target = passive_cooling(self.target, 1.0, skipped, self.controller.cooling_rate());
        self.controller.advance(self.target, ticks);
        if was_hot && self.controller.current() == 0.0 {
            vec![HeatEvent::CooledDown]
        } else {
            Vec::new()
        }
    }
}

impl HeatConsumer for Crucible {
    fn temperature(&self) -> f64 {
        self.controller.current()
    }

    fn receive_heat(&mut self, temperature: f64) {
        if temperature >= self.target {
            self.target = temperature;
            self.stability_ticks = self.max_stability_ticks;
        }
    }
}
