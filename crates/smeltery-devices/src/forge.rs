//! Solid-fuel forge: the heat source of a workshop.
//!
//! Per tick the forge burns fuel (twice as fast while boosted or rained on),
//! loses one tick of air, then moves its temperature towards
//! [`target_device_temperature`] of the burning charge. An unlit forge keeps
//! cooling until it reaches 0 °C.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use smeltery_core::Ticks;
use smeltery_core::validation::ConfigError;
use smeltery_heat::heat::target_device_temperature;
use smeltery_heat::{Boost, Environment, FuelBurner, FuelCharge, HeatEvent, TemperatureController};

use crate::config::ForgeConfig;
use crate::error::DeviceError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forge {
    fuel: VecDeque<FuelCharge>,
    fuel_slots: usize,
    burner: FuelBurner,
    boost: Boost,
    controller: TemperatureController,
}

impl Forge {
    pub fn new(config: &ForgeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            fuel: VecDeque::with_capacity(config.fuel_slots),
            fuel_slots: config.fuel_slots,
            burner: FuelBurner::new(),
            boost: Boost::new(config.max_air_ticks),
            controller: TemperatureController::from_config(&config.controller)?,
        })
    }

    pub fn temperature(&self) -> f64 {
        self.controller.current()
    }

    pub fn is_lit(&self) -> bool {
        self.burner.is_lit()
    }

    pub fn burner(&self) -> &FuelBurner {
        &self.burner
    }

    pub fn boost(&self) -> &Boost {
        &self.boost
    }

    /// Charges waiting behind the burning one.
    pub fn queued_fuel(&self) -> &VecDeque<FuelCharge> {
        &self.fuel
    }

    /// Queue a charge in the next free fuel slot.
    pub fn add_fuel(&mut self, charge: FuelCharge) -> Result<(), DeviceError> {
        if self.fuel.len() >= self.fuel_slots {
            return Err(DeviceError::FuelSlotsFull(self.fuel_slots));
        }
        self.fuel.push_back(charge);
        Ok(())
    }

    /// Add air from a bellows. Returns the new air level.
    pub fn pump_air(&mut self, amount: u32) -> u32 {
        self.boost.pump(amount)
    }

    /// Light the forge from its own fuel slots.
    pub fn ignite(&mut self) -> Option<HeatEvent> {
        self.burner.ignite(&mut self.fuel)
    }

    /// Put the fire out. The remaining heat still dissipates tick by tick.
    pub fn extinguish(&mut self) -> Option<HeatEvent> {
        self.burner.extinguish()
    }

    /// The target the forge is heading for this tick.
    pub fn target_temperature(&self, env: Environment) -> f64 {
        target_device_temperature(
            self.burner.burn_temperature(),
            self.boost.air_ticks(),
            env.raining,
        )
    }

    pub fn tick(&mut self, env: Environment) -> Vec<HeatEvent> {
        let mut events = Vec::new();

        if self.burner.is_lit() {
            let rate = if self.boost.is_active() || env.raining {
                2
            } else {
                1
            };
            events.extend(self.burner.tick(rate, &mut self.fuel));
        }
        self.boost.decay();

        let was_hot = self.controller.current() > 0.0;
        if was_hot || self.burner.is_lit() {
            let target = self.target_temperature(env);
            self.controller.tick(target, self.boost.is_active());
        }
        if was_hot && self.controller.current() == 0.0 {
            events.push(HeatEvent::CooledDown);
        }

        events
    }

    /// Burn through a time skip. A forge that keeps burning moves towards its
    /// fuel temperature; if the fuel runs out during the skip the forge goes
    /// out and is treated as fully cooled.
    pub fn catch_up(&mut self, ticks: Ticks) -> Vec<HeatEvent> {
        let mut events = Vec::new();
        if !self.burner.is_lit() {
            let was_hot = self.controller.current() > 0.0;
            self.controller.advance(0.0, ticks);
            if was_hot && self.controller.current() == 0.0 {
                events.push(HeatEvent::CooledDown);
            }
            return events;
        }

        let unaccounted = self.burner.catch_up(ticks, &mut self.fuel);
        if unaccounted == 0 {
            let target = self.target_temperature(Environment::clear());
            self.controller.advance(target, ticks);
            return events;
        }

        events.push(HeatEvent::Extinguished);
        if self.controller.current() > 0.0 {
            self.controller.set_current(0.0);
            events.push(HeatEvent::CooledDown);
        }
        events
    }
}
