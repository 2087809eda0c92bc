//! Temperature and fuel model shared by every heat-producing or heat-consuming
//! device.
//!
//! # Per-tick model
//!
//! A fuel-fired device runs, once per tick:
//!
//! 1. **Burn** -- [`fuel::FuelBurner::tick`] counts the active charge down
//!    (twice as fast while boosted or rained on) and pulls the next charge
//!    from a [`fuel::FuelSource`] when it runs out.
//! 2. **Decay** -- [`boost::Boost::decay`] loses one tick of air.
//! 3. **Heat** -- [`controller::TemperatureController::tick`] moves the device
//!    temperature towards [`heat::target_device_temperature`].
//!
//! Consumers without their own fuel only run step 3, with a target supplied
//! by whatever heats them.

pub mod boost;
pub mod controller;
pub mod event;
pub mod fuel;
pub mod heat;

use serde::{Deserialize, Serialize};

pub use boost::Boost;
pub use controller::{ControllerConfig, TemperatureController};
pub use event::HeatEvent;
pub use fuel::{FuelBurner, FuelCharge, FuelSource, Remainder};
pub use heat::HeatTier;

/// Weather affecting a device this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub raining: bool,
}

impl Environment {
    pub fn clear() -> Self {
        Self { raining: false }
    }

    pub fn rain() -> Self {
        Self { raining: true }
    }
}
