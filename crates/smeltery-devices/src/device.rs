use serde::{Deserialize, Serialize};
use smeltery_core::Ticks;
use smeltery_heat::{Environment, HeatEvent, HeatTier};

use crate::consumer::HeatConsumer;
use crate::crucible::Crucible;
use crate::forge::Forge;

/// The closed set of device kinds a workshop can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Device {
    Forge(Forge),
    Crucible(Crucible),
}

impl Device {
    pub fn kind(&self) -> &'static str {
        match self {
            Device::Forge(_) => "forge",
            Device::Crucible(_) => "crucible",
        }
    }

    pub fn temperature(&self) -> f64 {
        match self {
            Device::Forge(f) => f.temperature(),
            Device::Crucible(c) => c.temperature(),
        }
    }

    /// Colour band of the current temperature, `None` while cold.
    pub fn heat_tier(&self) -> Option<HeatTier> {
        HeatTier::from_temperature(self.temperature())
    }

    /// Returns `true` for devices that produce heat for their neighbours.
    pub fn is_heat_source(&self) -> bool {
        matches!(self, Device::Forge(_))
    }

    pub fn as_consumer_mut(&mut self) -> Option<&mut dyn HeatConsumer> {
        match self {
            Device::Forge(_) => None,
            Device::Crucible(c) => Some(c),
        }
    }

    pub fn tick(&mut self, env: Environment) -> Vec<HeatEvent> {
        match self {
            Device::Forge(f) => f.tick(env),
            Device::Crucible(c) => c.tick(),
        }
    }

    pub fn catch_up(&mut self, ticks: Ticks) -> Vec<HeatEvent> {
        match self {
            Device::Forge(f) => f.catch_up(ticks),
            Device::Crucible(c) => c.catch_up(ticks),
        }
    }

    pub fn as_forge(&self) -> Option<&Forge> {
        match self {
            Device::Forge(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_forge_mut(&mut self) -> Option<&mut Forge> {
        match self {
            Device::Forge(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_crucible(&self) -> Option<&Crucible> {
        match self {
            Device::Crucible(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_crucible_mut(&mut self) -> Option<&mut Crucible> {
        match self {
            Device::Crucible(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Forge> for Device {
    fn from(forge: Forge) -> Self {
        Device::Forge(forge)
    }
}

impl From<Crucible> for Device {
    fn from(crucible: Crucible) -> Self {
        Device::Crucible(crucible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CrucibleConfig, ForgeConfig};
    use smeltery_heat::FuelCharge;

    #[test]
    fn heat_tier_follows_temperature() {
        let mut forge = Forge::new(&ForgeConfig::default()).unwrap();
        forge.add_fuel(FuelCharge::new(1_000, 1350.0)).unwrap();
        forge.ignite();
        let mut device = Device::from(forge);
        assert_eq!(device.heat_tier(), None);

        for _ in 0..85 {
            device.tick(Environment::clear());
        }
        assert_eq!(device.temperature(), 85.0);
        assert_eq!(device.heat_tier(), Some(HeatTier::Hot));
    }

    #[test]
    fn cold_crucible_has_no_tier() {
        let device = Device::from(Crucible::new(&CrucibleConfig::default()).unwrap());
        assert_eq!(device.kind(), "crucible");
        assert_eq!(device.heat_tier(), None);
    }
}
