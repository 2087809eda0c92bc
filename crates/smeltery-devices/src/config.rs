//! Device configuration with serde defaults.
//!
//! Every field may be omitted from a data file; the defaults are the
//! reference values. [`DeviceConfig::validate`] is run once at load time.

use serde::{Deserialize, Serialize};
use smeltery_core::validation::{self, ConfigError};
use smeltery_heat::boost::DEFAULT_MAX_AIR_TICKS;
use smeltery_heat::ControllerConfig;

pub const DEFAULT_CRUCIBLE_CAPACITY: f64 = 4000.0;
pub const DEFAULT_STABILITY_TICKS: u32 = 5;
pub const DEFAULT_FUEL_SLOTS: usize = 5;

fn default_fuel_slots() -> usize {
    DEFAULT_FUEL_SLOTS
}

fn default_max_air_ticks() -> u32 {
    DEFAULT_MAX_AIR_TICKS
}

fn default_capacity() -> f64 {
    DEFAULT_CRUCIBLE_CAPACITY
}

fn default_stability_ticks() -> u32 {
    DEFAULT_STABILITY_TICKS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgeConfig {
    #[serde(default)]
    pub controller: ControllerConfig,
    /// Charges that can wait in the forge behind the burning one.
    #[serde(default = "default_fuel_slots")]
    pub fuel_slots: usize,
    #[serde(default = "default_max_air_ticks")]
    pub max_air_ticks: u32,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            fuel_slots: DEFAULT_FUEL_SLOTS,
            max_air_ticks: DEFAULT_MAX_AIR_TICKS,
        }
    }
}

impl ForgeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.controller.validate()?;
        if self.fuel_slots == 0 {
            return Err(ConfigError::Invalid {
                field: "forge.fuel_slots".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrucibleConfig {
    #[serde(default = "default_capacity")]
    pub capacity: f64,
    #[serde(default)]
    pub controller: ControllerConfig,
    /// Ticks an externally supplied target holds before it starts to decay.
    #[serde(default = "default_stability_ticks")]
    pub stability_ticks: u32,
}

impl Default for CrucibleConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CRUCIBLE_CAPACITY,
            controller: ControllerConfig::default(),
            stability_ticks: DEFAULT_STABILITY_TICKS,
        }
    }
}

impl CrucibleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_capacity("crucible.capacity", self.capacity)?;
        self.controller.validate()
    }
}

/// Configuration for every device kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default)]
    pub forge: ForgeConfig,
    #[serde(default)]
    pub crucible: CrucibleConfig,
}

impl DeviceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.forge.validate()?;
        self.crucible.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smeltery_core::mixture::MAX_SAFE_TOTAL;

    #[test]
    fn defaults_are_reference_values() {
        let config = DeviceConfig::default();
        assert_eq!(config.crucible.capacity, 4000.0);
        assert_eq!(config.crucible.stability_ticks, 5);
        assert_eq!(config.forge.max_air_ticks, 600);
        assert_eq!(config.forge.controller.ceiling, 1600.0);
        assert_eq!(config.forge.controller.modifier, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_json_gives_defaults() {
        let config: DeviceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DeviceConfig::default());
    }

    #[test]
    fn partial_json_overrides() {
        let config: DeviceConfig =
            serde_json::from_str(r#"{"crucible": {"capacity": 1000.0}}"#).unwrap();
        assert_eq!(config.crucible.capacity, 1000.0);
        assert_eq!(config.crucible.stability_ticks, 5);
    }

    #[test]
    fn oversized_capacity_is_rejected() {
        let mut config = DeviceConfig::default();
        config.crucible.capacity = MAX_SAFE_TOTAL * 2.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn zero_rate_is_rejected() {
        let mut config = DeviceConfig::default();
        config.forge.controller.cooling_rate = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveRate { .. })
        ));
    }

    #[test]
    fn zero_fuel_slots_is_rejected() {
        let mut config = DeviceConfig::default();
        config.forge.fuel_slots = 0;
        assert!(config.validate().is_err());
    }
}
