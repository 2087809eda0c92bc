//! First-order temperature controller.
//!
//! The controller moves a current temperature towards a per-tick target at a
//! fixed heating or cooling rate, never overshooting. An active boost doubles
//! the heating rate and halves the cooling rate, so a boosted device heats
//! quickly and holds its heat longer.

use serde::{Deserialize, Serialize};
use smeltery_core::validation::{self, ConfigError};
use smeltery_core::Ticks;

use crate::heat::adjust_towards;

/// Heating multiplier while boosted.
pub const BOOST_HEATING_FACTOR: f64 = 2.0;
/// Cooling multiplier while boosted.
pub const BOOST_COOLING_FACTOR: f64 = 0.5;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

fn default_rate() -> f64 {
    1.0
}

fn default_ceiling() -> f64 {
    1600.0
}

fn default_modifier() -> f64 {
    1.0
}

/// Parameters of a [`TemperatureController`], as read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default = "default_rate")]
    pub heating_rate: f64,
    #[serde(default = "default_rate")]
    pub cooling_rate: f64,
    #[serde(default = "default_ceiling")]
    pub ceiling: f64,
    /// Global multiplier applied to both rates.
    #[serde(default = "default_modifier")]
    pub modifier: f64,
    /// Starting temperature.
    #[serde(default)]
    pub baseline: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            heating_rate: default_rate(),
            cooling_rate: default_rate(),
            ceiling: default_ceiling(),
            modifier: default_modifier(),
            baseline: 0.0,
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_rates(self.heating_rate, self.cooling_rate)?;
        validation::validate_rate("modifier", self.modifier)?;
        validation::validate_non_negative("ceiling", self.ceiling)?;
        validation::validate_non_negative("baseline", self.baseline)?;
        if self.baseline > self.ceiling {
            return Err(ConfigError::Invalid {
                field: "baseline".to_string(),
                reason: format!("{} exceeds ceiling {}", self.baseline, self.ceiling),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureController {
    current: f64,
    heating_rate: f64,
    cooling_rate: f64,
    ceiling: f64,
    modifier: f64,
}

impl TemperatureController {
    /// Create a controller at 0 °C. Rates must be positive; this is checked
    /// when configuration is loaded (see [`ControllerConfig::validate`]).
    pub fn new(heating_rate: f64, cooling_rate: f64, ceiling: f64) -> Self {
        debug_assert!(heating_rate > 0.0 && cooling_rate > 0.0);
        Self {
            current: 0.0,
            heating_rate,
            cooling_rate,
            ceiling,
            modifier: 1.0,
        }
    }

    /// Build a controller from validated configuration.
    pub fn from_config(config: &ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            current: config.baseline,
            heating_rate: config.heating_rate,
            cooling_rate: config.cooling_rate,
            ceiling: config.ceiling,
            modifier: config.modifier,
        })
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    pub fn heating_rate(&self) -> f64 {
        self.heating_rate
    }

    pub fn cooling_rate(&self) -> f64 {
        self.cooling_rate
    }

    /// Force the current temperature, clamped to `[0, ceiling]`.
    pub fn set_current(&mut self, temperature: f64) {
        self.current = temperature.clamp(0.0, self.ceiling);
    }

    /// Advance one tick towards `target` and return the new temperature.
    pub fn tick(&mut self, target: f64, boost_active: bool) -> f64 {
        let (up, down) = if boost_active {
            (BOOST_HEATING_FACTOR, BOOST_COOLING_FACTOR)
        } else {
            (1.0, 1.0)
        };
        let next = adjust_towards(
            self.current,
            target,
            self.heating_rate * up * self.modifier,
            self.cooling_rate * down * self.modifier,
        );
        self.current = next.clamp(0.0, self.ceiling);
        self.current
    }

    /// Advance `ticks` unboosted ticks towards a constant `target` at once.
    pub fn advance(&mut self, target: f64, ticks: Ticks) -> f64 {
        let n = ticks as f64;
        let next = adjust_towards(
            self.current,
            target,
            self.heating_rate * self.modifier * n,
            self.cooling_rate * self.modifier * n,
        );
        self.current = next.clamp(0.0, self.ceiling);
        self.current
    }
}
