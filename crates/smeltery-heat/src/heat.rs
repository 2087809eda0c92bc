//! Shared heat math used by every device.
//!
//! All functions are pure: they take the current temperature and return the
//! next one. Temperatures are in °C.

use std::fmt;

use serde::{Deserialize, Serialize};
use smeltery_core::Ticks;

/// Target temperature gained per remaining tick of boost air.
pub const BOOST_INFLUENCE_PER_AIR_TICK: f64 = 4.0;

/// Upper bound on how far boost air can raise a target temperature.
pub const MAX_BOOST_INFLUENCE: f64 = 600.0;

/// Target temperature lost while a device is rained on.
pub const RAIN_PENALTY: f64 = 300.0;

/// Step `temp` towards `target` by at most `delta_up` (heating) or
/// `delta_down` (cooling), never overshooting.
pub fn adjust_towards(temp: f64, target: f64, delta_up: f64, delta_down: f64) -> f64 {
    if temp < target {
        (temp + delta_up).min(target)
    } else if temp > target {
        (temp - delta_down).max(target)
    } else {
        target
    }
}

/// How much boost air raises a fuel's base temperature.
///
/// Grows with the remaining air, capped at [`MAX_BOOST_INFLUENCE`] and at half
/// the base temperature.
pub fn boost_influence(base: f64, air_ticks: u32) -> f64 {
    if air_ticks == 0 {
        return 0.0;
    }
    let influence = (BOOST_INFLUENCE_PER_AIR_TICK * f64::from(air_ticks)).min(MAX_BOOST_INFLUENCE);
    influence.min(base * 0.5)
}

/// Target temperature of a fuel-fired device for one tick.
pub fn target_device_temperature(base: f64, air_ticks: u32, raining: bool) -> f64 {
    let mut target = base + boost_influence(base, air_ticks);
    if raining {
        target = (target - RAIN_PENALTY).max(0.0);
    }
    target
}

/// Temperature of an unheated object after `ticks` of passive cooling.
pub fn passive_cooling(temp: f64, heat_capacity: f64, ticks: Ticks, cooling_modifier: f64) -> f64 {
    if ticks == 0 || heat_capacity <= 0.0 {
        return temp;
    }
    (temp - ticks as f64 * cooling_modifier / heat_capacity).max(0.0)
}

// ---------------------------------------------------------------------------
// Heat tiers
// ---------------------------------------------------------------------------

/// Named temperature band, used for display and for coarse gameplay checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeatTier {
    Warming,
    Hot,
    VeryHot,
    FaintRed,
    DarkRed,
    BrightRed,
    Orange,
    Yellow,
    YellowWhite,
    White,
    BrilliantWhite,
}

impl HeatTier {
    pub const ALL: [HeatTier; 11] = [
        HeatTier::Warming,
        HeatTier::Hot,
        HeatTier::VeryHot,
        HeatTier::FaintRed,
        HeatTier::DarkRed,
        HeatTier::BrightRed,
        HeatTier::Orange,
        HeatTier::Yellow,
        HeatTier::YellowWhite,
        HeatTier::White,
        HeatTier::BrilliantWhite,
    ];

    /// Lowest temperature (inclusive) of this tier.
    pub fn min_temperature(self) -> f64 {
        match self {
            HeatTier::Warming => 1.0,
            HeatTier::Hot => 80.0,
            HeatTier::VeryHot => 210.0,
            HeatTier::FaintRed => 480.0,
            HeatTier::DarkRed => 580.0,
            HeatTier::BrightRed => 730.0,
            HeatTier::Orange => 930.0,
            HeatTier::Yellow => 1100.0,
            HeatTier::YellowWhite => 1300.0,
            HeatTier::White => 1400.0,
            HeatTier::BrilliantWhite => 1500.0,
        }
    }

    /// The tier containing `temp`, or `None` below [`HeatTier::Warming`].
    pub fn from_temperature(temp: f64) -> Option<HeatTier> {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|tier| temp >= tier.min_temperature())
    }

    pub fn name(self) -> &'static str {
        match self {
            HeatTier::Warming => "warming",
            HeatTier::Hot => "hot",
            HeatTier::VeryHot => "very hot",
            HeatTier::FaintRed => "faint red",
            HeatTier::DarkRed => "dark red",
            HeatTier::BrightRed => "bright red",
            HeatTier::Orange => "orange",
            HeatTier::Yellow => "yellow",
            HeatTier::YellowWhite => "yellow white",
            HeatTier::White => "white",
            HeatTier::BrilliantWhite => "brilliant white",
        }
    }
}

impl fmt::Display for HeatTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
