use serde::{Deserialize, Serialize};

use crate::heat::boost_influence;

/// Default saturation point of the air accumulator.
pub const DEFAULT_MAX_AIR_TICKS: u32 = 600;

/// Decaying air supply from a bellows or similar pump.
///
/// While any air remains the owning device is boosted: it heats faster, cools
/// slower, burns fuel twice as fast, and has its target raised by
/// [`Boost::influence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boost {
    air_ticks: u32,
    max_air_ticks: u32,
}

impl Default for Boost {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AIR_TICKS)
    }
}

impl Boost {
    pub fn new(max_air_ticks: u32) -> Self {
        Self {
            air_ticks: 0,
            max_air_ticks,
        }
    }

    pub fn air_ticks(&self) -> u32 {
        self.air_ticks
    }

    pub fn max_air_ticks(&self) -> u32 {
        self.max_air_ticks
    }

    pub fn is_active(&self) -> bool {
        self.air_ticks > 0
    }

    /// Add `amount` ticks of air, saturating at the maximum. Returns the new
    /// air level.
    pub fn pump(&mut self, amount: u32) -> u32 {
        self.air_ticks = self.air_ticks.saturating_add(amount).min(self.max_air_ticks);
        self.air_ticks
    }

    /// Lose one tick of air.
    pub fn decay(&mut self) {
        self.air_ticks = self.air_ticks.saturating_sub(1);
    }

    /// Target temperature gained over `base` at the current air level.
    pub fn influence(&self, base: f64) -> f64 {
        boost_influence(base, self.air_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pump_saturates() {
        let mut b = Boost::default();
        assert_eq!(b.pump(200), 200);
        assert_eq!(b.pump(500), 600);
        assert_eq!(b.pump(u32::MAX), 600);
    }

    #[test]
    fn decay_reaches_zero_and_stays() {
        let mut b = Boost::new(3);
        b.pump(3);
        assert!(b.is_active());
        for _ in 0..5 {
            b.decay();
        }
        assert_eq!(b.air_ticks(), 0);
        assert!(!b.is_active());
    }

    #[test]
    fn influence_follows_air_level() {
        let mut b = Boost::default();
        assert_eq!(b.influence(1350.0), 0.0);
        b.pump(25);
        assert_eq!(b.influence(1350.0), 100.0);
        b.pump(600);
        assert_eq!(b.influence(1350.0), 600.0);
    }
}
