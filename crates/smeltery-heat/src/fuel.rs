//! Fuel charges and the burner that consumes them.
//!
//! A [`FuelBurner`] holds at most one active [`FuelCharge`]. Queued charges
//! live with the owning device behind the [`FuelSource`] trait; the burner
//! pulls the next one when the active charge runs out, carrying any overshoot
//! from a double-rate tick into the new charge.

use std::collections::VecDeque;

use log::debug;
use serde::{Deserialize, Serialize};
use smeltery_core::catalog::FuelDef;
use smeltery_core::Ticks;

use crate::event::HeatEvent;

// ---------------------------------------------------------------------------
// Charges and sources
// ---------------------------------------------------------------------------

/// One unit of fuel: how long it still burns and how hot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelCharge {
    pub remaining_ticks: Ticks,
    pub burn_temperature: f64,
}

impl FuelCharge {
    pub fn new(remaining_ticks: Ticks, burn_temperature: f64) -> Self {
        Self {
            remaining_ticks,
            burn_temperature,
        }
    }

    pub fn is_spent(&self) -> bool {
        self.remaining_ticks == 0
    }

    /// Burn `ticks` of this charge. Returns the ticks that did not fit.
    fn burn(&mut self, ticks: Ticks) -> Ticks {
        if self.remaining_ticks > ticks {
            self.remaining_ticks -= ticks;
            0
        } else {
            let overshoot = ticks - self.remaining_ticks;
            self.remaining_ticks = 0;
            overshoot
        }
    }
}

impl From<&FuelDef> for FuelCharge {
    fn from(def: &FuelDef) -> Self {
        FuelCharge::new(def.duration, def.temperature)
    }
}

/// Yields the next charge to burn, removing it from wherever it is queued.
pub trait FuelSource {
    fn next_charge(&mut self) -> Option<FuelCharge>;
}

impl FuelSource for VecDeque<FuelCharge> {
    fn next_charge(&mut self) -> Option<FuelCharge> {
        self.pop_front()
    }
}

// ---------------------------------------------------------------------------
// Time-skip catch-up
// ---------------------------------------------------------------------------

/// Result of burning fuel across a time skip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Remainder {
    /// The charge left burning, if any.
    pub charge: Option<FuelCharge>,
    /// Ticks that no fuel was left to cover.
    pub unaccounted_ticks: Ticks,
}

/// Burn through `ticks` starting with `charge` and then pulling from `source`.
///
/// When the fuel lasts exactly as long as the skip, the last charge is kept
/// with 0 ticks left so the device is still burning at the end of the skip.
pub fn consume_fuel_for_ticks(
    mut ticks: Ticks,
    charge: Option<FuelCharge>,
    source: &mut impl FuelSource,
) -> Remainder {
    let mut last = None;
    if let Some(mut active) = charge {
        if active.remaining_ticks > ticks {
            active.remaining_ticks -= ticks;
            return Remainder {
                charge: Some(active),
                unaccounted_ticks: 0,
            };
        }
        ticks -= active.remaining_ticks;
        active.remaining_ticks = 0;
        last = Some(active);
    }

    while let Some(mut next) = source.next_charge() {
        if next.remaining_ticks > ticks {
            next.remaining_ticks -= ticks;
            return Remainder {
                charge: Some(next),
                unaccounted_ticks: 0,
            };
        }
        ticks -= next.remaining_ticks;
        next.remaining_ticks = 0;
        last = Some(next);
    }

    Remainder {
        charge: if ticks == 0 { last } else { None },
        unaccounted_ticks: ticks,
    }
}

// ---------------------------------------------------------------------------
// Burner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelBurner {
    active: Option<FuelCharge>,
}

impl FuelBurner {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn is_lit(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_charge(&self) -> Option<&FuelCharge> {
        self.active.as_ref()
    }

    /// Temperature of the active charge, or 0 when unlit.
    pub fn burn_temperature(&self) -> f64 {
        self.active.map_or(0.0, |c| c.burn_temperature)
    }

    pub fn remaining_ticks(&self) -> Ticks {
        self.active.map_or(0, |c| c.remaining_ticks)
    }

    /// Light the burner from `source`. A burner that is already lit stays
    /// lit and emits nothing.
    pub fn ignite(&mut self, source: &mut impl FuelSource) -> Option<HeatEvent> {
        if self.is_lit() {
            return None;
        }
        let charge = pull_unspent(source)?;
        debug!("burner ignited at {} °C", charge.burn_temperature);
        self.active = Some(charge);
        Some(HeatEvent::Ignited {
            burn_temperature: charge.burn_temperature,
        })
    }

    /// Burn `rate` ticks of the active charge, refuelling from `source` when it
    /// runs out. Returns an event on refuel or extinction.
    pub fn tick(&mut self, rate: Ticks, source: &mut impl FuelSource) -> Option<HeatEvent> {
        let charge = self.active.as_mut()?;
        let mut overshoot = charge.burn(rate);
        if !charge.is_spent() {
            return None;
        }

        while let Some(mut next) = source.next_charge() {
            overshoot = next.burn(overshoot);
            if !next.is_spent() {
                debug!(
                    "burner pulled next charge: {} ticks at {} °C",
                    next.remaining_ticks, next.burn_temperature
                );
                self.active = Some(next);
                return Some(HeatEvent::ChargeConsumed {
                    burn_temperature: next.burn_temperature,
                });
            }
        }

        debug!("burner extinguished: fuel exhausted");
        self.active = None;
        Some(HeatEvent::Extinguished)
    }

    /// Put the burner out, discarding the active charge.
    pub fn extinguish(&mut self) -> Option<HeatEvent> {
        self.active.take().map(|_| HeatEvent::Extinguished)
    }

    /// Burn through a time skip of `ticks`. Returns the ticks no fuel covered;
    /// a non-zero result means the burner went out during the skip. Fuel that
    /// runs out exactly at the end leaves a spent charge burning, and the next
    /// [`tick`](Self::tick) refuels or extinguishes.
    pub fn catch_up(&mut self, ticks: Ticks, source: &mut impl FuelSource) -> Ticks {
        if !self.is_lit() {
            return ticks;
        }
        let remainder = consume_fuel_for_ticks(ticks, self.active, source);
        self.active = remainder.charge;
        if remainder.unaccounted_ticks > 0 {
            debug!(
                "burner ran dry during catch-up, {} ticks unaccounted",
                remainder.unaccounted_ticks
            );
        }
        remainder.unaccounted_ticks
    }
}

fn pull_unspent(source: &mut impl FuelSource) -> Option<FuelCharge> {
    while let Some(charge) = source.next_charge() {
        if !charge.is_spent() {
            return Some(charge);
        }
    }
    None
}
