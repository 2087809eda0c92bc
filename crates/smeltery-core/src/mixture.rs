//! Ratio-preserving multi-component accumulator.
//!
//! A [`Mixture`] holds real-valued quantities of named components with a
//! running total and a fixed capacity. Material goes in through [`Mixture::add`]
//! and [`Mixture::merge`] and comes out through [`Mixture::extract`], which
//! always removes every component in proportion so the ratios (and therefore
//! the resolved identity) are preserved.
//!
//! # Numeric safety
//!
//! Ratios are compared with a tolerance of [`EPSILON`]. Components whose share
//! of the total is at or below that tolerance are invisible to matching. If a
//! mixture could hold more than [`MAX_SAFE_TOTAL`] units, a single unit of a
//! foreign component would fall below the tolerance, and the mixture would
//! resolve as pure: extracting it would transmute the foreign unit into the
//! majority component. Every configured capacity is therefore checked against
//! [`MAX_SAFE_TOTAL`] at load time (see [`crate::validation`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::id::{CatalogRevision, ComponentId};
use crate::memo::{KeyedMemo, Memo};
use crate::resolver;

/// Largest total a mixture may safely hold.
pub const MAX_SAFE_TOTAL: f64 = (i32::MAX - 2) as f64;

/// Tolerance that component ratios are compared against.
pub const EPSILON: f64 = 1.0 / (2.0 + MAX_SAFE_TOTAL);

const _: () = assert!(1.0 / (1.0 + MAX_SAFE_TOTAL) >= EPSILON);

/// Relative tolerance used when reconciling a persisted total with its contents.
const RECORD_TOLERANCE: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Whether an operation mutates state or only reports what it would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Execute,
    Simulate,
}

impl Action {
    pub fn is_simulate(self) -> bool {
        self == Action::Simulate
    }
}

/// An amount removed from a mixture, tagged with the identity it had
/// immediately before the removal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extracted {
    pub component: ComponentId,
    pub amount: f64,
}

impl Extracted {
    pub fn is_empty(&self) -> bool {
        self.amount <= 0.0
    }
}

// ---------------------------------------------------------------------------
// Mixture
// ---------------------------------------------------------------------------

/// A mixture of components with a capacity ceiling.
///
/// Invariants held at the end of every public call:
/// - `total() <= capacity()`
/// - every stored quantity is `> 0`
/// - `total()` equals the sum of the stored quantities within floating point
///   tolerance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "MixtureRecord", try_from = "MixtureRecord")]
pub struct Mixture {
    contents: BTreeMap<ComponentId, f64>,
    total: f64,
    capacity: f64,
    visible: Memo<BTreeMap<ComponentId, f64>>,
    resolved: KeyedMemo<CatalogRevision, ComponentId>,
}

impl Default for Mixture {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl PartialEq for Mixture {
    fn eq(&self, other: &Self) -> bool {
        self.contents == other.contents
            && self.total == other.total
            && self.capacity == other.capacity
    }
}

impl Mixture {
    /// Create an empty mixture with the given capacity.
    ///
    /// `capacity` must lie in `(0, MAX_SAFE_TOTAL]`; this is checked once when
    /// configuration is loaded, not here.
    pub fn new(capacity: f64) -> Self {
        debug_assert!(
            capacity > 0.0 && capacity <= MAX_SAFE_TOTAL,
            "mixture capacity {capacity} outside (0, {MAX_SAFE_TOTAL}]"
        );
        Self {
            contents: BTreeMap::new(),
            total: 0.0,
            capacity,
            visible: Memo::new(),
            resolved: KeyedMemo::new(),
        }
    }

    /// Create an empty mixture with the largest safe capacity.
    pub fn unbounded() -> Self {
        Self::new(MAX_SAFE_TOTAL)
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Room left before the capacity ceiling.
    pub fn remaining_capacity(&self) -> f64 {
        (self.capacity - self.total).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0.0
    }

    /// Raw stored quantities, including components below the visibility
    /// threshold. Matching and display should use [`visible_contents`](Self::visible_contents).
    pub fn contents(&self) -> &BTreeMap<ComponentId, f64> {
        &self.contents
    }

    /// Quantity of a single component (raw, not filtered).
    pub fn amount_of(&self, component: ComponentId) -> f64 {
        self.contents.get(&component).copied().unwrap_or(0.0)
    }

    /// Share of the exact total held by `component`, or 0 for an empty mixture.
    pub fn fraction_of(&self, component: ComponentId) -> f64 {
        let exact = self.exact_total();
        if exact <= 0.0 {
            return 0.0;
        }
        self.amount_of(component) / exact
    }

    /// Sum of the raw stored quantities, recomputed on every call.
    pub fn exact_total(&self) -> f64 {
        self.contents.values().sum()
    }

    /// Components whose quantity exceeds `exact_total * EPSILON`.
    pub fn visible_contents(&self) -> &BTreeMap<ComponentId, f64> {
        self.visible.get_or_init(|| {
            let threshold = self.exact_total() * EPSILON;
            self.contents
                .iter()
                .filter(|&(_, &q)| q > threshold)
                .map(|(&c, &q)| (c, q))
                .collect()
        })
    }

    /// Amount that [`add`](Self::add) would accept, without mutating.
    pub fn add_simulated(&self, amount: f64) -> f64 {
        if !(amount > 0.0) {
            return 0.0;
        }
        if self.total + amount > self.capacity {
            let room = self.capacity - self.total;
            if room <= 0.0 {
                return 0.0;
            }
            return room;
        }
        amount
    }

    /// Add `amount` of `component`, clamped to the remaining capacity.
    ///
    /// Returns the amount actually added; 0 means the call was a no-op.
    pub fn add(&mut self, component: ComponentId, amount: f64) -> f64 {
        let accepted = self.add_simulated(amount);
        if accepted <= 0.0 {
            return 0.0;
        }
        *self.contents.entry(component).or_insert(0.0) += accepted;
        self.total = (self.total + accepted).min(self.capacity);
        self.invalidate();
        accepted
    }

    /// Add the entire contents of `other`, which is left unchanged.
    ///
    /// When the combined total would overflow, every component of `other` is
    /// scaled by the same keep ratio, so the kept portion has exactly the
    /// ratios of `other`. Returns the amount actually added.
    pub fn merge(&mut self, other: &Mixture) -> f64 {
        if other.total <= 0.0 {
            return 0.0;
        }
        let room = self.capacity - self.total;
        if room <= 0.0 {
            return 0.0;
        }
        let (keep_ratio, added) = if self.total + other.total > self.capacity {
            (room / other.total, room)
        } else {
            (1.0, other.total)
        };
        for (&component, &quantity) in &other.contents {
            let kept = keep_ratio * quantity;
            if kept > 0.0 {
                *self.contents.entry(component).or_insert(0.0) += kept;
            }
        }
        self.total = (self.total + added).min(self.capacity);
        self.invalidate();
        added
    }

    /// Remove `amount` proportionally from every component.
    ///
    /// With [`Action::Simulate`] nothing changes and `min(total, amount)` is
    /// reported. Requesting at least the whole total clears the mixture and
    /// returns the prior total. The returned identity is always resolved
    /// against the pre-extraction state.
    pub fn extract(&mut self, amount: f64, action: Action, catalog: &Catalog) -> Extracted {
        let component = self.resolve(catalog);
        let amount = if amount > 0.0 { amount } else { 0.0 };

        if action.is_simulate() {
            return Extracted {
                component,
                amount: self.total.min(amount),
            };
        }

        if amount >= self.total {
            let total = self.total;
            self.clear();
            return Extracted {
                component,
                amount: total,
            };
        }
        if amount == 0.0 {
            return Extracted {
                component,
                amount: 0.0,
            };
        }

        let total = self.total;
        self.contents.retain(|_, quantity| {
            let removed = amount * *quantity / total;
            if *quantity > removed {
                *quantity -= removed;
                true
            } else {
                false
            }
        });
        self.total -= amount;
        self.invalidate();
        Extracted { component, amount }
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.contents.clear();
        self.total = 0.0;
        self.invalidate();
    }

    /// Resolve the identity of this mixture against `catalog`.
    ///
    /// Memoized per catalog revision; any mutation invalidates the result.
    pub fn resolve(&self, catalog: &Catalog) -> ComponentId {
        let revision = catalog.revision();
        if let Some(cached) = self.resolved.get(revision) {
            return cached;
        }
        let result = resolver::resolve_uncached(self, catalog);
        self.resolved.store(revision, result);
        result
    }

    /// Returns `true` if a resolution against `catalog` is memoized.
    pub fn is_resolution_cached(&self, catalog: &Catalog) -> bool {
        self.resolved.get(catalog.revision()).is_some()
    }

    /// A detached copy with `component` removed and the total reduced
    /// accordingly. The copy is unbounded so it never clamps.
    pub(crate) fn without(&self, component: ComponentId) -> Mixture {
        let mut copy = Mixture::unbounded();
        for (&c, &q) in &self.contents {
            if c != component {
                copy.contents.insert(c, q);
            }
        }
        copy.total = (self.total - self.amount_of(component)).max(0.0);
        copy
    }

    fn invalidate(&mut self) {
        self.visible.invalidate();
        self.resolved.invalidate();
    }
}

// ---------------------------------------------------------------------------
// Persistence record
// ---------------------------------------------------------------------------

/// One stored component quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentAmount {
    pub component: ComponentId,
    pub amount: f64,
}

/// The persisted form of a [`Mixture`]: capacity, total, and every stored
/// component quantity (including sub-epsilon traces).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixtureRecord {
    pub capacity: f64,
    pub total: f64,
    #[serde(default)]
    pub contents: Vec<ComponentAmount>,
}

/// Reasons a [`MixtureRecord`] cannot be turned back into a mixture.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MixtureRecordError {
    #[error("capacity {0} outside (0, {MAX_SAFE_TOTAL}]")]
    InvalidCapacity(f64),
    #[error("invalid total {0}")]
    InvalidTotal(f64),
    #[error("total {total} exceeds capacity {capacity}")]
    OverCapacity { total: f64, capacity: f64 },
    #[error("invalid amount {amount} for component {component:?}")]
    InvalidAmount { component: ComponentId, amount: f64 },
    #[error("total {total} does not match contents sum {sum}")]
    TotalMismatch { total: f64, sum: f64 },
}

impl From<Mixture> for MixtureRecord {
    fn from(mixture: Mixture) -> Self {
        MixtureRecord::from(&mixture)
    }
}

impl From<&Mixture> for MixtureRecord {
    fn from(mixture: &Mixture) -> Self {
        MixtureRecord {
            capacity: mixture.capacity,
            total: mixture.total,
            contents: mixture
                .contents
                .iter()
                .map(|(&component, &amount)| ComponentAmount { component, amount })
                .collect(),
        }
    }
}

impl TryFrom<MixtureRecord> for Mixture {
    type Error = MixtureRecordError;

    fn try_from(record: MixtureRecord) -> Result<Self, Self::Error> {
        if !(record.capacity > 0.0 && record.capacity <= MAX_SAFE_TOTAL) {
            return Err(MixtureRecordError::InvalidCapacity(record.capacity));
        }
        if !(record.total.is_finite() && record.total >= 0.0) {
            return Err(MixtureRecordError::InvalidTotal(record.total));
        }
        if record.total > record.capacity {
            return Err(MixtureRecordError::OverCapacity {
                total: record.total,
                capacity: record.capacity,
            });
        }

        let mut mixture = Mixture::new(record.capacity);
        for entry in record.contents {
            if !(entry.amount.is_finite() && entry.amount >= 0.0) {
                return Err(MixtureRecordError::InvalidAmount {
                    component: entry.component,
                    amount: entry.amount,
                });
            }
            if entry.amount > 0.0 {
                *mixture.contents.entry(entry.component).or_insert(0.0) += entry.amount;
            }
        }

        let sum = mixture.exact_total();
        if (sum - record.total).abs() > RECORD_TOLERANCE * record.total.max(1.0) {
            return Err(MixtureRecordError::TotalMismatch {
                total: record.total,
                sum,
            });
        }
        mixture.total = record.total;
        Ok(mixture)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
