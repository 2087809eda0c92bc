//! Smeltery Core -- the mixture engine for metallurgical simulations.
//!
//! This crate provides the ratio-preserving [`mixture::Mixture`], the recipe
//! catalog, identity resolution, and versioned binary snapshots that every
//! heat-driven device builds on.
//!
//! # Mixture lifecycle
//!
//! 1. **Create** -- `Mixture::new(capacity)` with a capacity validated at
//!    load time against [`mixture::MAX_SAFE_TOTAL`].
//! 2. **Fill** -- `add` single components or `merge` whole mixtures; both
//!    clamp to capacity and never fail.
//! 3. **Resolve** -- `resolve(&catalog)` names the mixture; the answer is
//!    memoized until the next mutation.
//! 4. **Drain** -- `extract` removes material proportionally, tagged with the
//!    identity the mixture had before the removal.
//!
//! ```rust,ignore
//! let mut melt = Mixture::new(4000.0);
//! melt.add(copper, 90.0);
//! melt.add(tin, 10.0);
//! assert_eq!(melt.resolve(&catalog), bronze);
//! let poured = melt.extract(25.0, Action::Execute, &catalog);
//! ```
//!
//! # Key Types
//!
//! - [`mixture::Mixture`] -- Multi-component accumulator with capacity.
//! - [`recipe::MixtureRecipe`] -- Ratio ranges mapping to a result component.
//! - [`catalog::Catalog`] -- Immutable set of components, recipes and fuels.
//! - [`resolver`] -- First-match identity resolution with self-reference.
//! - [`snapshot`] -- Versioned serialization via bitcode.

pub mod catalog;
pub mod id;
pub mod memo;
pub mod mixture;
pub mod recipe;
pub mod resolver;
pub mod snapshot;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

/// Simulation time in whole ticks.
pub type Ticks = u64;

pub use catalog::{Catalog, CatalogBuilder, CatalogError, ComponentDef, FuelDef};
pub use id::{CatalogRevision, ComponentId, FuelId, RecipeId};
pub use mixture::{Action, Extracted, MAX_SAFE_TOTAL, Mixture, MixtureRecord, EPSILON};
pub use recipe::{MixtureRecipe, RatioRange};
pub use validation::ConfigError;
