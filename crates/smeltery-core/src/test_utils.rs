//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::catalog::{Catalog, CatalogBuilder};
use crate::id::ComponentId;
use crate::mixture::Mixture;
use crate::recipe::RatioRange;

// ===========================================================================
// Component constructors (ids as registered by `sample_catalog`)
// ===========================================================================

pub fn copper() -> ComponentId {
    ComponentId(1)
}
pub fn tin() -> ComponentId {
    ComponentId(2)
}
pub fn zinc() -> ComponentId {
    ComponentId(3)
}
pub fn bismuth() -> ComponentId {
    ComponentId(4)
}
pub fn bronze() -> ComponentId {
    ComponentId(5)
}
pub fn brass() -> ComponentId {
    ComponentId(6)
}
pub fn bismuth_bronze() -> ComponentId {
    ComponentId(7)
}

// ===========================================================================
// Catalogs
// ===========================================================================

fn register_components(b: &mut CatalogBuilder) {
    b.register_component("copper", 1080.0);
    b.register_component("tin", 230.0);
    b.register_component("zinc", 420.0);
    b.register_component("bismuth", 270.0);
    b.register_component("bronze", 950.0);
    b.register_component("brass", 930.0);
    b.register_component("bismuth_bronze", 985.0);
}

/// The components above plus three alloy recipes and four fuels.
pub fn sample_catalog() -> Catalog {
    let mut b = CatalogBuilder::new();
    register_components(&mut b);
    b.register_recipe(
        "bronze",
        bronze(),
        vec![
            RatioRange::new(copper(), 0.88, 0.92),
            RatioRange::new(tin(), 0.08, 0.12),
        ],
    );
    b.register_recipe(
        "brass",
        brass(),
        vec![
            RatioRange::new(copper(), 0.88, 0.92),
            RatioRange::new(zinc(), 0.08, 0.12),
        ],
    );
    b.register_recipe(
        "bismuth_bronze",
        bismuth_bronze(),
        vec![
            RatioRange::new(zinc(), 0.2, 0.3),
            RatioRange::new(copper(), 0.5, 0.65),
            RatioRange::new(bismuth(), 0.1, 0.2),
        ],
    );
    b.register_fuel("charcoal", 1800, 1350.0);
    b.register_fuel("coal", 2200, 1415.0);
    b.register_fuel("peat", 2500, 680.0);
    b.register_fuel("log", 800, 750.0);
    b.build().expect("sample catalog is valid")
}

/// The same components with no recipes and no fuels.
pub fn bare_catalog() -> Catalog {
    let mut b = CatalogBuilder::new();
    register_components(&mut b);
    b.build().expect("bare catalog is valid")
}

// ===========================================================================
// Mixture helpers
// ===========================================================================

/// An unbounded mixture holding the given parts.
pub fn mixture_of(parts: &[(ComponentId, f64)]) -> Mixture {
    let mut m = Mixture::unbounded();
    for &(component, amount) in parts {
        m.add(component, amount);
    }
    m
}

/// A bronze-ratio mixture (90% copper, 10% tin) of `total` units.
pub fn bronze_mix(total: f64) -> Mixture {
    mixture_of(&[(copper(), total * 0.9), (tin(), total * 0.1)])
}

/// Absolute float comparison for test assertions.
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}
