//! Adversarial input tests for mixtures and resolution.
//!
//! Inputs that a careless caller or a crafted save could produce must be
//! clamped or rejected without panics and without breaking invariants.

use smeltery_core::id::ComponentId;
use smeltery_core::mixture::{Action, MAX_SAFE_TOTAL, Mixture, MixtureRecord};
use smeltery_core::test_utils::*;

fn assert_consistent(m: &Mixture) {
    assert!(m.total() <= m.capacity());
    assert!(m.contents().values().all(|&q| q > 0.0));
    assert!(approx_eq(m.total(), m.exact_total(), 1e-9 * m.capacity().max(1.0)));
}

/// Non-finite amounts never poison the running total.
#[test]
fn non_finite_amounts() {
    let catalog = sample_catalog();
    let mut m = Mixture::new(100.0);
    assert_eq!(m.add(copper(), f64::NAN), 0.0);
    assert_eq!(m.add(copper(), f64::NEG_INFINITY), 0.0);
    // Infinity clamps to the remaining capacity.
    assert_eq!(m.add(copper(), f64::INFINITY), 100.0);
    assert_consistent(&m);

    let out = m.extract(f64::NAN, Action::Execute, &catalog);
    assert_eq!(out.amount, 0.0);
    assert_eq!(m.total(), 100.0);

    let out = m.extract(f64::INFINITY, Action::Execute, &catalog);
    assert_eq!(out.amount, 100.0);
    assert!(m.is_empty());
}

/// Negative extraction is treated as zero.
#[test]
fn negative_extraction() {
    let catalog = sample_catalog();
    let mut m = bronze_mix(100.0);
    let out = m.extract(-50.0, Action::Execute, &catalog);
    assert_eq!(out.amount, 0.0);
    assert!(approx_eq(m.total(), 100.0, 1e-9));
}

/// Merging a mixture with a copy of itself doubles every component.
#[test]
fn merge_with_own_copy() {
    let mut m = Mixture::new(1000.0);
    m.add(copper(), 90.0);
    m.add(tin(), 10.0);
    let copy = m.clone();
    assert_eq!(m.merge(&copy), 100.0);
    assert_eq!(m.amount_of(copper()), 180.0);
    assert_eq!(m.amount_of(tin()), 20.0);
    assert_consistent(&m);
}

/// Thousands of tiny partial pours leave a consistent, same-identity mixture.
#[test]
fn many_tiny_extractions() {
    let catalog = sample_catalog();
    let mut m = Mixture::new(4000.0);
    m.merge(&bronze_mix(4000.0));
    for _ in 0..10_000 {
        m.extract(0.3, Action::Execute, &catalog);
    }
    assert_consistent(&m);
    assert_eq!(m.resolve(&catalog), bronze());
    assert!(approx_eq(m.total(), 1000.0, 1e-6));
}

/// Alternating fills and pours across a long session stay consistent.
#[test]
fn long_session_fill_and_pour() {
    let catalog = sample_catalog();
    let mut m = Mixture::new(4000.0);
    for i in 0..5_000u32 {
        m.add(copper(), 9.0 + f64::from(i % 3));
        m.add(tin(), 1.0);
        m.extract(7.5, Action::Execute, &catalog);
    }
    assert_consistent(&m);
}

/// A foreign unit in a maximal mixture stays visible, so extraction can never
/// turn it into the majority component.
#[test]
fn duplication_exploit_at_max_capacity() {
    let catalog = sample_catalog();
    let mut m = Mixture::unbounded();
    m.add(copper(), MAX_SAFE_TOTAL - 1.0);
    m.add(tin(), 1.0);
    assert_eq!(m.capacity(), MAX_SAFE_TOTAL);
    assert!(m.visible_contents().contains_key(&tin()));
    let out = m.extract(1.0, Action::Simulate, &catalog);
    assert_ne!(out.component, copper());
}

/// Components outside the catalog resolve without panicking.
#[test]
fn component_outside_catalog() {
    let catalog = sample_catalog();
    let stray = ComponentId(9_999);
    let single = mixture_of(&[(stray, 10.0)]);
    assert_eq!(single.resolve(&catalog), stray);
    let mixed = mixture_of(&[(stray, 10.0), (copper(), 10.0)]);
    assert_eq!(mixed.resolve(&catalog), ComponentId::UNKNOWN);
}

/// A crafted record with non-finite numbers is rejected.
#[test]
fn crafted_records_are_rejected() {
    let json = r#"{"capacity": 100.0, "total": 1e400, "contents": []}"#;
    assert!(serde_json::from_str::<Mixture>(json).is_err());

    let record = MixtureRecord {
        capacity: f64::NAN,
        total: 0.0,
        contents: vec![],
    };
    assert!(Mixture::try_from(record).is_err());

    let record = MixtureRecord {
        capacity: 100.0,
        total: f64::INFINITY,
        contents: vec![],
    };
    assert!(Mixture::try_from(record).is_err());
}

/// A record with missing contents deserializes as empty.
#[test]
fn record_without_contents_field() {
    let json = r#"{"capacity": 100.0, "total": 0.0}"#;
    let m: Mixture = serde_json::from_str(json).unwrap();
    assert!(m.is_empty());
    assert_eq!(m.capacity(), 100.0);
}
