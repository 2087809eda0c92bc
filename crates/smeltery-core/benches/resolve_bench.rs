//! Criterion benchmarks for mixture resolution.
//!
//! - `resolve_uncached`: full recipe scan against a large catalog, where the
//!   matching recipe is registered last.
//! - `resolve_cached`: repeated resolution of an unmutated mixture.
//! - `add_then_resolve`: one mutation followed by a resolution per iteration.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use smeltery_core::catalog::{Catalog, CatalogBuilder};
use smeltery_core::id::ComponentId;
use smeltery_core::mixture::Mixture;
use smeltery_core::recipe::RatioRange;
use smeltery_core::resolver::resolve_uncached;

const RECIPE_COUNT: usize = 2_000;

/// Build a catalog of `RECIPE_COUNT` two-component recipes over distinct
/// component pairs, plus a final copper/tin recipe. Returns the catalog and
/// the copper and tin ids.
fn build_large_catalog() -> (Catalog, ComponentId, ComponentId) {
    let mut b = CatalogBuilder::new();
    let mut metals = Vec::with_capacity(RECIPE_COUNT * 2);
    for i in 0..RECIPE_COUNT * 2 {
        metals.push(b.register_component(&format!("metal_{i}"), 500.0));
    }
    for i in 0..RECIPE_COUNT {
        let result = b.register_component(&format!("alloy_{i}"), 800.0);
        b.register_recipe(
            &format!("alloy_{i}"),
            result,
            vec![
                RatioRange::new(metals[2 * i], 0.4, 0.6),
                RatioRange::new(metals[2 * i + 1], 0.4, 0.6),
            ],
        );
    }
    let copper = b.register_component("copper", 1080.0);
    let tin = b.register_component("tin", 230.0);
    let bronze = b.register_component("bronze", 950.0);
    b.register_recipe(
        "bronze",
        bronze,
        vec![
            RatioRange::new(copper, 0.88, 0.92),
            RatioRange::new(tin, 0.08, 0.12),
        ],
    );
    (b.build().unwrap(), copper, tin)
}

fn bench_resolution(c: &mut Criterion) {
    let (catalog, copper, tin) = build_large_catalog();
    let mut melt = Mixture::new(4000.0);
    melt.add(copper, 900.0);
    melt.add(tin, 100.0);

    let mut group = c.benchmark_group("resolution");

    group.bench_function("resolve_uncached_2000_recipes", |b| {
        b.iter(|| resolve_uncached(black_box(&melt), &catalog))
    });

    melt.resolve(&catalog);
    group.bench_function("resolve_cached_2000_recipes", |b| {
        b.iter(|| black_box(&melt).resolve(&catalog))
    });

    group.bench_function("add_then_resolve_2000_recipes", |b| {
        let mut m = melt.clone();
        b.iter(|| {
            m.add(copper, 0.0001);
            m.resolve(&catalog)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_resolution);
criterion_main!(benches);
