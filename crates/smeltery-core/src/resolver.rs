//! Resolution of a mixture's identity against a recipe catalog.
//!
//! A mixture with a single visible component is that component. Otherwise the
//! catalog's recipes are tried in catalog order and the first match wins. If
//! nothing matches the result is [`ComponentId::UNKNOWN`].
//!
//! Components at or below the epsilon threshold are treated as absent in every
//! step: they never trigger the self-reference removal and never count as an
//! unexplained extra component.
//!
//! Callers normally go through [`Mixture::resolve`], which memoizes the result.

use crate::catalog::Catalog;
use crate::id::ComponentId;
use crate::mixture::Mixture;
use crate::recipe::MixtureRecipe;

/// Resolve without consulting or filling the mixture's cache.
pub fn resolve_uncached(mixture: &Mixture, catalog: &Catalog) -> ComponentId {
    let visible = mixture.visible_contents();
    if visible.len() == 1 {
        if let Some(&only) = visible.keys().next() {
            return only;
        }
    }
    catalog
        .recipes()
        .iter()
        .find(|recipe| matches(mixture, recipe))
        .map(|recipe| recipe.result)
        .unwrap_or(ComponentId::UNKNOWN)
}

/// Returns `true` if `mixture` satisfies `recipe`.
///
/// When the recipe's result is already visible in the mixture, it is removed
/// from a detached copy first, and the ratios are tested against the rest.
pub fn matches(mixture: &Mixture, recipe: &MixtureRecipe) -> bool {
    if mixture.visible_contents().contains_key(&recipe.result) {
        let adjusted = mixture.without(recipe.result);
        matches_exactly(&adjusted, recipe)
    } else {
        matches_exactly(mixture, recipe)
    }
}

/// Every range must be satisfied by a visible component, and every visible
/// component must be named by some range. Ranges name distinct components,
/// which the catalog checks at build time.
fn matches_exactly(mixture: &Mixture, recipe: &MixtureRecipe) -> bool {
    let visible = mixture.visible_contents();
    let total = mixture.exact_total();
    if total <= 0.0 {
        return false;
    }

    visible.len() == recipe.ranges.len()
        && visible.iter().all(|(&component, &quantity)| {
            recipe
                .range_for(component)
                .is_some_and(|range| range.contains(quantity / total))
        })
}

// ===========================================================================
// Tests
// ===========================================================================
