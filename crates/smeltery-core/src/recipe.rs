use serde::{Deserialize, Serialize};

use crate::id::ComponentId;
use crate::mixture::EPSILON;

/// A permitted share of one component, as a fraction of the mixture total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioRange {
    pub component: ComponentId,
    pub min: f64,
    pub max: f64,
}

impl RatioRange {
    pub fn new(component: ComponentId, min: f64, max: f64) -> Self {
        Self {
            component,
            min,
            max,
        }
    }

    /// Returns `true` if `fraction` lies within `[min - EPSILON, max + EPSILON]`.
    pub fn contains(&self, fraction: f64) -> bool {
        fraction >= self.min - EPSILON && fraction <= self.max + EPSILON
    }
}

/// A rule mapping component ratios to a resulting component.
///
/// The result may itself appear in a matching mixture; it is excluded before
/// the ranges are tested (see [`crate::resolver::matches`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixtureRecipe {
    pub name: String,
    pub result: ComponentId,
    pub ranges: Vec<RatioRange>,
}

impl MixtureRecipe {
    /// The range for `component`, if the recipe names it.
    pub fn range_for(&self, component: ComponentId) -> Option<&RatioRange> {
        self.ranges.iter().find(|r| r.component == component)
    }
}
