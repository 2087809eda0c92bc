//! Serde data file structs for smeltery content.
//!
//! These structs define the on-disk format for components, recipes and fuels.
//! They are deserialized from RON, JSON, or TOML data files and then resolved
//! into catalog entries by the loader.

use serde::Deserialize;

// ===========================================================================
// Components
// ===========================================================================

/// A component definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentData {
    pub name: String,
    pub melt_temperature: f64,
}

// ===========================================================================
// Recipes
// ===========================================================================

/// A ratio range entry, supporting both short tuple form and full form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RangeData {
    /// Short form: `("copper", 0.88, 0.92)`.
    Short(String, f64, f64),
    /// Full form with named fields.
    Full {
        component: String,
        min: f64,
        max: f64,
    },
}

impl RangeData {
    pub fn component(&self) -> &str {
        match self {
            RangeData::Short(component, _, _) => component,
            RangeData::Full { component, .. } => component,
        }
    }

    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            RangeData::Short(_, min, max) => (min, max),
            RangeData::Full { min, max, .. } => (min, max),
        }
    }
}

/// A mixture ratio recipe in a data file. File order is resolution order.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeData {
    pub name: String,
    pub result: String,
    pub ranges: Vec<RangeData>,
}

// ===========================================================================
// Fuels
// ===========================================================================

/// A fuel definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct FuelData {
    pub name: String,
    /// Burn time of one charge, in ticks.
    pub duration: u64,
    pub temperature: f64,
}
