//! The catalog of components, mixture recipes, and fuels.
//!
//! Catalogs are owned values passed into the simulation per call; there is no
//! process-wide registry. A [`CatalogBuilder`] goes through three phases:
//! registration, optional mutation by name, and a validating [`build`]
//! (`CatalogBuilder::build`) that freezes it into an immutable [`Catalog`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use log::info;

use crate::Ticks;
use crate::id::{CatalogRevision, ComponentId, FuelId, RecipeId};
use crate::recipe::{MixtureRecipe, RatioRange};

/// Name of the reserved sentinel component.
pub const UNKNOWN_NAME: &str = "unknown";

/// Melt temperature given to the sentinel unless the data overrides it.
pub const DEFAULT_UNKNOWN_MELT_TEMPERATURE: f64 = 400.0;

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

/// A component (metal, fluid) definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDef {
    pub name: String,
    /// Temperature (°C) at or above which solid input melts into a mixture,
    /// and above which a mixture of this identity can be poured.
    pub melt_temperature: f64,
}

/// A fuel definition: one consumed unit burns for `duration` ticks at
/// `temperature`.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelDef {
    pub name: String,
    pub duration: Ticks,
    pub temperature: f64,
}

/// Builder for constructing an immutable [`Catalog`].
#[derive(Debug)]
pub struct CatalogBuilder {
    components: Vec<ComponentDef>,
    component_name_to_id: HashMap<String, ComponentId>,
    recipes: Vec<MixtureRecipe>,
    recipe_name_to_id: HashMap<String, RecipeId>,
    fuels: Vec<FuelDef>,
    fuel_name_to_id: HashMap<String, FuelId>,
    duplicates: Vec<String>,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogBuilder {
    /// A builder that already holds the `unknown` sentinel as component 0.
    pub fn new() -> Self {
        let mut component_name_to_id = HashMap::new();
        component_name_to_id.insert(UNKNOWN_NAME.to_string(), ComponentId::UNKNOWN);
        Self {
            components: vec![ComponentDef {
                name: UNKNOWN_NAME.to_string(),
                melt_temperature: DEFAULT_UNKNOWN_MELT_TEMPERATURE,
            }],
            component_name_to_id,
            recipes: Vec::new(),
            recipe_name_to_id: HashMap::new(),
            fuels: Vec::new(),
            fuel_name_to_id: HashMap::new(),
            duplicates: Vec::new(),
        }
    }

    /// Phase 1: Register a component. Returns its ID.
    ///
    /// Registering `unknown` updates the sentinel's melt temperature instead of
    /// adding a second entry.
    pub fn register_component(&mut self, name: &str, melt_temperature: f64) -> ComponentId {
        if name == UNKNOWN_NAME {
            self.components[0].melt_temperature = melt_temperature;
            return ComponentId::UNKNOWN;
        }
        if self.component_name_to_id.contains_key(name) {
            self.duplicates.push(name.to_string());
        }
        let id = ComponentId(self.components.len() as u32);
        self.components.push(ComponentDef {
            name: name.to_string(),
            melt_temperature,
        });
        self.component_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Phase 1: Register a mixture recipe. Returns its ID.
    ///
    /// Recipes are tried in registration order during resolution.
    pub fn register_recipe(
        &mut self,
        name: &str,
        result: ComponentId,
        ranges: Vec<RatioRange>,
    ) -> RecipeId {
        if self.recipe_name_to_id.contains_key(name) {
            self.duplicates.push(name.to_string());
        }
        let id = RecipeId(self.recipes.len() as u32);
        self.recipes.push(MixtureRecipe {
            name: name.to_string(),
            result,
            ranges,
        });
        self.recipe_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Phase 1: Register a fuel. Returns its ID.
    pub fn register_fuel(&mut self, name: &str, duration: Ticks, temperature: f64) -> FuelId {
        if self.fuel_name_to_id.contains_key(name) {
            self.duplicates.push(name.to_string());
        }
        let id = FuelId(self.fuels.len() as u32);
        self.fuels.push(FuelDef {
            name: name.to_string(),
            duration,
            temperature,
        });
        self.fuel_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Phase 2: Mutate an existing recipe by name.
    pub fn mutate_recipe<F>(&mut self, name: &str, f: F) -> Result<(), CatalogError>
    where
        F: FnOnce(&mut MixtureRecipe),
    {
        let id = self
            .recipe_name_to_id
            .get(name)
            .ok_or(CatalogError::NotFound(name.to_string()))?;
        f(&mut self.recipes[id.0 as usize]);
        Ok(())
    }

    /// Phase 2: Mutate an existing fuel by name.
    pub fn mutate_fuel<F>(&mut self, name: &str, f: F) -> Result<(), CatalogError>
    where
        F: FnOnce(&mut FuelDef),
    {
        let id = self
            .fuel_name_to_id
            .get(name)
            .ok_or(CatalogError::NotFound(name.to_string()))?;
        f(&mut self.fuels[id.0 as usize]);
        Ok(())
    }

    /// Lookup component ID by name.
    pub fn component_id(&self, name: &str) -> Option<ComponentId> {
        self.component_name_to_id.get(name).copied()
    }

    /// Lookup recipe ID by name.
    pub fn recipe_id(&self, name: &str) -> Option<RecipeId> {
        self.recipe_name_to_id.get(name).copied()
    }

    /// Lookup fuel ID by name.
    pub fn fuel_id(&self, name: &str) -> Option<FuelId> {
        self.fuel_name_to_id.get(name).copied()
    }

    /// Phase 3: Validate and freeze.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        if let Some(name) = self.duplicates.into_iter().next() {
            return Err(CatalogError::DuplicateName(name));
        }

        for component in &self.components {
            if !(component.melt_temperature.is_finite() && component.melt_temperature >= 0.0) {
                return Err(CatalogError::InvalidMeltTemperature {
                    component: component.name.clone(),
                    value: component.melt_temperature,
                });
            }
        }

        let component_count = self.components.len();
        for recipe in &self.recipes {
            validate_recipe(recipe, component_count)?;
        }

        for fuel in &self.fuels {
            if fuel.duration == 0 {
                return Err(CatalogError::InvalidFuel {
                    fuel: fuel.name.clone(),
                    reason: "duration must be positive".to_string(),
                });
            }
            if !(fuel.temperature.is_finite() && fuel.temperature > 0.0) {
                return Err(CatalogError::InvalidFuel {
                    fuel: fuel.name.clone(),
                    reason: format!("temperature {} must be positive", fuel.temperature),
                });
            }
        }

        let revision = CatalogRevision(NEXT_REVISION.fetch_add(1, Ordering::Relaxed));
        info!(
            "catalog {:?} built: {} components, {} recipes, {} fuels",
            revision,
            self.components.len(),
            self.recipes.len(),
            self.fuels.len()
        );

        Ok(Catalog {
            revision,
            components: self.components,
            component_name_to_id: self.component_name_to_id,
            recipes: self.recipes,
            recipe_name_to_id: self.recipe_name_to_id,
            fuels: self.fuels,
            fuel_name_to_id: self.fuel_name_to_id,
        })
    }
}

fn validate_recipe(recipe: &MixtureRecipe, component_count: usize) -> Result<(), CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidRecipe {
        recipe: recipe.name.clone(),
        reason,
    };

    if recipe.result.0 as usize >= component_count {
        return Err(CatalogError::InvalidComponentRef(recipe.result));
    }
    if recipe.ranges.is_empty() {
        return Err(invalid("no ratio ranges".to_string()));
    }
    for (i, range) in recipe.ranges.iter().enumerate() {
        if range.component.0 as usize >= component_count {
            return Err(CatalogError::InvalidComponentRef(range.component));
        }
        if range.component == recipe.result {
            return Err(invalid("result cannot be one of its own ranges".to_string()));
        }
        if !(0.0..=1.0).contains(&range.min)
            || !(0.0..=1.0).contains(&range.max)
            || range.min > range.max
        {
            return Err(invalid(format!(
                "range [{}, {}] must satisfy 0 <= min <= max <= 1",
                range.min, range.max
            )));
        }
        if recipe.ranges[..i]
            .iter()
            .any(|other| other.component == range.component)
        {
            return Err(invalid(format!(
                "component {:?} listed twice",
                range.component
            )));
        }
    }
    Ok(())
}

/// Immutable catalog. Frozen after build().
#[derive(Debug)]
pub struct Catalog {
    revision: CatalogRevision,
    components: Vec<ComponentDef>,
    component_name_to_id: HashMap<String, ComponentId>,
    recipes: Vec<MixtureRecipe>,
    recipe_name_to_id: HashMap<String, RecipeId>,
    fuels: Vec<FuelDef>,
    fuel_name_to_id: HashMap<String, FuelId>,
}

impl Catalog {
    /// Unique identity of this catalog instance.
    pub fn revision(&self) -> CatalogRevision {
        self.revision
    }

    pub fn component(&self, id: ComponentId) -> Option<&ComponentDef> {
        self.components.get(id.0 as usize)
    }

    pub fn component_id(&self, name: &str) -> Option<ComponentId> {
        self.component_name_to_id.get(name).copied()
    }

    /// Melt temperature of a component, if it is known to this catalog.
    pub fn melt_temperature(&self, id: ComponentId) -> Option<f64> {
        self.component(id).map(|c| c.melt_temperature)
    }

    /// Recipes in resolution order.
    pub fn recipes(&self) -> &[MixtureRecipe] {
        &self.recipes
    }

    pub fn recipe(&self, id: RecipeId) -> Option<&MixtureRecipe> {
        self.recipes.get(id.0 as usize)
    }

    pub fn recipe_by_name(&self, name: &str) -> Option<&MixtureRecipe> {
        self.recipe_name_to_id
            .get(name)
            .and_then(|id| self.recipe(*id))
    }

    pub fn fuel(&self, id: FuelId) -> Option<&FuelDef> {
        self.fuels.get(id.0 as usize)
    }

    pub fn fuel_id(&self, name: &str) -> Option<FuelId> {
        self.fuel_name_to_id.get(name).copied()
    }

    pub fn fuel_by_name(&self, name: &str) -> Option<&FuelDef> {
        self.fuel_id(name).and_then(|id| self.fuel(id))
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn fuel_count(&self) -> usize {
        self.fuels.len()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("duplicate name: {0}")]
    DuplicateName(String),
    #[error("invalid component reference: {0:?}")]
    InvalidComponentRef(ComponentId),
    #[error("invalid melt temperature {value} for component {component}")]
    InvalidMeltTemperature { component: String, value: f64 },
    #[error("invalid recipe {recipe}: {reason}")]
    InvalidRecipe { recipe: String, reason: String },
    #[error("invalid fuel {fuel}: {reason}")]
    InvalidFuel { fuel: String, reason: String },
}
