//! Turns a data directory into a [`Catalog`] and device configuration.
//!
//! Each table (components, recipes, fuels, devices) lives in one file whose
//! extension picks the parser. Recipes and fuels refer to components by name;
//! those names are looked up here so the catalog only ever sees ids.

use log::{info, warn};
use serde::de::DeserializeOwned;
use smeltery_core::catalog::{Catalog, CatalogBuilder, CatalogError, UNKNOWN_NAME};
use smeltery_core::id::ComponentId;
use smeltery_core::recipe::RatioRange;
use smeltery_core::validation::ConfigError;
use smeltery_devices::DeviceConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::schema::{ComponentData, FuelData, RecipeData};

// ===========================================================================
// Errors
// ===========================================================================

#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The components table is mandatory; nothing resolves without it.
    #[error("no {file} table (.ron, .json or .toml) in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    #[error("{file}: data tables must be .ron, .json or .toml")]
    UnsupportedFormat { file: PathBuf },

    /// One table spread over two files, e.g. `fuels.ron` next to `fuels.json`.
    #[error("{a} and {b} define the same table")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("malformed {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A recipe names a component that no components entry defines.
    #[error("{file}: {expected_kind} '{name}' is not defined")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    #[error("{file}: '{name}' is defined more than once")]
    DuplicateName { file: PathBuf, name: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Table files
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    /// Lookup order when searching a directory for a table.
    const ALL: [Format; 3] = [Format::Ron, Format::Toml, Format::Json];

    fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Toml => "toml",
            Format::Json => "json",
        }
    }
}

/// Parser for `path`, chosen by its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    let ext = path.extension().and_then(|e| e.to_str());
    Format::ALL
        .into_iter()
        .find(|format| Some(format.extension()) == ext)
        .ok_or_else(|| DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        })
}

/// The file holding table `table` in `dir`, if there is one.
///
/// A table must live in exactly one format; finding it twice is an error
/// rather than a silent preference.
pub fn find_data_file(dir: &Path, table: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;
    for format in Format::ALL {
        let candidate = dir.join(table).with_extension(format.extension());
        if !candidate.exists() {
            continue;
        }
        match found {
            Some(a) => return Err(DataLoadError::ConflictingFormats { a, b: candidate }),
            None => found = Some(candidate),
        }
    }
    Ok(found)
}

pub fn require_data_file(dir: &Path, table: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, table)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: table.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Parsing
// ===========================================================================

fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

fn read_table(path: &Path) -> Result<(Format, String), DataLoadError> {
    let format = detect_format(path)?;
    Ok((format, std::fs::read_to_string(path)?))
}

/// Parse a whole file as one value, such as the devices table.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let (format, content) = read_table(path)?;
    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Parse a list of entries. RON and JSON files hold the list itself; TOML has
/// no top-level arrays, so the entries sit under `[[key]]`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let (format, content) = read_table(path)?;
    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => {
            let mut table: toml::Table =
                toml::from_str(&content).map_err(|e| parse_error(path, e))?;
            table
                .remove(key)
                .ok_or_else(|| parse_error(path, format!("no [[{key}]] entries")))?
                .try_into()
                .map_err(|e: toml::de::Error| parse_error(path, e))
        }
    }
}

// ===========================================================================
// Names
// ===========================================================================

/// Id registered for `name`, or an `UnresolvedRef` naming the file that
/// used it.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| {
        warn!("{}: {expected_kind} '{name}' is not defined", file.display());
        DataLoadError::UnresolvedRef {
            file: file.to_path_buf(),
            name: name.to_string(),
            expected_kind,
        }
    })
}

/// Fails if `name` was already registered from `file`.
pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if !map.contains_key(name) {
        return Ok(());
    }
    warn!("{}: '{name}' is defined more than once", file.display());
    Err(DataLoadError::DuplicateName {
        file: file.to_path_buf(),
        name: name.to_string(),
    })
}

// ===========================================================================
// Loading pipeline
// ===========================================================================

/// Everything loaded from a data directory.
#[derive(Debug)]
pub struct GameData {
    pub catalog: Catalog,
    pub devices: DeviceConfig,
}

/// Load a data directory into a validated catalog and device configuration.
///
/// Components are registered first, then recipes in file order (which is the
/// order they are tried during resolution), then fuels. The reserved
/// `unknown` component may be listed to override its melt temperature and
/// may always be referenced.
pub fn load_game_data(dir: &Path) -> Result<GameData, DataLoadError> {
    let mut builder = CatalogBuilder::new();

    // Components.
    let path = require_data_file(dir, "components")?;
    let components: Vec<ComponentData> = deserialize_list(&path, "components")?;
    let mut component_ids: HashMap<String, ComponentId> = HashMap::new();
    for component in &components {
        check_duplicate(&component_ids, &component.name, &path)?;
        let id = builder.register_component(&component.name, component.melt_temperature);
        component_ids.insert(component.name.clone(), id);
    }
    component_ids
        .entry(UNKNOWN_NAME.to_string())
        .or_insert(ComponentId::UNKNOWN);

    // Recipes.
    if let Some(path) = find_data_file(dir, "recipes")? {
        let recipes: Vec<RecipeData> = deserialize_list(&path, "recipes")?;
        let mut seen: HashMap<String, ()> = HashMap::new();
        for recipe in &recipes {
            check_duplicate(&seen, &recipe.name, &path)?;
            let result = *resolve_name(&component_ids, &recipe.result, &path, "component")?;
            let ranges = recipe
                .ranges
                .iter()
                .map(|range| {
                    let component =
                        *resolve_name(&component_ids, range.component(), &path, "component")?;
                    let (min, max) = range.bounds();
                    Ok(RatioRange::new(component, min, max))
                })
                .collect::<Result<Vec<_>, DataLoadError>>()?;
            builder.register_recipe(&recipe.name, result, ranges);
            seen.insert(recipe.name.clone(), ());
        }
    }

    // Fuels.
    if let Some(path) = find_data_file(dir, "fuels")? {
        let fuels: Vec<FuelData> = deserialize_list(&path, "fuels")?;
        let mut seen: HashMap<String, ()> = HashMap::new();
        for fuel in &fuels {
            check_duplicate(&seen, &fuel.name, &path)?;
            builder.register_fuel(&fuel.name, fuel.duration, fuel.temperature);
            seen.insert(fuel.name.clone(), ());
        }
    }

    // Device configuration.
    let devices = match find_data_file(dir, "devices")? {
        Some(path) => deserialize_file(&path)?,
        None => DeviceConfig::default(),
    };
    devices.validate()?;

    let catalog = builder.build()?;
    info!(
        "loaded smeltery data from {}: {} components, {} recipes, {} fuels",
        dir.display(),
        catalog.component_count(),
        catalog.recipe_count(),
        catalog.fuel_count()
    );
    Ok(GameData { catalog, devices })
}

// ===========================================================================
// Tests
// ===========================================================================
