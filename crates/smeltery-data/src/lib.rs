//! Data-file loading for smeltery content.
//!
//! A data directory holds up to four files, each in RON, JSON or TOML:
//!
//! | Base name    | Required | Contents                          |
//! |--------------|----------|-----------------------------------|
//! | `components` | yes      | components and melt temperatures  |
//! | `recipes`    | no       | mixture ratio recipes, in order   |
//! | `fuels`      | no       | fuel durations and temperatures   |
//! | `devices`    | no       | [`DeviceConfig`](smeltery_devices::DeviceConfig) overrides |
//!
//! [`load_game_data`] resolves every name reference and returns a validated
//! [`Catalog`](smeltery_core::Catalog) plus device configuration.

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, GameData, load_game_data};
