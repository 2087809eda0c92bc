//! Devices of a smeltery workshop and the host that steps them.
//!
//! A [`Workshop`] owns [`Device`]s in a slotmap and a list of heat links.
//! Forges are heat sources; crucibles implement [`HeatConsumer`] and melt,
//! hold and pour a [`Mixture`](smeltery_core::Mixture).

pub mod config;
pub mod consumer;
pub mod crucible;
pub mod device;
pub mod error;
pub mod forge;
pub mod id;
pub mod workshop;

pub use config::{CrucibleConfig, DeviceConfig, ForgeConfig};
pub use consumer::HeatConsumer;
pub use crucible::Crucible;
pub use device::Device;
pub use error::DeviceError;
pub use forge::Forge;
pub use id::DeviceId;
pub use workshop::{DeviceEvent, HeatLink, Workshop};
