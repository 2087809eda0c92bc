use smeltery_core::id::ComponentId;
use smeltery_core::validation::ConfigError;

use crate::id::DeviceId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeviceError {
    #[error("device not found: {0:?}")]
    NotFound(DeviceId),
    #[error("device {0:?} is not a {1}")]
    WrongKind(DeviceId, &'static str),
    #[error("all {0} fuel slots are full")]
    FuelSlotsFull(usize),
    #[error("component {0:?} is not in the catalog")]
    UnknownComponent(ComponentId),
    #[error("too cold to melt {component:?}: {temperature} °C < {melt_temperature} °C")]
    TooCold {
        component: ComponentId,
        temperature: f64,
        melt_temperature: f64,
    },
    #[error("contents are not molten: {temperature} °C <= {melt_temperature} °C")]
    NotMolten {
        temperature: f64,
        melt_temperature: f64,
    },
    #[error("invalid heat link: {0}")]
    InvalidLink(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
