use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Vehicle not found: {0:?}")]
    VehicleNotFound(crate::core::types::VehicleId),

    #[error("Slot not found: {0:?}")]
    SlotNotFound(crate::core::types::SlotId),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Layout parse error: {0}")]
    LayoutParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AssemblyError>;
