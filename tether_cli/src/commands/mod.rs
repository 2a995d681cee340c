pub mod check;
pub mod connect;
pub mod providers;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Provider '{0}' not found")]
    ProviderNotFound(String),

    #[error("Invalid storage record: {0}")]
    InvalidStorage(String),

    #[error("{0} field(s) failed validation")]
    ValidationFailed(usize),

    #[error("Core library error: {0}")]
    Core(#[from] tether_core::WizardError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;
