use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvoSearchError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Contract violation: {0}")]
    Contract(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Speciation is not implemented; do not supply a species-position function")]
    SpeciationUnimplemented,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EvoSearchError>;
