use narration_domain::DomainError;
use thiserror::Error;

/// Audio payload rejected by the decoder. The controller is left as it was
/// before the failed `load()`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("audio could not be loaded: {source}")]
pub struct LoadError {
    #[source]
    pub source: DomainError,
}

impl From<DomainError> for LoadError {
    fn from(source: DomainError) -> Self {
        Self { source }
    }
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
