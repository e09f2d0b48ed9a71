use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("audio decode failed: {0}")]
    Decode(String),
}

impl DomainError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}
