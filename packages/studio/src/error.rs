use thiserror::Error;

/// Failure reported by a role or artist store backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("record not found: {0}")]
    NotFound(String),
}

impl StoreError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}
