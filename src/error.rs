//! Error taxonomy for the search pipeline and the tracking store.

use thiserror::Error;

/// Failure of a single catalog provider call.
///
/// Recovered inside the search aggregator: the provider contributes zero
/// records and aggregation proceeds. Never surfaced from `search`.
#[derive(Debug, Error)]
#[error("{provider}: {message}")]
pub struct ProviderError {
    pub provider: &'static str,
    pub message: String,
}

impl ProviderError {
    pub fn new(provider: &'static str, message: impl Into<String>) -> Self {
        Self {
            provider,
            message: message.into(),
        }
    }
}

/// Errors surfaced by tracking-list operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A required field is missing on create/edit. The store is untouched.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Edit or artwork update against a title with no live entry.
    #[error("no tracked entry titled '{0}'")]
    NotFound(String),
    /// Transaction failure; the store is left in its pre-operation state.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}
