//! Error types

mod api;
mod field;
mod table;

use std::time::Duration;

pub use api::*;
pub use field::*;
pub use table::*;

/// Crate-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A catalog request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The catalog kept answering 429 after all retries were spent.
    #[error("Rate limited (retry after {retry_after:?})")]
    RateLimit {
        /// Server-provided `Retry-After`, if any.
        retry_after: Option<Duration>,
    },

    /// A row field could not be read or written.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// A table command was rejected.
    #[error(transparent)]
    Table(#[from] TableError),

    /// CSV encoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing an export failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` if this error is a transient catalog failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(api) => api.is_retryable(),
            Self::RateLimit { .. } => true,
            _ => false,
        }
    }
}
