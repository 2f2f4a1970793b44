//! Errors produced by the cache layer.

use thiserror::Error;

/// Errors produced by cache stores and the response codec.
///
/// Only [`Decode`](CacheError::Decode) ever reaches a client, as a
/// `500 Internal Server Error`; the middleware treats every other variant
/// raised by a read as a cache miss.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("no cache entry for key {id}")]
    NotFound { id: String },

    #[error("cached response could not be decoded: {0}")]
    Decode(String),

    #[error("cache backend failure: {0}")]
    Backend(String),
}

impl From<httparse::Error> for CacheError {
    fn from(err: httparse::Error) -> Self {
        CacheError::Decode(err.to_string())
    }
}

impl CacheError {
    pub(crate) fn not_found(id: impl Into<String>) -> Self {
        CacheError::NotFound { id: id.into() }
    }

    /// Returns `true` when the error only means the key is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound { .. })
    }
}
