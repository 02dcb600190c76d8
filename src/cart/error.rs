//! Error types for cart persistence.

use thiserror::Error;

/// Errors raised by a [`KeyValueStore`](super::KeyValueStore).
///
/// The cart store catches these at its boundary and only logs them; they
/// never reach callers of the cart mutators.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cart serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage quota exceeded for {key}: needed {needed} bytes, quota {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
