//! Error types for storage operations.

use thiserror::Error;

/// Errors raised by stores, snapshots and caches.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// A value the caller required was not present.
    #[error("Key not found: {key}")]
    KeyNotFound {
        /// Hex rendering of the missing key.
        key: String,
    },

    /// `add` was called for a key that is already live in the cache.
    #[error("Key already exists: {key}")]
    DuplicateKey {
        /// Hex rendering of the duplicated key.
        key: String,
    },

    /// Raw bytes that cannot be decoded as a storage key.
    #[error("Invalid storage key: {message}")]
    InvalidKey {
        /// Error message.
        message: String,
    },

    /// A key builder ran past its maximum length.
    #[error("Key too large: current={current}, adding={adding}, max={max}")]
    KeyTooLarge {
        /// Current key length.
        current: usize,
        /// Bytes being added.
        adding: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// No store provider is registered under the requested name.
    #[error("Store provider not found: '{name}'")]
    ProviderNotFound {
        /// The requested provider name.
        name: String,
    },

    /// Invalid operation.
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Error message.
        message: String,
    },

    /// Backend-specific error.
    #[error("Storage backend error: {message}")]
    Backend {
        /// Error message from the backend.
        message: String,
    },
}

impl StorageError {
    /// Create a key not found error from raw key bytes.
    pub fn key_not_found(key: impl AsRef<[u8]>) -> Self {
        Self::KeyNotFound {
            key: hex::encode(key),
        }
    }

    /// Create a duplicate key error from raw key bytes.
    pub fn duplicate_key(key: impl AsRef<[u8]>) -> Self {
        Self::DuplicateKey {
            key: hex::encode(key),
        }
    }

    /// Create an invalid key error.
    pub fn invalid_key<S: Into<String>>(message: S) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }

    /// Create a provider not found error.
    pub fn provider_not_found<S: Into<String>>(name: S) -> Self {
        Self::ProviderNotFound { name: name.into() }
    }

    /// Create an invalid operation error.
    pub fn invalid_operation<S: Into<String>>(message: S) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Create a backend error.
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Returns true for the hard not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. })
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
