//! Error types for fallible façade operations
//!
//! Malformed primitive values are not errors; they fall back to the
//! caller's default. Only store failures, JSON failures and config loading
//! surface here.

use crate::store::StoreError;

/// Errors from [`Prefs`](crate::Prefs) and [`PrefsConfig`](crate::PrefsConfig)
#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    /// The backing store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// JSON serialization or deserialization of a stored object failed
    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file could not be read
    #[error("settings config IO error: {0}")]
    ConfigIo(#[source] std::io::Error),

    /// Config file is not valid TOML for [`PrefsConfig`](crate::PrefsConfig)
    #[cfg(feature = "toml")]
    #[error("settings config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result type for façade operations
pub type PrefsResult<T> = Result<T, PrefsError>;
