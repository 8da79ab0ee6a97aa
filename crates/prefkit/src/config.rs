//! Façade behavior settings
//!
//! ```toml
//! # prefkit.toml
//! always_flush = false
//! warn_on_malformed = true
//! ```

use serde::{Deserialize, Serialize};

#[cfg(feature = "toml")]
use crate::error::{PrefsError, PrefsResult};
#[cfg(feature = "toml")]
use std::path::Path;
#[cfg(feature = "toml")]
use tracing::debug;

/// Knobs for [`Prefs`](crate::Prefs)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefsConfig {
    /// Flush after every mutation, ignoring the per-call flag
    pub always_flush: bool,

    /// Log malformed stored values at `warn` (otherwise `debug`)
    pub warn_on_malformed: bool,
}

impl Default for PrefsConfig {
    fn default() -> Self {
        Self {
            always_flush: false,
            warn_on_malformed: true,
        }
    }
}

impl PrefsConfig {
    /// Parse a config from TOML text
    #[cfg(feature = "toml")]
    pub fn from_toml_str(content: &str) -> PrefsResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config file. A missing file yields the defaults.
    #[cfg(feature = "toml")]
    pub fn load(path: impl AsRef<Path>) -> PrefsResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No settings config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(PrefsError::ConfigIo)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::from_toml_str(&content)
    }
}
