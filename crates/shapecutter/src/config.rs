//! Configuration for the cutter.

use serde::{Deserialize, Serialize};

/// Configuration for a [`Cutter`](crate::Cutter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutterConfig {
    /// Return `None` instead of an error when the boundary stage of a cut
    /// fails.
    pub ignore_errors: bool,

    /// Number of resolved geometry lookups kept by record-backed providers.
    pub geometry_cache_size: usize,
}

impl Default for CutterConfig {
    fn default() -> Self {
        Self {
            ignore_errors: true,
            geometry_cache_size: 1024,
        }
    }
}

impl CutterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SHAPECUTTER_IGNORE_ERRORS") {
            config.ignore_errors = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("SHAPECUTTER_GEOMETRY_CACHE_SIZE") {
            if let Ok(size) = val.parse() {
                config.geometry_cache_size = size;
            }
        }

        config
    }

    /// Propagate boundary-stage failures instead of swallowing them.
    pub fn strict(mut self) -> Self {
        self.ignore_errors = false;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.geometry_cache_size == 0 {
            return Err("geometry_cache_size must be > 0".to_string());
        }

        Ok(())
    }
}
