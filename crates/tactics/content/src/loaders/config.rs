//! Tactics configuration loader.

use std::path::Path;

use tactics_core::TacticsConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for tactics configuration from TOML files.
///
/// Missing tables and fields take their defaults, so a file only needs to
/// list the values it changes.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing a `TacticsConfig`
    ///
    /// # Returns
    ///
    /// Returns the configuration as written. Out-of-range values are not
    /// rejected here; callers decide between `sanitized()` and `validate()`.
    pub fn load(path: &Path) -> LoadResult<TacticsConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Parse config data from a TOML string.
    pub fn parse(content: &str) -> LoadResult<TacticsConfig> {
        let config: TacticsConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }

    /// Render a configuration as TOML.
    pub fn to_toml(config: &TacticsConfig) -> LoadResult<String> {
        toml::to_string_pretty(config)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config TOML: {}", e))
    }
}
