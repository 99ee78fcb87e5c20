//! Registry configuration via `metaindex.toml`
//!
//! A registry is configured with limits and diagnostics switches. The
//! configuration can be built in code, parsed from a TOML string, or read from
//! a `metaindex.toml` file. Missing fields fall back to their defaults.

use metaindex_core::{IndexError, Limits, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name conventionally used for registry configuration.
pub const CONFIG_FILE_NAME: &str = "metaindex.toml";

/// Registry configuration loaded from `metaindex.toml`.
///
/// # Example
///
/// ```toml
/// # Log every index dump at debug level after a registry is built
/// dump_after_build = false
///
/// [limits]
/// max_key_depth = 16
/// max_autofill_combinations = 10000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RegistryConfig {
    /// Emit a debug-level dump of every index after `build`.
    #[serde(default)]
    pub dump_after_build: bool,
    /// Depth and fan-out limits.
    #[serde(default)]
    pub limits: Limits,
}

impl RegistryConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# metaindex registry configuration
#
# Log every index dump (title, key types, entries) at debug level after a
# registry is built. Useful while wiring extraction rules.
dump_after_build = false

[limits]
# Maximum number of key types in one index.
max_key_depth = 16

# Maximum number of key sequences one autofill call may derive.
max_autofill_combinations = 10000
"#
    }

    /// Parse a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the text is not valid TOML for this structure.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| IndexError::config(format!("Failed to parse config: {}", e)))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            IndexError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            IndexError::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                IndexError::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| IndexError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            IndexError::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
