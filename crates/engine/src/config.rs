use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::EngineError;

/// Configuration for question selection and tree training
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Depth budget for the decision tree (root starts here, counts down)
    pub max_depth: usize,

    /// Pools at or below this size are answered with an enumeration question
    pub list_threshold: usize,

    /// Follow the trained tree before falling back to the catalogue
    pub use_tree: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            list_threshold: 5,
            use_tree: true,
        }
    }
}

impl EngineConfig {
    /// Config that never consults a trained tree
    pub fn catalogue_only() -> Self {
        Self {
            use_tree: false,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), EngineError> {
        if self.list_threshold == 0 {
            return Err(EngineError::invalid_config(
                "list_threshold must be > 0 so a single remaining player can be enumerated",
            ));
        }
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read engine config {}", path.display()))?;
        Self::from_bytes(&bytes)
            .with_context(|| format!("Engine config {} is not valid", path.display()))
    }

    /// Parse a JSON or TOML document.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let config: Self = match serde_json::from_slice(bytes) {
            Ok(config) => config,
            Err(json_err) => {
                let utf8 =
                    std::str::from_utf8(bytes).map_err(|err| anyhow!("{json_err}; {err}"))?;
                toml::from_str(utf8).map_err(|toml_err| {
                    anyhow!("Config is not valid JSON or TOML ({json_err}); TOML parse error: {toml_err}")
                })?
            }
        };
        config.validate()?;
        Ok(config)
    }
}
