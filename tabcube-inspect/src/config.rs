//! Inspection configuration
//!
//! Loaded from TOML; every field has a default so an empty file (or no file)
//! is valid.
//!
//! ```toml
//! [fetch]
//! timeout_secs = 30
//!
//! [fetch.fallbacks]
//! "http://example.org/def/area.ttl" = "vendor/area.ttl"
//!
//! [display]
//! max_tree_nodes = 100
//! ```

use crate::error::{InspectError, InspectResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InspectConfig {
    pub fetch: FetchConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Timeout for remote document fetches
    pub timeout_secs: u64,
    /// Remote location -> local file used instead of the network
    pub fallbacks: BTreeMap<String, PathBuf>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            fallbacks: BTreeMap::new(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Concept trees larger than this are summarized instead of drawn
    pub max_tree_nodes: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { max_tree_nodes: 100 }
    }
}

impl InspectConfig {
    pub fn from_toml_str(input: &str, path: &Path) -> InspectResult<Self> {
        toml::from_str(input).map_err(|e| InspectError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load a config file; relative fallback paths resolve against its directory
    pub fn load(path: &Path) -> InspectResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| InspectError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut config = Self::from_toml_str(&raw, path)?;

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        for local in config.fetch.fallbacks.values_mut() {
            if local.is_relative() {
                *local = dir.join(&*local);
            }
        }
        tracing::debug!(path = %path.display(), fallbacks = config.fetch.fallbacks.len(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = InspectConfig::from_toml_str("", Path::new("tabcube.toml")).unwrap();
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.display.max_tree_nodes, 100);
        assert!(config.fetch.fallbacks.is_empty());
    }

    #[test]
    fn fallbacks_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tabcube.toml");
        std::fs::write(
            &path,
            r#"
            [fetch]
            timeout_secs = 5

            [fetch.fallbacks]
            "http://example.org/def/area.ttl" = "vendor/area.ttl"
            "#,
        )
        .unwrap();

        let config = InspectConfig::load(&path).unwrap();
        assert_eq!(config.fetch.timeout(), Duration::from_secs(5));
        assert_eq!(
            config.fetch.fallbacks["http://example.org/def/area.ttl"],
            dir.path().join("vendor/area.ttl")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = InspectConfig::from_toml_str("[display]\nmax_nodes = 3", Path::new("x.toml"))
            .unwrap_err();
        assert!(matches!(err, InspectError::Config { .. }));
    }
}
