use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Safeguards for marking-graph exploration.
///
/// The predicate builder always aborts on strict coverage; for plain nets the
/// check is opt-in through `coverability_check`.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ExplorationConfig {
    /// Give up once this many distinct markings have been discovered.
    /// `None` means no limit.
    pub state_limit: Option<usize>,
    /// Abort a plain-net exploration as soon as a new marking strictly covers
    /// an already discovered one.
    pub coverability_check: bool,
}

impl ExplorationConfig {
    /// Reads a TOML file. A missing file yields the defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_state_limit(mut self, limit: Option<usize>) -> Self {
        self.state_limit = limit;
        self
    }

    pub fn with_coverability_check(mut self, enabled: bool) -> Self {
        self.coverability_check = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ExplorationConfig::from_toml_str("").unwrap();
        assert_eq!(config, ExplorationConfig::default());
        assert_eq!(config.state_limit, None);
        assert!(!config.coverability_check);
    }

    #[test]
    fn toml_fields_are_read() {
        let config =
            ExplorationConfig::from_toml_str("state_limit = 50\ncoverability_check = true\n")
                .unwrap();
        assert_eq!(config.state_limit, Some(50));
        assert!(config.coverability_check);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config =
            ExplorationConfig::load_from_file("/nonexistent/markgraph/config.toml").unwrap();
        assert_eq!(config, ExplorationConfig::default());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(ExplorationConfig::from_toml_str("state_limit = \"many\"").is_err());
    }
}
