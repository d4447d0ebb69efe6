use crate::error::{BatchlensError, Result};
use crate::policy::DEFAULT_HISTORY_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Service settings, read from a JSON file. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Address the REST server binds to.
    pub bind_address: String,
    /// Step executions read from the store per page while building history.
    pub history_page_size: usize,
    /// Page size of list endpoints when the client does not send one.
    pub default_page_size: usize,
    /// JSON snapshot used to seed the in-memory store.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            history_page_size: DEFAULT_HISTORY_PAGE_SIZE,
            default_page_size: 20,
            snapshot_path: None,
        }
    }
}

impl MonitoringConfig {
    /// `~/.batchlens/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".batchlens").join("config.json"))
    }

    /// Load from `path`, or from [`MonitoringConfig::default_path`] when no
    /// path is given. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_json(&std::fs::read_to_string(path)?)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(default) => Self::from_json(&std::fs::read_to_string(default)?)?,
                None => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.history_page_size == 0 {
            warn!("history_page_size must be positive");
            return Err(BatchlensError::Config(
                "history_page_size must be at least 1".to_string(),
            ));
        }
        if self.default_page_size == 0 {
            return Err(BatchlensError::Config(
                "default_page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MonitoringConfig::default();
        assert_eq!(config.history_page_size, 1000);
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert!(config.snapshot_path.is_none());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = MonitoringConfig::from_json(r#"{"history_page_size": 50}"#).unwrap();
        assert_eq!(config.history_page_size, 50);
        assert_eq!(config.default_page_size, 20);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = MonitoringConfig::from_json(r#"{"history_page_size": 0}"#).unwrap_err();
        assert!(matches!(err, BatchlensError::Config(_)));
    }

    #[test]
    fn load_reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"bind_address": "0.0.0.0:9000", "snapshot_path": "/tmp/snap.json"}"#,
        )
        .unwrap();

        let config = MonitoringConfig::load(Some(&path)).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:9000");
        assert_eq!(config.snapshot_path, Some(PathBuf::from("/tmp/snap.json")));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MonitoringConfig::load(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert!(matches!(err, BatchlensError::Io(_)));
    }
}
