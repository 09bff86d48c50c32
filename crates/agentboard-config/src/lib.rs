//! Configuration for agentboard.
//!
//! Settings are read from `~/.agentboard/config.yaml` when it exists. Every
//! field is optional and falls back to the built-in defaults, so a missing file
//! behaves exactly like the constants below.
//!
//! The dashboard itself only ever needs those fixed constants. Overriding them
//! is an extension on top: the YAML file and the `--base-url` /
//! `--poll-interval-ms` flags both replace the defaults, with flags applied
//! last. Leaving both out keeps the fixed backend address and 3000 ms cadence.
//!
//! ```yaml
//! backend:
//!   base_url: http://localhost:5050
//!   assignee: AI-Agent
//! dashboard:
//!   poll_interval_ms: 3000
//!   theme: dark
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use agentboard_core::logging::agentboard_home;
use agentboard_core::{BoardError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Workflow backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5050";

/// Interval between issue list refreshes.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;

/// Assignee sent with `POST /run_tasks`.
pub const DEFAULT_ASSIGNEE: &str = "AI-Agent";

/// Shortest poll interval accepted by validation.
pub const MIN_POLL_INTERVAL_MS: u64 = 100;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Where and how to reach the workflow backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL without trailing slash
    pub base_url: String,

    /// Request timeout in seconds; `None` uses the HTTP client default
    pub timeout_secs: Option<u64>,

    /// Assignee for triggered workflow runs
    pub assignee: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            assignee: DEFAULT_ASSIGNEE.to_string(),
        }
    }
}

impl BackendConfig {
    /// Override the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Dashboard behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Refresh interval in milliseconds
    pub poll_interval_ms: u64,

    /// Theme name (default, dark, light)
    pub theme: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            theme: "default".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Refresh interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Default config file path (`~/.agentboard/config.yaml`).
pub fn config_path() -> Result<PathBuf> {
    Ok(agentboard_home()?.join("config.yaml"))
}

impl BoardConfig {
    /// Load from the default path, falling back to defaults when it is absent.
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BoardError::config_not_found_with_source(path, e)
            } else {
                BoardError::io("reading config", path, e)
            }
        })?;

        let config = Self::parse(&content).map_err(|e| BoardError::ConfigInvalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse YAML content. An empty document yields the defaults.
    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Check values that would make the dashboard misbehave.
    pub fn validate(&self) -> Result<()> {
        let url = self.backend.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BoardError::config_validation(format!(
                "backend.base_url must start with http:// or https://, got '{url}'"
            )));
        }

        if self.dashboard.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(BoardError::config_validation(format!(
                "dashboard.poll_interval_ms must be >= {MIN_POLL_INTERVAL_MS}, got {}",
                self.dashboard.poll_interval_ms
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_constants() {
        let config = BoardConfig::default();
        assert_eq!(config.backend.base_url, "http://localhost:5050");
        assert_eq!(config.backend.assignee, "AI-Agent");
        assert_eq!(config.backend.timeout(), None);
        assert_eq!(config.dashboard.poll_interval(), Duration::from_millis(3000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = BoardConfig::parse("dashboard:\n  theme: dark\n").unwrap();
        assert_eq!(config.dashboard.theme, "dark");
        assert_eq!(config.dashboard.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(config.backend.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(BoardConfig::parse("  \n").unwrap(), BoardConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "backend:\n  base_url: https://workflow.internal:8443\n  timeout_secs: 10\n"
        )
        .unwrap();

        let config = BoardConfig::load_from(file.path()).unwrap();
        assert_eq!(config.backend.base_url, "https://workflow.internal:8443");
        assert_eq!(config.backend.timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = BoardConfig::load_from(Path::new("/nonexistent/agentboard.yaml")).unwrap_err();
        assert!(matches!(err, BoardError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "dashboard: [unterminated").unwrap();
        let err = BoardConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, BoardError::ConfigInvalid { .. }));
    }

    #[test]
    fn test_validation_rejects_short_interval() {
        let mut config = BoardConfig::default();
        config.dashboard.poll_interval_ms = 10;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("poll_interval_ms"));
    }

    #[test]
    fn test_validation_rejects_non_http_url() {
        let mut config = BoardConfig::default();
        config.backend = config.backend.with_base_url("ftp://example.com");
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_load_without_file_uses_defaults() {
        let home = tempfile::tempdir().unwrap();
        // SAFETY: serialized with every other test that touches HOME
        unsafe { std::env::set_var("HOME", home.path()) };
        assert_eq!(BoardConfig::load().unwrap(), BoardConfig::default());
    }
}
