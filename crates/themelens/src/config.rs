//! Client configuration
//!
//! Layering, lowest precedence first: built-in defaults, a JSON config file,
//! `THEMELENS_*` environment variables, then explicit command-line overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;

pub const ENV_SERVER_URL: &str = "THEMELENS_SERVER_URL";
pub const ENV_TIMEOUT_SECS: &str = "THEMELENS_TIMEOUT_SECS";
pub const ENV_MODEL: &str = "THEMELENS_MODEL";

/// Config files looked up in the working directory, in order.
const LOCAL_CONFIG_PATHS: [&str; 2] = ["themelens.json", ".themelens.json"];

/// Where the dashboard backend lives and which model to ask it about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
  /// Base URL of the backend (e.g., "http://localhost:5000")
  pub base_url: String,
  /// Request timeout in seconds
  pub timeout_secs: u64,
  /// Model name sent with every request
  pub model: String,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self { base_url: "http://localhost:5000".to_string(), timeout_secs: 30, model: "default".to_string() }
  }
}

impl ClientConfig {
  /// Load configuration from a file; fields it omits keep their defaults.
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path)
      .map_err(|source| ConfigError::Io { path: display.clone(), source })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse { path: display, source })
  }

  /// Resolve the full configuration.
  ///
  /// An explicit path must exist; otherwise the first discovered config file is
  /// used, falling back to defaults. Environment variables are applied last.
  pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
    let config = match explicit {
      Some(path) => Self::load_from_file(path)?,
      None => match discover_config_file() {
        Some(path) => {
          debug!(path = %path.display(), "Using discovered config file");
          Self::load_from_file(path)?
        }
        None => Self::default(),
      },
    };

    Ok(config.apply_env())
  }

  /// Override fields from `THEMELENS_*` environment variables.
  ///
  /// An unparseable timeout keeps the current value.
  pub fn apply_env(mut self) -> Self {
    if let Ok(url) = std::env::var(ENV_SERVER_URL) {
      self.base_url = url;
    }
    if let Ok(timeout) = std::env::var(ENV_TIMEOUT_SECS) {
      self.timeout_secs = timeout.trim().parse().unwrap_or(self.timeout_secs);
    }
    if let Ok(model) = std::env::var(ENV_MODEL) {
      self.model = model;
    }
    self
  }

  /// Apply command-line overrides.
  pub fn with_overrides(mut self, base_url: Option<String>, model: Option<String>) -> Self {
    if let Some(url) = base_url {
      self.base_url = url;
    }
    if let Some(model) = model {
      self.model = model;
    }
    self
  }
}

fn discover_config_file() -> Option<PathBuf> {
  LOCAL_CONFIG_PATHS
    .iter()
    .map(PathBuf::from)
    .chain(dirs::config_dir().map(|dir| dir.join("themelens").join("config.json")))
    .find(|path| path.exists())
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use std::env;
  use tempfile::TempDir;

  fn clear_env() {
    env::remove_var(ENV_SERVER_URL);
    env::remove_var(ENV_TIMEOUT_SECS);
    env::remove_var(ENV_MODEL);
  }

  #[test]
  fn test_defaults() {
    let config = ClientConfig::default();
    assert_eq!(config.base_url, "http://localhost:5000");
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(config.model, "default");
  }

  #[test]
  fn test_partial_file_keeps_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("themelens.json");
    std::fs::write(&path, r#"{ "model": "bertopic-v2" }"#).unwrap();

    let config = ClientConfig::load_from_file(&path).unwrap();
    assert_eq!(config.model, "bertopic-v2");
    assert_eq!(config.base_url, "http://localhost:5000");
  }

  #[test]
  fn test_missing_and_invalid_files_are_errors() {
    let temp = TempDir::new().unwrap();
    let missing = ClientConfig::load_from_file(temp.path().join("nope.json"));
    assert!(matches!(missing, Err(ConfigError::Io { .. })));

    let path = temp.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let broken = ClientConfig::load_from_file(&path);
    assert!(matches!(broken, Err(ConfigError::Parse { .. })));
  }

  #[test]
  #[serial]
  fn test_env_overrides_file() {
    clear_env();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.json");
    std::fs::write(&path, r#"{ "base_url": "http://file:1", "timeout_secs": 5 }"#).unwrap();

    env::set_var(ENV_SERVER_URL, "http://env:2");
    env::set_var(ENV_TIMEOUT_SECS, "not-a-number");
    let config = ClientConfig::load(Some(&path)).unwrap();
    clear_env();

    assert_eq!(config.base_url, "http://env:2");
    assert_eq!(config.timeout_secs, 5);
  }

  #[test]
  #[serial]
  fn test_cli_overrides_env() {
    clear_env();
    env::set_var(ENV_MODEL, "env-model");
    let config = ClientConfig::default()
      .apply_env()
      .with_overrides(Some("http://cli:3".to_string()), Some("cli-model".to_string()));
    clear_env();

    assert_eq!(config.base_url, "http://cli:3");
    assert_eq!(config.model, "cli-model");
  }
}
