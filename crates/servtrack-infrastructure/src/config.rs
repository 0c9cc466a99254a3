//! Client configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use servtrack_core::error::{Result, ServtrackError};

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Configuration for the servtrack client.
///
/// Loaded from a TOML file; every field has a default so a missing file or
/// a partial file both work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API, including the `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Override for the token file location.
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            credentials_path: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config file at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(ServtrackError::internal(format!(
                    "failed to read config {path:?}: {err}"
                )))
            }
        };
        toml::from_str(&contents)
            .map_err(|err| ServtrackError::internal(format!("invalid config {path:?}: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000/api");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.credentials_path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"https://tracker.example.com/api\"").unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.base_url, "https://tracker.example.com/api");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = \"soon\"").unwrap();
        assert!(ClientConfig::load(file.path()).is_err());
    }
}
