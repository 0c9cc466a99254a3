//! Default filesystem locations for client state.
//!
//! Centralizes path resolution so the CLI and any embedding application
//! agree on where configuration and the token file live.

use std::path::{Path, PathBuf};

use servtrack_core::error::{Result, ServtrackError};

const APP_DIR: &str = "servtrack";
const CREDENTIALS_FILE: &str = "credentials.json";
const CONFIG_FILE: &str = "config.toml";

/// Resolver for servtrack's on-disk locations.
///
/// With no base path, everything lives under the platform config directory
/// (`~/.config/servtrack` on Linux). Tests pass an explicit base.
pub struct ServtrackPaths {
    base: PathBuf,
}

impl ServtrackPaths {
    /// Creates a resolver rooted at `base`, or at the platform default when
    /// `base` is `None`.
    pub fn new(base: Option<&Path>) -> Result<Self> {
        let base = match base {
            Some(path) => path.to_path_buf(),
            None => dirs::config_dir()
                .ok_or_else(|| ServtrackError::storage("no config directory on this platform"))?
                .join(APP_DIR),
        };
        Ok(Self { base })
    }

    /// Location of the persisted bearer token.
    pub fn credentials_file(&self) -> PathBuf {
        self.base.join(CREDENTIALS_FILE)
    }

    /// Location of the client configuration file.
    pub fn config_file(&self) -> PathBuf {
        self.base.join(CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_base() {
        let paths = ServtrackPaths::new(Some(Path::new("/tmp/st"))).unwrap();
        assert_eq!(
            paths.credentials_file(),
            PathBuf::from("/tmp/st/credentials.json")
        );
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/st/config.toml"));
    }
}
