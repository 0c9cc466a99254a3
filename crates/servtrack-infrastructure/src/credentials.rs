//! Credential store implementations.
//!
//! Two implementations of the `CredentialStore` seam: an in-memory store
//! for ephemeral sessions and tests, and a JSON token file for persistence
//! across process restarts.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use servtrack_core::credential::CredentialStore;
use servtrack_core::error::{Result, ServtrackError};

/// Credential store that lives only as long as the process.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    token: Arc<RwLock<Option<String>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a token, for session-restore tests.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(token.into()))),
        }
    }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self) -> Result<Option<String>> {
        let guard = self
            .token
            .read()
            .map_err(|_| ServtrackError::storage("credential lock poisoned"))?;
        Ok(guard.clone())
    }

    async fn set(&self, token: &str) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| ServtrackError::storage("credential lock poisoned"))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| ServtrackError::storage("credential lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

/// On-disk shape of the token file.
#[derive(Serialize, Deserialize)]
struct TokenFile {
    token: String,
}

/// Credential store backed by a JSON token file.
///
/// The file is created with 0600 permissions on Unix. Deletion of an
/// already-missing file is not an error.
#[derive(Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store using the given token file path. Parent directories
    /// are created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The token file location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self) -> Result<Option<String>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let file: TokenFile = serde_json::from_slice(&bytes).map_err(|err| {
                    ServtrackError::storage(format!("malformed token file: {err}"))
                })?;
                Ok(Some(file.token))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let payload = serde_json::to_vec(&TokenFile {
            token: token.to_string(),
        })?;
        tokio::fs::write(&self.path, payload).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&self.path, permissions).await?;
        }

        tracing::debug!("stored credential at {:?}", self.path);
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!("deleted credential at {:?}", self.path);
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get().await.unwrap(), None);

        store.set("t1").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("t1"));

        store.set("t2").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("t2"));

        store.delete().await.unwrap();
        assert_eq!(store.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));

        assert_eq!(store.get().await.unwrap(), None);

        store.set("secret-token").await.unwrap();
        assert_eq!(
            store.get().await.unwrap().as_deref(),
            Some("secret-token")
        );

        store.delete().await.unwrap();
        assert_eq!(store.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));

        store.delete().await.unwrap();
        store.set("t1").await.unwrap();
        store.delete().await.unwrap();
        store.delete().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested/deeper/credentials.json"));
        store.set("t1").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("t1"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        store.set("t1").await.unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_file_store_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let store = FileCredentialStore::new(&path);
        let err = store.get().await.unwrap_err();
        assert!(err.is_storage());
    }
}
