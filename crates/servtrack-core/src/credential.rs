//! Credential store trait.
//!
//! Defines the interface for scoped secret storage of the bearer token.

use crate::error::Result;

/// An abstract store for the bearer credential.
///
/// This trait decouples the client from the concrete secret-storage
/// mechanism (in-memory, token file, OS keychain). The three operations are
/// independently atomic; there is no compare-and-swap, so concurrent writers
/// observe last-writer-wins semantics.
///
/// # Security Note
///
/// Implementations should ensure that:
/// - Persisted token files have appropriate permissions (e.g., 600 on Unix)
/// - Tokens are never logged or exposed in error messages
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Reads the stored credential.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(token))`: A credential is stored
    /// - `Ok(None)`: No credential is stored
    /// - `Err(_)`: The store could not be read
    async fn get(&self) -> Result<Option<String>>;

    /// Stores a credential, replacing any previous one.
    async fn set(&self, token: &str) -> Result<()>;

    /// Deletes the stored credential.
    ///
    /// Deleting when no credential is stored is not an error.
    async fn delete(&self) -> Result<()>;
}
