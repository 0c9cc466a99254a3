//! Concrete adapters for the servtrack client: the reqwest-backed HTTP
//! transport, credential stores, configuration loading, and path
//! resolution.

pub mod config;
pub mod credentials;
pub mod paths;
pub mod reqwest_transport;

pub use config::ClientConfig;
pub use credentials::{FileCredentialStore, MemoryCredentialStore};
pub use paths::ServtrackPaths;
pub use reqwest_transport::ReqwestTransport;
