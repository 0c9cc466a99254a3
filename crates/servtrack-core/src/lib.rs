//! Core domain models and trait seams for the servtrack client.
//!
//! This crate holds everything the application layer and the infrastructure
//! adapters share: the error taxonomy, the user and service models, the
//! credential-store and HTTP-transport traits, and the observable state
//! container the stores publish through.

pub mod credential;
pub mod error;
pub mod service;
pub mod state;
pub mod transport;
pub mod user;

// Re-export common error type
pub use error::{Result, ServtrackError};
