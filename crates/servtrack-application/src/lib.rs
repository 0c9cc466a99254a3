//! Application layer of the servtrack client: the API gateway and the two
//! stores views consume.
//!
//! A view invokes an operation on [`session::SessionStore`] or
//! [`services::ServiceStore`]; the operation goes through
//! [`gateway::ApiGateway`], which attaches the stored credential and
//! classifies the reply; the store then publishes the resulting state (or
//! the error) through its observable cell and returns.

pub mod gateway;
pub mod services;
pub mod session;

#[cfg(test)]
pub(crate) mod testutil;

pub use gateway::ApiGateway;
pub use services::{ServiceStore, ServicesState};
pub use session::{SessionStore, SessionState};
