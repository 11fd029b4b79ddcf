//! Typed HTTP client for the Fleetcheck API.
//!
//! [`gateway::FleetcheckClient`] maps one method to each endpoint.
//! [`context::ClientContext`] is the state a front end holds: who is signed
//! in, which screen is showing, and the record being captured or signed.

pub mod context;
pub mod error;
pub mod gateway;
pub mod models;

pub use context::{AuthSession, ClientContext};
pub use error::ClientError;
pub use gateway::FleetcheckClient;
