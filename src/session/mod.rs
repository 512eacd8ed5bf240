//! Session layer: connection ownership and identity
//!
//! This module owns the one live WebSocket per participant and the boundary
//! to the authentication collaborator that supplies a validated identity
//! before matchmaking begins.

pub mod auth;
pub mod gateway;

pub use auth::{HeaderSessionAuthenticator, SessionAuthenticator};
