//! Service layer for the quickdraw matchmaking service
//!
//! This module contains the main application state, router construction,
//! and the health endpoint for the production service.

pub mod app;
pub mod health;

pub use app::AppState;
pub use health::{HealthCheck, HealthStatus};
