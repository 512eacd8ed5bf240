//! Quickdraw - Matchmaking microservice for head-to-head gunfight duels
//!
//! This crate pairs online participants by comparable in-game wealth over
//! long-lived WebSocket sessions, with a shared waiting pool, per-attempt
//! timeout and cancellation handling, and exactly-once pairing notification
//! between independently-connected clients.

pub mod config;
pub mod error;
pub mod matchmaking;
pub mod recorder;
pub mod service;
pub mod session;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{MatchmakingError, Result};
pub use types::*;

// Re-export key components
pub use matchmaking::{MatchCoordinator, WaitingPool};
pub use recorder::{InMemoryMatchRecorder, MatchRecorder};
pub use service::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
