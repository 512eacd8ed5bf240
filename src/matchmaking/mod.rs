//! Matchmaking core: waiting pool, pairing coordinator, and notification relay
//!
//! This module contains the concurrency-critical heart of the service. The
//! pool is the only structure shared across connection tasks; coordinators
//! communicate with each other exclusively through it and through the
//! one-shot relays enrolled alongside each waiting entry.

pub mod coordinator;
pub mod pool;
pub mod relay;

pub use coordinator::{CoordinatorStats, MatchCoordinator};
pub use pool::{ClaimedEntry, WaitingPool};
pub use relay::{RelayReceiver, RelaySender};
