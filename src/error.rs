//! Error types for the gunfight matchmaking service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

use crate::types::ParticipantId;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific matchmaking scenarios
#[derive(Debug, thiserror::Error)]
pub enum MatchmakingError {
    #[error("Participant already searching: {participant_id}")]
    DuplicateParticipant { participant_id: ParticipantId },

    #[error("Match recorder failed: {message}")]
    RecorderFailure { message: String },

    #[error("Invalid session: {reason}")]
    InvalidSession { reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}
