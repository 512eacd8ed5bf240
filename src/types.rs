//! Common types used throughout the gunfight matchmaking service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for participants
pub type ParticipantId = String;

/// Unique identifier for recorded gunfights
pub type MatchId = Uuid;

/// Comparability score used for pairing (current in-game currency holdings)
pub type Score = u64;

/// A participant waiting in the pool for an opponent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitingEntry {
    pub participant_id: ParticipantId,
    pub score: Score,
    pub enrolled_at: DateTime<Utc>,
}

/// Validated identity handed over by the session authenticator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub participant_id: ParticipantId,
    pub score: Score,
}

/// Terminal outcome of one matchmaking attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// A compatible opponent was found and the gunfight was recorded
    Paired {
        opponent_id: ParticipantId,
        match_id: MatchId,
    },
    /// No compatible opponent arrived within the search timeout
    TimedOut,
    /// The participant's connection closed before an opponent arrived
    Cancelled,
}

/// One-shot message handed from the finder's coordinator to the waiting side
///
/// Created the instant a compatible peer is found and consumed exactly once;
/// the relay it travels over cannot deliver it twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingNotification {
    /// The opponent recorded a gunfight with this participant
    Matched {
        opponent_id: ParticipantId,
        match_id: MatchId,
    },
    /// The opponent reserved this participant but match persistence failed
    RecorderFailed { opponent_id: ParticipantId },
}
