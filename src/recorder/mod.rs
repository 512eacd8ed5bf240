//! Match record persistence interface and implementations
//!
//! This module defines the boundary to the collaborator that persists a
//! finished pairing as a gunfight record. Matchmaking only ever calls
//! `create_match`, once per successful pairing, from the finder's side; the
//! real database-backed implementation lives outside this crate, and an
//! in-memory implementation is provided for development and tests.

use crate::error::Result;
use crate::types::{MatchId, ParticipantId};
use crate::utils::{current_timestamp, generate_match_id};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tracing::info;

/// A persisted gunfight pairing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub participant_a: ParticipantId,
    pub participant_b: ParticipantId,
    pub created_at: DateTime<Utc>,
}

/// Trait for persisting completed pairings
#[async_trait]
pub trait MatchRecorder: Send + Sync {
    /// Persist a new gunfight between two participants, returning its ID
    async fn create_match(
        &self,
        participant_a: &ParticipantId,
        participant_b: &ParticipantId,
    ) -> Result<MatchId>;
}

/// In-memory match recorder
#[derive(Debug, Default)]
pub struct InMemoryMatchRecorder {
    records: RwLock<Vec<MatchRecord>>,
}

impl InMemoryMatchRecorder {
    /// Create a new empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// All records created so far (for health reporting and tests)
    pub fn all_records(&self) -> Vec<MatchRecord> {
        self.records
            .read()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Number of records created so far
    pub fn record_count(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }
}

#[async_trait]
impl MatchRecorder for InMemoryMatchRecorder {
    async fn create_match(
        &self,
        participant_a: &ParticipantId,
        participant_b: &ParticipantId,
    ) -> Result<MatchId> {
        let record = MatchRecord {
            id: generate_match_id(),
            participant_a: participant_a.clone(),
            participant_b: participant_b.clone(),
            created_at: current_timestamp(),
        };
        let match_id = record.id;

        info!(
            "Recorded gunfight {} between '{}' and '{}'",
            match_id, participant_a, participant_b
        );

        self.records
            .write()
            .map_err(|_| crate::error::MatchmakingError::InternalError {
                message: "Match record store lock poisoned".to_string(),
            })?
            .push(record);

        Ok(match_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_match_assigns_unique_ids() {
        let recorder = InMemoryMatchRecorder::new();

        let first = recorder
            .create_match(&"jesse".to_string(), &"billy".to_string())
            .await
            .unwrap();
        let second = recorder
            .create_match(&"wyatt".to_string(), &"doc".to_string())
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(recorder.record_count(), 2);

        let records = recorder.all_records();
        assert_eq!(records[0].participant_a, "jesse");
        assert_eq!(records[0].participant_b, "billy");
    }
}
