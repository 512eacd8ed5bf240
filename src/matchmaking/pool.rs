//! The shared waiting pool of searching participants
//!
//! This module contains the one structure shared across all connection tasks:
//! an insertion-ordered multiset of waiting participants keyed by score. A
//! single mutex guards the whole pool, so `enroll`, `find_compatible`, and
//! `remove` are linearizable with respect to each other - two concurrent
//! `find_compatible` calls can never both select the same entry, and an entry
//! removed by a timing-out coordinator can never be handed to a finder that
//! races with the removal.

use crate::error::{MatchmakingError, Result};
use crate::matchmaking::relay::RelaySender;
use crate::types::{ParticipantId, Score, WaitingEntry};
use crate::utils::{current_timestamp, scores_within_band};
use std::sync::Mutex;
use tracing::{debug, warn};

/// A waiting participant together with the relay the finder will use
#[derive(Debug)]
struct PoolSlot {
    entry: WaitingEntry,
    relay: RelaySender,
}

/// A matched peer claimed from the pool
///
/// Produced only by `find_compatible`; holding one means the entry has
/// already been removed and its relay belongs to the caller.
#[derive(Debug)]
pub struct ClaimedEntry {
    pub entry: WaitingEntry,
    pub relay: RelaySender,
}

/// Concurrency-safe pool of participants waiting for an opponent
#[derive(Debug, Default)]
pub struct WaitingPool {
    // Vec preserves enrollment order; band queries pick the earliest hit.
    slots: Mutex<Vec<PoolSlot>>,
}

impl WaitingPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a participant into the pool
    ///
    /// Fails with `DuplicateParticipant` if the participant is already
    /// waiting; a participant has at most one live entry at any time.
    pub fn enroll(
        &self,
        participant_id: ParticipantId,
        score: Score,
        relay: RelaySender,
    ) -> Result<()> {
        let mut slots = self.lock_slots()?;

        if slots
            .iter()
            .any(|slot| slot.entry.participant_id == participant_id)
        {
            return Err(MatchmakingError::DuplicateParticipant { participant_id }.into());
        }

        debug!(
            "Enrolling participant '{}' with score {} ({} already waiting)",
            participant_id,
            score,
            slots.len()
        );

        slots.push(PoolSlot {
            entry: WaitingEntry {
                participant_id,
                score,
                enrolled_at: current_timestamp(),
            },
            relay,
        });

        Ok(())
    }

    /// Find, and atomically remove, a compatible waiting opponent
    ///
    /// Compatibility is a fixed percentage band around `score`. Within the
    /// band the earliest-enrolled entry wins, so long-waiting participants
    /// are never starved by closer score matches. Entries belonging to the
    /// requester itself are skipped - a participant cannot duel its own
    /// second connection.
    pub fn find_compatible(
        &self,
        requester_id: &ParticipantId,
        score: Score,
        tolerance: f64,
    ) -> Result<Option<ClaimedEntry>> {
        let mut slots = self.lock_slots()?;

        let position = slots.iter().position(|slot| {
            slot.entry.participant_id != *requester_id
                && scores_within_band(score, slot.entry.score, tolerance)
        });

        match position {
            Some(idx) => {
                // Removing under the same lock as the scan is what makes the
                // claim atomic; no other caller can select this entry.
                let slot = slots.remove(idx);
                debug!(
                    "Participant '{}' (score {}) claimed waiting opponent '{}' (score {})",
                    requester_id, score, slot.entry.participant_id, slot.entry.score
                );
                Ok(Some(ClaimedEntry {
                    entry: slot.entry,
                    relay: slot.relay,
                }))
            }
            None => Ok(None),
        }
    }

    /// Remove a participant from the pool
    ///
    /// Idempotent: removing an absent participant is not an error. Every
    /// coordinator calls this unconditionally on exit, and the entry may
    /// already have been claimed by a finder or removed earlier. Returns
    /// whether an entry was actually removed, so a timing-out coordinator
    /// can tell a genuine timeout from an entry a finder already claimed.
    pub fn remove(&self, participant_id: &ParticipantId) -> Result<bool> {
        let mut slots = self.lock_slots()?;
        let before = slots.len();
        slots.retain(|slot| slot.entry.participant_id != *participant_id);
        let removed = slots.len() < before;
        if removed {
            debug!("Removed participant '{}' from pool", participant_id);
        }
        Ok(removed)
    }

    /// Number of participants currently waiting
    pub fn len(&self) -> usize {
        self.read_slots(|slots| slots.len())
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a participant is currently waiting
    pub fn contains(&self, participant_id: &ParticipantId) -> bool {
        self.read_slots(|slots| {
            slots
                .iter()
                .any(|slot| slot.entry.participant_id == *participant_id)
        })
    }

    // Read-only accessors tolerate a poisoned lock so health reporting stays
    // truthful after a panicked holder; mutation paths surface the poisoning
    // as an error instead.
    fn read_slots<T>(&self, read: impl FnOnce(&Vec<PoolSlot>) -> T) -> T {
        match self.slots.lock() {
            Ok(slots) => read(&slots),
            Err(poisoned) => {
                warn!("Waiting pool lock poisoned; reading entries anyway");
                read(&poisoned.into_inner())
            }
        }
    }

    fn lock_slots(&self) -> Result<std::sync::MutexGuard<'_, Vec<PoolSlot>>> {
        self.slots.lock().map_err(|_| {
            MatchmakingError::InternalError {
                message: "Waiting pool lock poisoned".to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchmaking::relay;
    use std::sync::Arc;

    fn enroll(pool: &WaitingPool, id: &str, score: Score) {
        let (tx, _rx) = relay::channel();
        pool.enroll(id.to_string(), score, tx).unwrap();
    }

    #[test]
    fn test_enroll_and_find_within_band() {
        let pool = WaitingPool::new();
        enroll(&pool, "billy", 102);

        let claimed = pool
            .find_compatible(&"jesse".to_string(), 100, 0.05)
            .unwrap()
            .expect("opponent within band should be found");
        assert_eq!(claimed.entry.participant_id, "billy");
        assert!(pool.is_empty());
    }

    #[test]
    fn test_find_rejects_scores_outside_band() {
        let pool = WaitingPool::new();
        enroll(&pool, "billy", 94);
        enroll(&pool, "frank", 106);

        let claimed = pool.find_compatible(&"jesse".to_string(), 100, 0.05).unwrap();
        assert!(claimed.is_none());
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        let pool = WaitingPool::new();
        enroll(&pool, "low", 95);
        enroll(&pool, "high", 105);

        let first = pool
            .find_compatible(&"jesse".to_string(), 100, 0.05)
            .unwrap()
            .unwrap();
        let second = pool
            .find_compatible(&"jesse".to_string(), 100, 0.05)
            .unwrap()
            .unwrap();
        assert_eq!(first.entry.participant_id, "low");
        assert_eq!(second.entry.participant_id, "high");
        assert!(pool.is_empty());
    }

    #[test]
    fn test_earliest_enrolled_wins_within_band() {
        let pool = WaitingPool::new();
        // 98 is a closer score match, but 103 enrolled first.
        enroll(&pool, "first", 103);
        enroll(&pool, "second", 98);

        let claimed = pool
            .find_compatible(&"jesse".to_string(), 100, 0.05)
            .unwrap()
            .unwrap();
        assert_eq!(claimed.entry.participant_id, "first");
        assert!(pool.contains(&"second".to_string()));
    }

    #[test]
    fn test_duplicate_enrollment_rejected() {
        let pool = WaitingPool::new();
        enroll(&pool, "billy", 100);

        let (tx, _rx) = relay::channel();
        let err = pool
            .enroll("billy".to_string(), 100, tx)
            .expect_err("second enrollment must fail");
        let err = err.downcast::<MatchmakingError>().unwrap();
        assert!(matches!(
            err,
            MatchmakingError::DuplicateParticipant { participant_id } if participant_id == "billy"
        ));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_requester_never_claims_itself() {
        let pool = WaitingPool::new();
        enroll(&pool, "billy", 100);

        let claimed = pool.find_compatible(&"billy".to_string(), 100, 0.05).unwrap();
        assert!(claimed.is_none());
        assert!(pool.contains(&"billy".to_string()));
    }

    #[test]
    fn test_remove_is_idempotent_and_reports_what_it_did() {
        let pool = WaitingPool::new();
        enroll(&pool, "billy", 100);
        enroll(&pool, "frank", 200);

        assert!(pool.remove(&"billy".to_string()).unwrap());
        assert!(!pool.remove(&"billy".to_string()).unwrap());
        assert!(!pool.remove(&"nobody".to_string()).unwrap());

        assert_eq!(pool.len(), 1);
        assert!(pool.contains(&"frank".to_string()));
    }

    #[test]
    fn test_read_accessors_survive_a_poisoned_lock() {
        let pool = Arc::new(WaitingPool::new());
        enroll(&pool, "billy", 100);

        // Poison the pool lock by panicking while holding it.
        let poisoner = {
            let pool = pool.clone();
            std::thread::spawn(move || {
                let _guard = pool.slots.lock().unwrap();
                panic!("poison the pool lock");
            })
        };
        assert!(poisoner.join().is_err());

        // Readers keep reporting the real contents rather than an empty pool.
        assert_eq!(pool.len(), 1);
        assert!(!pool.is_empty());
        assert!(pool.contains(&"billy".to_string()));
    }

    #[test]
    fn test_concurrent_finders_never_share_an_entry() {
        let pool = Arc::new(WaitingPool::new());
        for i in 0..8 {
            enroll(&pool, &format!("waiting-{}", i), 100);
        }

        // More finders than entries; each entry must go to exactly one.
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let pool = pool.clone();
                std::thread::spawn(move || {
                    pool.find_compatible(&format!("finder-{}", i), 100, 0.05)
                        .unwrap()
                        .map(|claimed| claimed.entry.participant_id)
                })
            })
            .collect();

        let mut claimed: Vec<_> = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect();
        claimed.sort();
        let total = claimed.len();
        claimed.dedup();

        assert_eq!(total, 8, "every entry claimed exactly once");
        assert_eq!(claimed.len(), 8, "no entry claimed twice");
        assert!(pool.is_empty());
    }
}
