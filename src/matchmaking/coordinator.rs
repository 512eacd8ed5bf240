//! Match coordinator implementation for running one attempt end to end
//!
//! This module provides the core MatchCoordinator that orchestrates a single
//! participant's matchmaking attempt: query the pool for a compatible waiting
//! opponent, either complete an immediate pairing or enroll the participant
//! and await the race between being found, timing out, and cancellation.

use crate::config::MatchmakingSettings;
use crate::error::{MatchmakingError, Result};
use crate::matchmaking::pool::{ClaimedEntry, WaitingPool};
use crate::matchmaking::relay;
use crate::recorder::MatchRecorder;
use crate::types::{MatchOutcome, PairingNotification, ParticipantId, Score};
use std::sync::{Arc, RwLock};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Statistics about coordinator operations
#[derive(Debug, Clone, Default)]
pub struct CoordinatorStats {
    /// Total number of matchmaking attempts started
    pub attempts_started: u64,
    /// Total number of gunfights recorded (one per pair)
    pub gunfights_recorded: u64,
    /// Total number of attempts that ended paired (two per gunfight)
    pub participants_paired: u64,
    /// Total number of attempts that timed out
    pub timeouts: u64,
    /// Total number of attempts cancelled by disconnect
    pub cancellations: u64,
    /// Total number of recorder failures observed
    pub recorder_failures: u64,
}

/// The main match coordinator
///
/// One instance is shared by all connection tasks; all per-attempt state
/// lives on the stack of `attempt_match`, so coordinators interact only
/// through the waiting pool and the one-shot relays inside it.
pub struct MatchCoordinator {
    pool: Arc<WaitingPool>,
    recorder: Arc<dyn MatchRecorder>,
    settings: MatchmakingSettings,
    stats: Arc<RwLock<CoordinatorStats>>,
}

impl MatchCoordinator {
    /// Create a new coordinator over the given pool and recorder
    pub fn new(
        pool: Arc<WaitingPool>,
        recorder: Arc<dyn MatchRecorder>,
        settings: MatchmakingSettings,
    ) -> Self {
        Self {
            pool,
            recorder,
            settings,
            stats: Arc::new(RwLock::new(CoordinatorStats::default())),
        }
    }

    /// Run one matchmaking attempt to its terminal outcome
    ///
    /// `cancel` is fired by the session gateway when the participant's
    /// connection goes away; dropping the sender counts as cancellation.
    /// The attempt ends in exactly one of `Paired`, `TimedOut`, or
    /// `Cancelled`, or in an error; in every case the participant is no
    /// longer in the pool when this returns.
    pub async fn attempt_match(
        &self,
        participant_id: ParticipantId,
        score: Score,
        cancel: oneshot::Receiver<()>,
    ) -> Result<MatchOutcome> {
        info!(
            "Starting matchmaking attempt - participant: '{}', score: {}",
            participant_id, score
        );
        self.bump_stats(|stats| stats.attempts_started += 1);

        if let Some(claimed) =
            self.pool
                .find_compatible(&participant_id, score, self.settings.score_tolerance)?
        {
            return self.complete_pairing(participant_id, claimed).await;
        }

        self.wait_for_opponent(participant_id, score, cancel).await
    }

    /// Finder path: a compatible opponent was claimed from the pool
    ///
    /// The claim already removed the opponent's entry, so the reservation
    /// must be honored: whatever the recorder does, the waiting side gets a
    /// notification and is never left to idle out the full timeout.
    async fn complete_pairing(
        &self,
        participant_id: ParticipantId,
        claimed: ClaimedEntry,
    ) -> Result<MatchOutcome> {
        let opponent_id = claimed.entry.participant_id.clone();

        match self
            .recorder
            .create_match(&participant_id, &opponent_id)
            .await
        {
            Ok(match_id) => {
                if claimed
                    .relay
                    .deliver(PairingNotification::Matched {
                        opponent_id: participant_id.clone(),
                        match_id,
                    })
                    .is_err()
                {
                    // The waiting side gave up in the instant between the
                    // claim and this delivery; it has already cleaned up.
                    warn!(
                        "Waiting participant '{}' abandoned attempt before pairing notification",
                        opponent_id
                    );
                }

                info!(
                    "Paired '{}' with '{}' as gunfight {}",
                    participant_id, opponent_id, match_id
                );
                self.bump_stats(|stats| {
                    stats.gunfights_recorded += 1;
                    stats.participants_paired += 2;
                });

                Ok(MatchOutcome::Paired {
                    opponent_id,
                    match_id,
                })
            }
            Err(e) => {
                warn!(
                    "Recorder failed for pairing '{}' vs '{}': {}",
                    participant_id, opponent_id, e
                );
                self.bump_stats(|stats| stats.recorder_failures += 1);

                if claimed
                    .relay
                    .deliver(PairingNotification::RecorderFailed {
                        opponent_id: participant_id.clone(),
                    })
                    .is_err()
                {
                    warn!(
                        "Waiting participant '{}' abandoned attempt before failure notification",
                        opponent_id
                    );
                }

                Err(MatchmakingError::RecorderFailure {
                    message: e.to_string(),
                }
                .into())
            }
        }
    }

    /// Waiting path: enroll and race pairing against timeout and cancellation
    async fn wait_for_opponent(
        &self,
        participant_id: ParticipantId,
        score: Score,
        cancel: oneshot::Receiver<()>,
    ) -> Result<MatchOutcome> {
        let (relay_tx, relay_rx) = relay::channel();

        // An enrollment failure means this participant never entered the
        // pool; returning here must not disturb any earlier entry.
        self.pool.enroll(participant_id.clone(), score, relay_tx)?;

        // The timeout clock starts at enrollment.
        let search_timeout = tokio::time::Duration::from_secs(self.settings.search_timeout_seconds);

        // Pinned outside the select so the timeout arm can still drain it: a
        // finder may have claimed this entry with its recorder call in
        // flight, and a claimed participant must resolve to the pairing
        // result, never to a timeout its opponent knows nothing about.
        let notified = relay_rx.notified();
        tokio::pin!(notified);

        tokio::select! {
            notification = &mut notified => {
                // The finder already removed the entry; cleanup is a no-op.
                self.pool.remove(&participant_id)?;
                self.resolve_notification(&participant_id, notification)
            }
            _ = tokio::time::sleep(search_timeout) => {
                // Removal doubles as the race arbiter: a still-present entry
                // genuinely timed out, a missing one was claimed before the
                // deadline and the reservation must be honored.
                if self.pool.remove(&participant_id)? {
                    info!(
                        "Participant '{}' found no opponent within {}s",
                        participant_id, self.settings.search_timeout_seconds
                    );
                    self.bump_stats(|stats| stats.timeouts += 1);
                    Ok(MatchOutcome::TimedOut)
                } else {
                    // Bounded wait: the finder delivers as soon as its
                    // recorder call returns.
                    let notification = notified.await;
                    self.resolve_notification(&participant_id, notification)
                }
            }
            _ = cancel => {
                debug!("Matchmaking attempt for '{}' cancelled", participant_id);
                self.bump_stats(|stats| stats.cancellations += 1);
                self.pool.remove(&participant_id)?;
                Ok(MatchOutcome::Cancelled)
            }
        }
    }

    /// Resolve a relay notification into the attempt's terminal outcome
    fn resolve_notification(
        &self,
        participant_id: &ParticipantId,
        notification: Option<PairingNotification>,
    ) -> Result<MatchOutcome> {
        match notification {
            Some(PairingNotification::Matched {
                opponent_id,
                match_id,
            }) => {
                info!(
                    "Participant '{}' was paired with '{}' as gunfight {}",
                    participant_id, opponent_id, match_id
                );
                self.bump_stats(|stats| stats.participants_paired += 1);
                Ok(MatchOutcome::Paired {
                    opponent_id,
                    match_id,
                })
            }
            Some(PairingNotification::RecorderFailed { opponent_id }) => {
                warn!(
                    "Participant '{}' was reserved by '{}' but match persistence failed",
                    participant_id, opponent_id
                );
                self.bump_stats(|stats| stats.recorder_failures += 1);
                Err(MatchmakingError::RecorderFailure {
                    message: format!("pairing with '{}' could not be recorded", opponent_id),
                }
                .into())
            }
            // The sender only disappears without delivering if the pool
            // entry itself was discarded unmatched.
            None => Err(MatchmakingError::InternalError {
                message: "Notification relay closed without a pairing result".to_string(),
            }
            .into()),
        }
    }

    /// Snapshot of coordinator statistics
    pub fn stats(&self) -> CoordinatorStats {
        self.stats
            .read()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    /// Number of participants currently waiting in the pool
    pub fn waiting_count(&self) -> usize {
        self.pool.len()
    }

    fn bump_stats(&self, update: impl FnOnce(&mut CoordinatorStats)) {
        if let Ok(mut stats) = self.stats.write() {
            update(&mut stats);
        }
    }
}
