//! Test fixtures and mock implementations for integration testing

use async_trait::async_trait;
use quickdraw::config::AppConfig;
use quickdraw::error::Result;
use quickdraw::recorder::MatchRecorder;
use quickdraw::session::auth::HeaderSessionAuthenticator;
use quickdraw::types::{MatchId, ParticipantId};
use quickdraw::AppState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Recorder that always fails, for exercising the failure-notification path
#[derive(Debug, Default)]
pub struct FailingRecorder {
    calls: AtomicUsize,
}

impl FailingRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `create_match` was attempted
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MatchRecorder for FailingRecorder {
    async fn create_match(
        &self,
        _participant_a: &ParticipantId,
        _participant_b: &ParticipantId,
    ) -> Result<MatchId> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!("match store is unavailable"))
    }
}

/// Application state with the default in-memory recorder
pub fn create_test_state() -> Arc<AppState> {
    Arc::new(AppState::new(AppConfig::default()))
}

/// Application state with a short search timeout for real-time tests
pub fn create_test_state_with_timeout(search_timeout_seconds: u64) -> Arc<AppState> {
    let mut config = AppConfig::default();
    config.matchmaking.search_timeout_seconds = search_timeout_seconds;
    Arc::new(AppState::new(config))
}

/// Application state with a custom recorder
pub fn create_test_state_with_recorder(recorder: Arc<dyn MatchRecorder>) -> Arc<AppState> {
    Arc::new(AppState::with_components(
        AppConfig::default(),
        recorder,
        Arc::new(HeaderSessionAuthenticator::new()),
    ))
}
