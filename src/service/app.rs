//! Main application state and service wiring
//!
//! This module contains the production AppState that assembles the waiting
//! pool, coordinator, recorder, and authenticator, builds the HTTP router,
//! and serves it with graceful shutdown.

use crate::config::AppConfig;
use crate::error::Result;
use crate::matchmaking::{MatchCoordinator, WaitingPool};
use crate::recorder::{InMemoryMatchRecorder, MatchRecorder};
use crate::service::health;
use crate::session::auth::{HeaderSessionAuthenticator, SessionAuthenticator};
use crate::session::gateway;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Shared application state wiring all service components together
pub struct AppState {
    config: AppConfig,
    pool: Arc<WaitingPool>,
    coordinator: Arc<MatchCoordinator>,
    authenticator: Arc<dyn SessionAuthenticator>,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// Create application state with the default in-memory recorder and
    /// header-based authenticator
    pub fn new(config: AppConfig) -> Self {
        Self::with_components(
            config,
            Arc::new(InMemoryMatchRecorder::new()),
            Arc::new(HeaderSessionAuthenticator::new()),
        )
    }

    /// Create application state with custom recorder and authenticator
    pub fn with_components(
        config: AppConfig,
        recorder: Arc<dyn MatchRecorder>,
        authenticator: Arc<dyn SessionAuthenticator>,
    ) -> Self {
        let pool = Arc::new(WaitingPool::new());
        let coordinator = Arc::new(MatchCoordinator::new(
            pool.clone(),
            recorder,
            config.matchmaking.clone(),
        ));

        Self {
            config,
            pool,
            coordinator,
            authenticator,
            started_at: crate::utils::current_timestamp(),
        }
    }

    /// Application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The shared waiting pool
    pub fn pool(&self) -> &Arc<WaitingPool> {
        &self.pool
    }

    /// The match coordinator shared by all sessions
    pub fn coordinator(&self) -> &Arc<MatchCoordinator> {
        &self.coordinator
    }

    /// The session authenticator boundary
    pub fn authenticator(&self) -> &Arc<dyn SessionAuthenticator> {
        &self.authenticator
    }

    /// When this service instance started
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Build the HTTP router for this state
    pub fn build_router(self: &Arc<Self>) -> Router {
        Router::new()
            .route("/gunfight/find", get(gateway::find_gunfight))
            .route("/health", get(health::health_endpoint))
            .with_state(self.clone())
    }

    /// Bind the configured port and serve until `shutdown` resolves
    pub async fn serve<F>(self: Arc<Self>, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.service.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Listening on {}", addr);

        axum::serve(listener, self.build_router())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_with_empty_pool() {
        let state = Arc::new(AppState::new(AppConfig::default()));
        assert!(state.pool().is_empty());
        assert_eq!(state.coordinator().stats().attempts_started, 0);
    }

    #[test]
    fn test_router_builds() {
        let state = Arc::new(AppState::new(AppConfig::default()));
        let _router = state.build_router();
    }
}
