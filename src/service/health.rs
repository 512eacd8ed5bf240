//! Health check endpoint and monitoring
//!
//! This module provides health reporting for the quickdraw matchmaking
//! service: overall status plus the coordinator statistics the operators
//! actually look at.

use crate::service::app::AppState;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Degraded => write!(f, "degraded"),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Overall service status
    pub status: HealthStatus,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Current timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Service statistics
    pub stats: ServiceStats,
}

/// Service statistics for health reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStats {
    /// Participants currently waiting for an opponent
    pub participants_waiting: usize,
    /// Total matchmaking attempts started since service start
    pub attempts_started: u64,
    /// Total gunfights recorded since service start
    pub gunfights_recorded: u64,
    /// Total attempts that timed out
    pub timeouts: u64,
    /// Total attempts cancelled by disconnect
    pub cancellations: u64,
    /// Total recorder failures observed
    pub recorder_failures: u64,
    /// Service uptime information
    pub uptime_info: String,
}

impl HealthCheck {
    /// Assemble a health report from the current service state
    pub fn check(state: &AppState) -> Self {
        let coordinator_stats = state.coordinator().stats();
        let uptime = crate::utils::current_timestamp() - state.started_at();

        // Recorder trouble degrades the service without taking it down;
        // every other failure is scoped to a single attempt.
        let status = if coordinator_stats.recorder_failures > 0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        Self {
            status,
            service: state.config().service.name.clone(),
            version: crate::VERSION.to_string(),
            timestamp: crate::utils::current_timestamp(),
            stats: ServiceStats {
                participants_waiting: state.pool().len(),
                attempts_started: coordinator_stats.attempts_started,
                gunfights_recorded: coordinator_stats.gunfights_recorded,
                timeouts: coordinator_stats.timeouts,
                cancellations: coordinator_stats.cancellations,
                recorder_failures: coordinator_stats.recorder_failures,
                uptime_info: format!("{}s", uptime.num_seconds()),
            },
        }
    }
}

/// `GET /health` - current service health as JSON
pub async fn health_endpoint(State(state): State<Arc<AppState>>) -> Json<HealthCheck> {
    Json(HealthCheck::check(&state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_fresh_service_reports_healthy() {
        let state = AppState::new(AppConfig::default());
        let health = HealthCheck::check(&state);

        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.service, "quickdraw");
        assert_eq!(health.stats.participants_waiting, 0);
        assert_eq!(health.stats.attempts_started, 0);
    }

    #[test]
    fn test_health_serializes_to_json() {
        let state = AppState::new(AppConfig::default());
        let health = HealthCheck::check(&state);

        let json = serde_json::to_value(&health).unwrap();
        assert_eq!(json["status"], "healthy");
        assert!(json["stats"]["participants_waiting"].is_number());
    }
}
