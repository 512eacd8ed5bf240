//! Main application configuration
//!
//! This module defines the primary configuration structures for the quickdraw
//! matchmaking service, including environment variable loading and validation.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub matchmaking: MatchmakingSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Port the HTTP/WebSocket server binds to
    pub http_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Matchmaking-specific settings
///
/// The tolerance band and the search timeout are product-tunable values,
/// not structural invariants; both can be overridden per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchmakingSettings {
    /// How long a participant waits for an opponent before giving up, in seconds
    pub search_timeout_seconds: u64,
    /// Fractional score tolerance for pairing (0.05 = a ±5% band)
    pub score_tolerance: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service: ServiceSettings::default(),
            matchmaking: MatchmakingSettings::default(),
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "quickdraw".to_string(),
            log_level: "info".to_string(),
            http_port: 8080,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl Default for MatchmakingSettings {
    fn default() -> Self {
        Self {
            search_timeout_seconds: 60,
            score_tolerance: 0.05,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }
        if let Ok(port) = env::var("HTTP_PORT") {
            config.service.http_port = port
                .parse()
                .map_err(|_| anyhow!("Invalid HTTP_PORT value: {}", port))?;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            config.service.shutdown_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid SHUTDOWN_TIMEOUT_SECONDS value: {}", timeout))?;
        }

        // Matchmaking settings
        if let Ok(timeout) = env::var("SEARCH_TIMEOUT_SECONDS") {
            config.matchmaking.search_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid SEARCH_TIMEOUT_SECONDS value: {}", timeout))?;
        }
        if let Ok(tolerance) = env::var("SCORE_TOLERANCE") {
            config.matchmaking.score_tolerance = tolerance
                .parse()
                .map_err(|_| anyhow!("Invalid SCORE_TOLERANCE value: {}", tolerance))?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            anyhow!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            )
        })?;
        let config: AppConfig =
            toml::from_str(&contents).map_err(|e| anyhow!("Failed to parse config file: {}", e))?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Get the opponent search timeout as Duration
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.matchmaking.search_timeout_seconds)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate ports
    if config.service.http_port == 0 {
        return Err(anyhow!("HTTP port cannot be 0"));
    }

    // Validate timeouts
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }
    if config.matchmaking.search_timeout_seconds == 0 {
        return Err(anyhow!("Search timeout must be greater than 0"));
    }

    // Validate tolerance band
    if !(0.0..1.0).contains(&config.matchmaking.score_tolerance) {
        return Err(anyhow!(
            "Score tolerance must be in [0, 1), got {}",
            config.matchmaking.score_tolerance
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.matchmaking.search_timeout_seconds, 60);
        assert_eq!(config.matchmaking.score_tolerance, 0.05);
        assert_eq!(config.search_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = AppConfig::default();
        config.service.log_level = "verbose".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = AppConfig::default();
        config.service.http_port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_search_timeout_rejected() {
        let mut config = AppConfig::default();
        config.matchmaking.search_timeout_seconds = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_tolerance_out_of_range_rejected() {
        let mut config = AppConfig::default();
        config.matchmaking.score_tolerance = 1.0;
        assert!(validate_config(&config).is_err());

        config.matchmaking.score_tolerance = -0.05;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_from_toml_contents() {
        let toml_str = r#"
            [service]
            name = "quickdraw-test"
            log_level = "debug"
            http_port = 9000
            shutdown_timeout_seconds = 10

            [matchmaking]
            search_timeout_seconds = 30
            score_tolerance = 0.1
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.service.name, "quickdraw-test");
        assert_eq!(config.service.http_port, 9000);
        assert_eq!(config.matchmaking.search_timeout_seconds, 30);
        assert!(validate_config(&config).is_ok());
    }
}
