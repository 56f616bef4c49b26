//! Telemetry configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_SERVICE_NAME: &str = "swap-engine";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_NETWORK: &str = "testnet";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name stamped on every event
    pub service_name: String,

    /// Filter directives (`info`, `swap_engine=debug,warn`, ...)
    pub log_level: String,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Deployment network (testnet, mainnet, devnet)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            json_logs: false,
            network: DEFAULT_NETWORK.to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SWAP_SERVICE_NAME`: Service name (default: swap-engine)
    /// - `SWAP_LOG_LEVEL` or `RUST_LOG`: Filter directives (default: info)
    /// - `SWAP_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `SWAP_NETWORK`: Deployment network (default: testnet)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("SWAP_SERVICE_NAME")
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),

            log_level: lookup("SWAP_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),

            json_logs: lookup("SWAP_JSON_LOGS")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(is_container),

            network: lookup("SWAP_NETWORK").unwrap_or_else(|| DEFAULT_NETWORK.to_string()),
        }
    }

    /// Builder-style method to set the filter directives.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}
