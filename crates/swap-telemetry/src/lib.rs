//! # Swap Telemetry
//!
//! Structured logging for the swap engine: a `tracing-subscriber` registry
//! with an `EnvFilter` and either pretty or JSON output, plus Prometheus
//! counters for the confirmation feed.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use swap_telemetry::{init_logging, register_metrics, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//!     let _metrics = register_metrics().expect("Failed to register metrics");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SWAP_SERVICE_NAME` | `swap-engine` | Service name |
//! | `SWAP_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directives |
//! | `SWAP_JSON_LOGS` | `false` (`true` in containers) | JSON output |
//! | `SWAP_NETWORK` | `testnet` | Deployment network |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};
pub use metrics::{encode_metrics, record_feed, register_metrics, MetricsHandle};

#[doc(hidden)]
pub use tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    Init(String),

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Metrics could not be registered or encoded.
    #[error("Failed to initialize metrics: {0}")]
    MetricsInit(String),
}

/// Log a swap lifecycle event with the subsystem and swap ID stamped on.
///
/// # Example
///
/// ```rust,ignore
/// log_swap_event!(info, swap.id(), "Swap funded", network = %swap.network());
/// ```
#[macro_export]
macro_rules! log_swap_event {
    ($level:ident, $swap_id:expr, $msg:expr $(, $($field:tt)*)?) => {
        $crate::tracing::$level!(
            subsystem = "swap-engine",
            swap_id = %$swap_id,
            $($($field)*,)?
            $msg
        )
    };
}
