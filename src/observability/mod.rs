//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! watcher / trading produce:
//!     → logging.rs (tracing events to stdout)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → terminal or log collector
//!     → Prometheus scrape (optional)
//! ```

pub mod logging;
pub mod metrics;

use crate::config::ObservabilityConfig;

/// Initialise logging and, when enabled, the metrics exporter.
///
/// `level_override` comes from the command line and beats the config file.
pub fn init(config: &ObservabilityConfig, level_override: Option<&str>) {
    logging::init_logging(level_override.unwrap_or(&config.log_level));

    if config.metrics_enabled {
        match config.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }
}
