//! Startup orchestration shared by both binaries.
//!
//! Fail fast: a configuration error is returned before anything connects.

use std::path::Path;

use crate::config::{load_or_default, AppConfig, ConfigError};
use crate::observability;

/// Load configuration and initialise observability.
///
/// Logging is initialised even when loading fails so the caller can report
/// the error through `tracing`.
pub fn bootstrap(
    config_path: Option<&Path>,
    log_level: Option<&str>,
) -> Result<AppConfig, ConfigError> {
    match load_or_default(config_path) {
        Ok(config) => {
            observability::init(&config.observability, log_level);
            tracing::info!(
                config = %config_path.map(|p| p.display().to_string()).unwrap_or_else(|| "<defaults>".to_string()),
                venues = config.venues.len(),
                "Configuration loaded"
            );
            Ok(config)
        }
        Err(e) => {
            observability::logging::init_logging(log_level.unwrap_or("info"));
            Err(e)
        }
    }
}
