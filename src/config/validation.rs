//! Configuration validation.
//!
//! Serde handles syntax; this module checks what serde cannot: URL schemes,
//! address formats, value ranges, and duplicate venue names. All problems
//! are reported at once, not just the first.

use std::collections::HashSet;
use std::net::SocketAddr;

use alloy::primitives::utils::parse_ether;
use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::{AppConfig, ObservabilityConfig, VenueConfig, WatcherConfig};

/// Minimum gas for a plain value transfer.
pub const MIN_TRANSFER_GAS: u64 = 21_000;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}'")]
    InvalidUrl { field: String, value: String },

    #[error("{field}: unsupported URL scheme '{scheme}'")]
    UnsupportedScheme { field: String, scheme: String },

    #[error("{field}: invalid address '{value}'")]
    InvalidAddress { field: String, value: String },

    #[error("{field}: {reason}")]
    OutOfRange { field: String, reason: String },

    #[error("duplicate venue name '{0}'")]
    DuplicateVenue(String),
}

/// Validate a whole configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_watcher(&config.watcher, &mut errors);

    let mut names = HashSet::new();
    for (i, venue) in config.venues.iter().enumerate() {
        validate_venue(i, venue, &mut errors);
        if !venue.name.is_empty() && !names.insert(venue.name.as_str()) {
            errors.push(ValidationError::DuplicateVenue(venue.name.clone()));
        }
    }

    validate_observability(&config.observability, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_watcher(watcher: &WatcherConfig, errors: &mut Vec<ValidationError>) {
    check_url("watcher.ws_url", &watcher.ws_url, &["ws", "wss"], errors);
    check_address("watcher.recipient", &watcher.recipient, errors);

    if watcher.every_n_blocks == 0 {
        errors.push(out_of_range("watcher.every_n_blocks", "must be greater than 0"));
    }
    if watcher.gas_limit < MIN_TRANSFER_GAS {
        errors.push(out_of_range(
            "watcher.gas_limit",
            &format!("must be at least {}", MIN_TRANSFER_GAS),
        ));
    }
    if parse_ether(&watcher.transfer_value_eth).is_err() {
        errors.push(out_of_range(
            "watcher.transfer_value_eth",
            &format!("'{}' is not an ether amount", watcher.transfer_value_eth),
        ));
    }
    if watcher.rpc_timeout_secs == 0 {
        errors.push(out_of_range("watcher.rpc_timeout_secs", "must be greater than 0"));
    }
    if watcher.channel_capacity == 0 {
        errors.push(out_of_range("watcher.channel_capacity", "must be greater than 0"));
    }
    if watcher.private_key_env.is_empty() {
        errors.push(out_of_range("watcher.private_key_env", "must not be empty"));
    }
}

fn validate_venue(index: usize, venue: &VenueConfig, errors: &mut Vec<ValidationError>) {
    let field = |name: &str| format!("venues[{}].{}", index, name);

    if venue.name.is_empty() {
        errors.push(out_of_range(&field("name"), "must not be empty"));
    }
    check_url(
        &field("rpc_url"),
        &venue.rpc_url,
        &["http", "https", "ws", "wss"],
        errors,
    );
    check_address(&field("target"), &venue.target, errors);
    check_address(&field("from_token"), &venue.from_token, errors);
    check_address(&field("to_token"), &venue.to_token, errors);

    if venue.gas_limit < MIN_TRANSFER_GAS {
        errors.push(out_of_range(
            &field("gas_limit"),
            &format!("must be at least {}", MIN_TRANSFER_GAS),
        ));
    }
    if venue.rpc_timeout_secs == 0 {
        errors.push(out_of_range(&field("rpc_timeout_secs"), "must be greater than 0"));
    }
    if venue.private_key_env.is_empty() {
        errors.push(out_of_range(&field("private_key_env"), "must not be empty"));
    }
}

fn validate_observability(obs: &ObservabilityConfig, errors: &mut Vec<ValidationError>) {
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address".to_string(),
            value: obs.metrics_address.clone(),
        });
    }
}

fn check_url(field: &str, value: &str, schemes: &[&str], errors: &mut Vec<ValidationError>) {
    match value.parse::<url::Url>() {
        Ok(url) if schemes.contains(&url.scheme()) => {}
        Ok(url) => errors.push(ValidationError::UnsupportedScheme {
            field: field.to_string(),
            scheme: url.scheme().to_string(),
        }),
        Err(_) => errors.push(ValidationError::InvalidUrl {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

fn check_address(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<Address>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

fn out_of_range(field: &str, reason: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
