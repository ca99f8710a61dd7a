//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid, percentages bounded)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PluginConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::PluginConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending key.
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &PluginConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.remote.address.trim().is_empty() {
        errors.push(ValidationError::new("remote.address", "must not be empty"));
    }
    if config.remote.port == 0 {
        errors.push(ValidationError::new("remote.port", "must be non-zero"));
    }
    if config.remote.api_version.trim().is_empty() {
        errors.push(ValidationError::new("remote.api_version", "must not be empty"));
    }
    if config.remote.request_timeout_secs == 0 {
        errors.push(ValidationError::new("remote.request_timeout_secs", "must be greater than 0"));
    }

    if config.polling.interval_ms == 0 {
        errors.push(ValidationError::new("polling.interval_ms", "must be greater than 0"));
    }

    if config.breaker.open_timeout_ms == 0 {
        errors.push(ValidationError::new("breaker.open_timeout_ms", "must be greater than 0"));
    }
    if config.breaker.closed_timeout_ms == 0 {
        errors.push(ValidationError::new("breaker.closed_timeout_ms", "must be greater than 0"));
    }
    if config.breaker.failed_request_threshold == 0 {
        errors.push(ValidationError::new("breaker.failed_request_threshold", "must be at least 1"));
    }
    let pct = config.breaker.failed_request_percentage_threshold;
    if pct == 0 || pct > 100 {
        errors.push(ValidationError::new(
            "breaker.failed_request_percentage_threshold",
            format!("must be within 1..=100, got {}", pct),
        ));
    }

    if config.host.connect_attempts == 0 {
        errors.push(ValidationError::new("host.connect_attempts", "must be at least 1"));
    }
    if config.host.backoff_max_ms < config.host.backoff_base_ms {
        errors.push(ValidationError::new("host.backoff_max_ms", "must not be below backoff_base_ms"));
    }

    if config.assets.directory.trim().is_empty() {
        errors.push(ValidationError::new("assets.directory", "must not be empty"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
