//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parseable)
//! - Check cross-field consistency (request budget covers commit budget)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::BridgeConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address".to_string(),
            message: format!("not a valid socket address: {}", config.listener.bind_address),
        });
    }

    match config.gateway.endpoint.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {}
        _ => errors.push(ValidationError {
            field: "gateway.endpoint".to_string(),
            message: format!("expected host:port, got: {}", config.gateway.endpoint),
        }),
    }

    if config.credentials.root_path.is_empty() {
        errors.push(ValidationError {
            field: "credentials.root_path".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("timeouts.evaluate_secs", timeouts.evaluate_secs),
        ("timeouts.endorse_secs", timeouts.endorse_secs),
        ("timeouts.submit_secs", timeouts.submit_secs),
        ("timeouts.commit_status_secs", timeouts.commit_status_secs),
        ("timeouts.request_secs", timeouts.request_secs),
        ("gateway.connect_timeout_secs", config.gateway.connect_timeout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError {
                field: field.to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
    }

    if timeouts.request_secs <= timeouts.commit_status_secs {
        errors.push(ValidationError {
            field: "timeouts.request_secs".to_string(),
            message: format!(
                "must exceed commit_status_secs ({})",
                timeouts.commit_status_secs
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
