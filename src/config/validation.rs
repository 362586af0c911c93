//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the gateway URL and the ENS root domain
//! - Validate value ranges (timeouts > 0, gas price representable in wei)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the client

use alloy::primitives::utils::parse_units;
use alloy::primitives::U256;
use thiserror::Error;

use crate::config::schema::ClientConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("eth_gateway '{url}' is not a valid URL: {reason}")]
    InvalidGateway { url: String, reason: String },

    #[error("gas_price_gwei {value} is not a valid gas price: {reason}")]
    InvalidGasPrice { value: String, reason: String },

    #[error("ens.domain '{0}' must be a non-empty dotted name")]
    InvalidDomain(String),

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Convert a decimal gwei amount into wei.
pub fn gwei_to_wei(gwei: f64) -> Result<u128, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidGasPrice {
        value: gwei.to_string(),
        reason,
    };

    if !gwei.is_finite() || gwei < 0.0 {
        return Err(invalid("must be a finite, non-negative number".to_string()));
    }

    let wei: U256 = parse_units(&gwei.to_string(), "gwei")
        .map_err(|e| invalid(e.to_string()))?
        .into();

    u128::try_from(wei).map_err(|_| invalid("does not fit in 128 bits of wei".to_string()))
}

/// Validate a loaded configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.eth_gateway) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::InvalidGateway {
            url: config.eth_gateway.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidGateway {
            url: config.eth_gateway.clone(),
            reason: e.to_string(),
        }),
    }

    if let Err(e) = gwei_to_wei(config.gas_price_gwei) {
        errors.push(e);
    }

    let domain = config.ens.domain.as_str();
    if domain.is_empty()
        || domain.starts_with('.')
        || domain.ends_with('.')
        || domain.split('.').any(str::is_empty)
    {
        errors.push(ValidationError::InvalidDomain(domain.to_string()));
    }

    if config.rpc_timeout_ms == 0 {
        errors.push(ValidationError::ZeroValue("rpc_timeout_ms"));
    }
    if config.confirmation.poll_interval_ms == 0 {
        errors.push(ValidationError::ZeroValue("confirmation.poll_interval_ms"));
    }
    if config.confirmation.timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("confirmation.timeout_secs"));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
