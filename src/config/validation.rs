//! Configuration validation.
//!
//! Serde handles the syntax; this pass checks values. Every violation is
//! collected so the user sees all of them at once.

use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.pxe.url.parse::<url::Url>() {
        errors.push(ValidationError::new("pxe.url", format!("invalid URL: {}", e)));
    }
    for (i, failover) in config.pxe.failover_urls.iter().enumerate() {
        if failover.parse::<url::Url>().is_err() {
            errors.push(ValidationError::new(
                &format!("pxe.failover_urls[{}]", i),
                format!("invalid URL '{}'", failover),
            ));
        }
    }
    if config.pxe.request_timeout_secs == 0 {
        errors.push(ValidationError::new("pxe.request_timeout_secs", "must be > 0"));
    }

    let wait = &config.wait;
    if wait.ready_max_attempts == 0 {
        errors.push(ValidationError::new("wait.ready_max_attempts", "must be > 0"));
    }
    if wait.ready_base_delay_ms > wait.ready_max_delay_ms {
        errors.push(ValidationError::new(
            "wait.ready_base_delay_ms",
            "must not exceed wait.ready_max_delay_ms",
        ));
    }
    if wait.tx_timeout_secs == 0 {
        errors.push(ValidationError::new("wait.tx_timeout_secs", "must be > 0"));
    }
    if wait.tx_poll_interval_ms == 0 {
        errors.push(ValidationError::new("wait.tx_poll_interval_ms", "must be > 0"));
    }

    if let Some(salt) = &config.account.salt {
        if salt.parse::<alloy::primitives::B256>().is_err() {
            errors.push(ValidationError::new("account.salt", "must be 32 bytes of hex"));
        }
    }

    if config.token.symbol.trim().is_empty() {
        errors.push(ValidationError::new("token.symbol", "must not be empty"));
    }
    // 10^77 is the largest power of ten below 2^256.
    if config.token.decimals > 77 {
        errors.push(ValidationError::new("token.decimals", "must be <= 77"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
