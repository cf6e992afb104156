//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate backend URLs (plain `http`, host present, no path)
//! - Validate value ranges (timeouts > 0, verify budget below request budget, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid backend URL {value:?}: {reason}")]
    InvalidBackendUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field}: must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("timeouts.verify_ms ({verify_ms}) must be less than timeouts.request_ms ({request_ms})")]
    VerifyOutlastsRequest { verify_ms: u64, request_ms: u64 },
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    for (field, value) in [
        ("backends.auth", &config.backends.auth),
        ("backends.notes", &config.backends.notes),
    ] {
        if let Err(reason) = check_backend_url(value) {
            errors.push(ValidationError::InvalidBackendUrl {
                field,
                value: value.clone(),
                reason,
            });
        }
    }

    for (field, value) in [
        ("timeouts.connect_ms", config.timeouts.connect_ms),
        ("timeouts.verify_ms", config.timeouts.verify_ms),
        ("timeouts.request_ms", config.timeouts.request_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout { field });
        }
    }

    let timeouts = &config.timeouts;
    if timeouts.verify_ms > 0 && timeouts.request_ms > 0 && timeouts.verify_ms >= timeouts.request_ms {
        errors.push(ValidationError::VerifyOutlastsRequest {
            verify_ms: timeouts.verify_ms,
            request_ms: timeouts.request_ms,
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_backend_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;

    if url.scheme() != "http" {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.path() != "/" || url.query().is_some() {
        return Err("base URL must not carry a path or query".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.backends.auth = "https://auth:8443".into();
        config.backends.notes = "http://notes:8200/v1".into();
        config.timeouts.verify_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroTimeout {
            field: "timeouts.verify_ms"
        }));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidBackendUrl { field: "backends.auth", .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidBackendUrl { field: "backends.notes", .. })));
    }

    #[test]
    fn test_trailing_slash_backend_is_accepted() {
        assert!(check_backend_url("http://127.0.0.1:9000/").is_ok());
        assert!(check_backend_url("ftp://127.0.0.1:9000").is_err());
        assert!(check_backend_url("not a url").is_err());
    }

    #[test]
    fn test_verify_timeout_must_fit_request_timeout() {
        let mut config = GatewayConfig::default();
        config.timeouts.verify_ms = 30_000;
        config.timeouts.request_ms = 30_000;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::VerifyOutlastsRequest {
                verify_ms: 30_000,
                request_ms: 30_000,
            }])
        );

        config.timeouts.verify_ms = 29_999;
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
