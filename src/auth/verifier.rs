//! Token verification against the authorization service.
//!
//! # Responsibilities
//! - POST `{"token": ...}` to `<auth>/token-verify`
//! - Turn the reply into a [`VerificationOutcome`] or a [`VerifierFault`]
//!
//! # Design Decisions
//! - One round trip per request; nothing is cached
//! - The call is bounded by `timeouts.verify_ms`; expiry counts as unavailable
//! - A non-2xx reply is a rejection whatever its body says

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::auth::identity::{Identity, VerificationOutcome};
use crate::config::TimeoutConfig;
use crate::error::StartupError;

/// Path of the verification endpoint on the authorization service.
pub const VERIFY_PATH: &str = "/token-verify";

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<VerifyData>,
}

#[derive(Deserialize)]
struct VerifyData {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

/// The authorization service broke its response contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifierFault {
    #[error("failed to read verification response: {0}")]
    Unreadable(String),

    #[error("failed to parse verification response: {0}")]
    Malformed(String),

    #[error("verification succeeded without {0}")]
    MissingIdentity(&'static str),
}

impl VerifierFault {
    /// Message shown to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            VerifierFault::Unreadable(_) => "Failed to read auth response",
            VerifierFault::Malformed(_) => "Failed to parse auth response",
            VerifierFault::MissingIdentity(_) => "Invalid user data from auth service",
        }
    }
}

/// Client for the authorization service's verification endpoint.
#[derive(Debug, Clone)]
pub struct IdentityVerifier {
    client: reqwest::Client,
    verify_url: Url,
}

impl IdentityVerifier {
    pub fn new(auth_base: &str, timeouts: &TimeoutConfig) -> Result<Self, StartupError> {
        let backend_error = |reason: String| StartupError::Backend {
            url: auth_base.to_string(),
            reason,
        };
        let verify_url = Url::parse(auth_base)
            .and_then(|base| base.join(VERIFY_PATH))
            .map_err(|e| backend_error(e.to_string()))?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(timeouts.connect_ms))
            .timeout(Duration::from_millis(timeouts.verify_ms))
            .no_proxy()
            .build()?;

        Ok(Self { client, verify_url })
    }

    pub fn verify_url(&self) -> &Url {
        &self.verify_url
    }

    /// Ask the authorization service who owns `token`.
    pub async fn verify(&self, token: &str) -> Result<VerificationOutcome, VerifierFault> {
        let response = match self
            .client
            .post(self.verify_url.clone())
            .json(&VerifyRequest { token })
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let reason = if e.is_timeout() {
                    "verification timed out".to_string()
                } else {
                    e.to_string()
                };
                tracing::warn!(url = %self.verify_url, error = %e, "Token verification call failed");
                return Ok(VerificationOutcome::BackendUnavailable(reason));
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            // the body deadline is part of the same call budget
            Err(e) if e.is_timeout() => {
                return Ok(VerificationOutcome::BackendUnavailable(
                    "verification timed out".to_string(),
                ));
            }
            Err(e) => return Err(VerifierFault::Unreadable(e.to_string())),
        };

        interpret(status, &body)
    }
}

/// Map a verification reply to an outcome.
pub fn interpret(status: StatusCode, body: &[u8]) -> Result<VerificationOutcome, VerifierFault> {
    if !status.is_success() {
        return Ok(VerificationOutcome::Rejected(format!(
            "auth service answered {status}"
        )));
    }

    let parsed: VerifyResponse =
        serde_json::from_slice(body).map_err(|e| VerifierFault::Malformed(e.to_string()))?;

    if !parsed.success {
        return Ok(VerificationOutcome::Rejected(
            "auth service reported failure".to_string(),
        ));
    }

    let data = parsed.data.ok_or(VerifierFault::MissingIdentity("data"))?;
    let user_id = non_empty(data.user_id).ok_or(VerifierFault::MissingIdentity("user_id"))?;
    let email = non_empty(data.email).ok_or(VerifierFault::MissingIdentity("email"))?;
    let role = non_empty(data.role).ok_or(VerifierFault::MissingIdentity("role"))?;

    Ok(VerificationOutcome::Authenticated(Identity {
        user_id,
        email,
        role,
    }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_payload() {
        let body = br#"{"success":true,"data":{"valid":true,"user_id":"u1","email":"a@b.com","role":"member","expires_at":1}}"#;
        assert_eq!(
            interpret(StatusCode::OK, body),
            Ok(VerificationOutcome::Authenticated(Identity {
                user_id: "u1".into(),
                email: "a@b.com".into(),
                role: "member".into(),
            }))
        );
    }

    #[test]
    fn test_non_2xx_is_rejected_even_with_garbage_body() {
        let outcome = interpret(StatusCode::UNAUTHORIZED, b"<html>nope</html>").unwrap();
        assert!(matches!(outcome, VerificationOutcome::Rejected(_)));
    }

    #[test]
    fn test_unsuccessful_payload_is_rejected() {
        let outcome = interpret(StatusCode::OK, br#"{"success":false}"#).unwrap();
        assert!(matches!(outcome, VerificationOutcome::Rejected(_)));

        let outcome = interpret(StatusCode::OK, br#"{}"#).unwrap();
        assert!(matches!(outcome, VerificationOutcome::Rejected(_)));
    }

    #[test]
    fn test_unparsable_payload_is_a_fault() {
        let fault = interpret(StatusCode::OK, b"not json").unwrap_err();
        assert!(matches!(fault, VerifierFault::Malformed(_)));
        assert_eq!(fault.public_message(), "Failed to parse auth response");
    }

    #[test]
    fn test_missing_identity_fields_are_faults() {
        let cases: [(&[u8], &str); 4] = [
            (br#"{"success":true}"#, "data"),
            (br#"{"success":true,"data":{"email":"a@b.com","role":"member"}}"#, "user_id"),
            (br#"{"success":true,"data":{"user_id":"","email":"a@b.com","role":"member"}}"#, "user_id"),
            (br#"{"success":true,"data":{"user_id":"u1","email":"a@b.com","role":""}}"#, "role"),
        ];
        for (body, field) in cases {
            let fault = interpret(StatusCode::OK, body).unwrap_err();
            assert_eq!(fault, VerifierFault::MissingIdentity(field));
            assert_eq!(fault.public_message(), "Invalid user data from auth service");
        }
    }

    #[test]
    fn test_verify_url_is_joined() {
        let verifier = IdentityVerifier::new("http://auth:8080", &TimeoutConfig::default()).unwrap();
        assert_eq!(verifier.verify_url().as_str(), "http://auth:8080/token-verify");
    }
}
