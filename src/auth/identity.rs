//! Verified caller identity and how it travels downstream.

use axum::http::{
    header::{HeaderName, InvalidHeaderValue},
    HeaderMap, HeaderValue,
};

pub const X_USER_ID: HeaderName = HeaderName::from_static("x-user-id");
pub const X_USER_EMAIL: HeaderName = HeaderName::from_static("x-user-email");
pub const X_USER_ROLE: HeaderName = HeaderName::from_static("x-user-role");

/// Attributes of an authenticated caller. All fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub role: String,
}

impl Identity {
    /// Replace any identity headers in `headers` with this identity.
    ///
    /// Nothing is written unless all three values are valid header values.
    pub fn apply_to(&self, headers: &mut HeaderMap) -> Result<(), InvalidHeaderValue> {
        let user_id = HeaderValue::from_str(&self.user_id)?;
        let email = HeaderValue::from_str(&self.email)?;
        let role = HeaderValue::from_str(&self.role)?;

        // insert() drops every previous value of the name
        headers.insert(X_USER_ID, user_id);
        headers.insert(X_USER_EMAIL, email);
        headers.insert(X_USER_ROLE, role);
        Ok(())
    }
}

/// Remove caller-supplied identity claims.
pub fn strip_identity_headers(headers: &mut HeaderMap) {
    headers.remove(X_USER_ID);
    headers.remove(X_USER_EMAIL);
    headers.remove(X_USER_ROLE);
}

/// Result of asking the authorization service about a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Authenticated(Identity),
    /// The service answered and said no.
    Rejected(String),
    /// The service could not be reached in time.
    BackendUnavailable(String),
}
