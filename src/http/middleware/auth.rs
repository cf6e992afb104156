//! Bearer-token authentication stage.
//!
//! Public paths skip verification. Everything else must carry
//! `Authorization: Bearer <token>`, which is checked against the
//! authorization service before the request may continue.

use axum::{
    http::{header, HeaderMap},
    response::IntoResponse,
};

use crate::auth::{strip_identity_headers, IdentityVerifier, VerificationOutcome};
use crate::error::ApiError;
use crate::observability::metrics;
use crate::pipeline::{Flow, RequestContext};

/// Path prefixes reachable without a token.
pub const PUBLIC_PREFIXES: [&str; 3] = ["/health", "/api/auth/signup", "/api/auth/signin"];

const BEARER: &str = "Bearer ";

pub fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// Everything after the scheme is the token, passed on as-is. A blank
/// remainder counts as no token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER)
        .filter(|token| !token.trim().is_empty())
}

/// Verify the caller and stamp the identity headers onto the request.
pub async fn authenticate(verifier: &IdentityVerifier, ctx: &mut RequestContext) -> Flow {
    // identity headers are only ever set by the gateway
    strip_identity_headers(ctx.headers_mut());

    if is_public(ctx.path()) {
        return Flow::Continue;
    }

    let Some(token) = bearer_token(ctx.headers()) else {
        metrics::record_verification("missing_credential");
        return reject(ApiError::unauthorized(
            "Missing or invalid authorization header",
        ));
    };

    match verifier.verify(token).await {
        Ok(VerificationOutcome::Authenticated(identity)) => {
            if let Err(e) = identity.apply_to(ctx.headers_mut()) {
                tracing::error!(error = %e, user_id = %identity.user_id, "Identity not representable as headers");
                metrics::record_verification("fault");
                return reject(ApiError::internal("Invalid user data from auth service"));
            }
            tracing::debug!(user_id = %identity.user_id, role = %identity.role, "Caller authenticated");
            metrics::record_verification("authenticated");
            Flow::Continue
        }
        Ok(VerificationOutcome::Rejected(reason)) => {
            tracing::debug!(%reason, "Token rejected");
            metrics::record_verification("rejected");
            reject(ApiError::unauthorized("Invalid or expired token"))
        }
        Ok(VerificationOutcome::BackendUnavailable(reason)) => {
            tracing::warn!(%reason, "Auth service unavailable");
            metrics::record_verification("unavailable");
            reject(ApiError::unauthorized("Token verification failed"))
        }
        Err(fault) => {
            tracing::error!(error = %fault, "Auth service response violated contract");
            metrics::record_verification("fault");
            reject(ApiError::internal(fault.public_message()))
        }
    }
}

fn reject(error: ApiError) -> Flow {
    Flow::Respond(error.into_response())
}
