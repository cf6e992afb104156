//! Identity verification subsystem.
//!
//! # Data Flow
//! ```text
//! Authorization: Bearer <token>
//!     → verifier.rs (POST /token-verify on the auth service)
//!     → identity.rs (VerificationOutcome / Identity)
//!     → X-User-ID, X-User-Email, X-User-Role on the forwarded request
//! ```

pub mod identity;
pub mod verifier;

pub use identity::{
    strip_identity_headers, Identity, VerificationOutcome, X_USER_EMAIL, X_USER_ID, X_USER_ROLE,
};
pub use verifier::{interpret, IdentityVerifier, VerifierFault, VERIFY_PATH};
