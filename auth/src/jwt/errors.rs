use thiserror::Error;

/// Reasons a session token could not be produced or accepted.
///
/// The distinction is for logs only. Whoever answers a client collapses every
/// rejection into one "invalid token" outcome.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature rejected: {0}")]
    BadSignature(String),

    #[error("Token has expired")]
    Expired,
}
