use thiserror::Error;

use super::claims::TokenKind;

/// Error type for token operations.
///
/// Variants are kept distinct for logging and tests. Callers facing the
/// network should collapse all validation variants into one generic message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token algorithm is not accepted")]
    AlgorithmMismatch,

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token is not yet valid")]
    NotYetValid,

    #[error("Expected a {expected} token")]
    WrongKind { expected: TokenKind },
}

impl TokenError {
    /// Short label for log fields.
    pub fn category(&self) -> &'static str {
        match self {
            TokenError::SigningFailed(_) => "signing_failed",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::AlgorithmMismatch => "algorithm_mismatch",
            TokenError::Malformed(_) => "malformed",
            TokenError::Expired => "expired",
            TokenError::NotYetValid => "not_yet_valid",
            TokenError::WrongKind { .. } => "wrong_kind",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifetimeError {
    #[error("Token lifetimes must be positive")]
    NotPositive,

    #[error("Access token lifetime must be shorter than refresh token lifetime")]
    AccessNotShorter,

    #[error("Token lifetime is out of range")]
    OutOfRange,
}
