use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::identity::PrincipalId;

/// Which half of a token pair a token was minted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Identity claims carried by every issued token.
///
/// Timestamps are Unix seconds. `email` is informational and must not be
/// used for authorization decisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (principal identifier)
    pub sub: String,

    /// Principal email at issuance time
    pub email: String,

    /// Issued at
    pub iat: i64,

    /// Not before
    pub nbf: i64,

    /// Expiration time
    pub exp: i64,

    /// Token kind (access or refresh)
    pub kind: TokenKind,
}

impl Claims {
    /// Build claims valid from `issued_at` until `expires_at` inclusive.
    pub fn new(
        principal_id: &PrincipalId,
        email: impl Into<String>,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: principal_id.as_str().to_string(),
            email: email.into(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            kind,
        }
    }

    pub fn principal_id(&self) -> PrincipalId {
        PrincipalId::new(self.sub.clone())
    }

    /// Check if token is expired. A token is still valid at exactly `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }

    pub fn is_not_yet_valid(&self, current_timestamp: i64) -> bool {
        self.nbf > current_timestamp
    }

    /// Structural checks that do not depend on the clock.
    pub fn is_well_formed(&self) -> bool {
        !self.sub.is_empty() && self.iat <= self.exp && self.nbf <= self.exp
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
