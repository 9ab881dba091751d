use crate::identity::IdentityContext;
use crate::identity::PrincipalId;
use crate::jwt::Claims;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::jwt::TokenKind;
use crate::jwt::TokenPair;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and the token codec. Safe to share between requests:
/// every operation only reads configuration fixed at construction.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
    enforce_token_kind: bool,
}

impl Authenticator {
    /// Create a new authenticator from its parts.
    ///
    /// # Arguments
    /// * `password_hasher` - Credential verifier
    /// * `token_codec` - Token issuer and validator
    pub fn new(password_hasher: PasswordHasher, token_codec: TokenCodec) -> Self {
        Self {
            password_hasher,
            token_codec,
            enforce_token_kind: false,
        }
    }

    /// Authenticator with default hashing cost, default lifetimes and the system clock.
    pub fn from_secret(secret: &[u8]) -> Self {
        Self::new(PasswordHasher::new(), TokenCodec::new(secret))
    }

    /// Only accept access tokens on requests and refresh tokens on refresh.
    ///
    /// Off by default, in which case either kind validates anywhere.
    pub fn with_token_kind_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_token_kind = enforce;
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against a stored hash.
    ///
    /// # Errors
    /// * `Mismatch` - Password does not match
    /// * `VerificationFailed` - Stored hash unusable
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<(), PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Spend the cost of a verification when there is no stored hash to check.
    pub fn burn_verification(&self, password: &str) {
        self.password_hasher.burn_verification(password)
    }

    /// Issue a token pair without password verification.
    ///
    /// Used right after registration, when the credential was just set.
    ///
    /// # Errors
    /// * `SigningFailed` - Token generation failed
    pub fn issue_tokens(&self, principal_id: &PrincipalId, email: &str) -> Result<TokenPair, TokenError> {
        self.token_codec.issue(principal_id, email)
    }

    /// Validate a token presented for request authentication.
    ///
    /// # Errors
    /// * `TokenError` - Token validation failed
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        if self.enforce_token_kind {
            self.token_codec.validate_kind(token, TokenKind::Access)
        } else {
            self.token_codec.validate(token)
        }
    }

    /// Resolve a bearer token into the request identity.
    ///
    /// # Errors
    /// * `TokenError` - Token validation failed
    pub fn identify(&self, token: &str) -> Result<IdentityContext, TokenError> {
        let claims = self.validate_access_token(token)?;
        Ok(IdentityContext::authenticated(claims.principal_id()))
    }

    /// Exchange a refresh token for a brand-new token pair.
    ///
    /// The presented token stays valid until its own expiry.
    ///
    /// # Errors
    /// * `TokenError` - Refresh token validation or new token signing failed
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, TokenError> {
        let claims = if self.enforce_token_kind {
            self.token_codec.validate_kind(refresh_token, TokenKind::Refresh)?
        } else {
            self.token_codec.validate(refresh_token)?
        };

        self.token_codec.issue(&claims.principal_id(), &claims.email)
    }
}
