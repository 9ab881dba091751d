use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::Error as JwtLibError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::TokenKind;
use super::errors::LifetimeError;
use super::errors::TokenError;
use super::pair::TokenPair;
use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::identity::PrincipalId;

/// HMAC algorithms a presented token may declare.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Lifetimes of the two halves of a token pair.
///
/// Access lifetime is always strictly shorter than refresh lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    access: Duration,
    refresh: Duration,
}

impl TokenLifetimes {
    /// # Errors
    /// * `NotPositive` - Either lifetime is zero or negative
    /// * `AccessNotShorter` - Access lifetime is not shorter than refresh lifetime
    pub fn new(access: Duration, refresh: Duration) -> Result<Self, LifetimeError> {
        if access <= Duration::zero() || refresh <= Duration::zero() {
            return Err(LifetimeError::NotPositive);
        }
        if access >= refresh {
            return Err(LifetimeError::AccessNotShorter);
        }
        Ok(Self { access, refresh })
    }

    /// Build lifetimes from whole seconds, as read from configuration.
    pub fn from_secs(access_secs: u64, refresh_secs: u64) -> Result<Self, LifetimeError> {
        let to_duration = |secs: u64| {
            i64::try_from(secs)
                .ok()
                .and_then(Duration::try_seconds)
                .ok_or(LifetimeError::OutOfRange)
        };
        Self::new(to_duration(access_secs)?, to_duration(refresh_secs)?)
    }

    pub fn access(&self) -> Duration {
        self.access
    }

    pub fn refresh(&self) -> Duration {
        self.refresh
    }
}

impl Default for TokenLifetimes {
    /// 15 minutes for access tokens, 7 days for refresh tokens.
    fn default() -> Self {
        Self {
            access: Duration::minutes(15),
            refresh: Duration::days(7),
        }
    }
}

/// Issues and validates signed identity tokens.
///
/// Signs with HS256 over a process-wide shared secret. Validation checks
/// the declared algorithm, the signature, claim structure, and finally
/// `nbf <= now <= exp` against the configured [`Clock`].
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    lifetimes: TokenLifetimes,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec with default lifetimes and the system clock.
    ///
    /// # Arguments
    /// * `secret` - Shared signing secret (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            lifetimes: TokenLifetimes::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_lifetimes(mut self, lifetimes: TokenLifetimes) -> Self {
        self.lifetimes = lifetimes;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Mint an access and a refresh token for a principal.
    ///
    /// Both tokens share `iat = nbf = now` and differ only in `exp` and `kind`.
    ///
    /// # Arguments
    /// * `principal_id` - Subject of both tokens
    /// * `email` - Principal email, copied into the claims
    ///
    /// # Errors
    /// * `SigningFailed` - Expiry out of range or signing failed
    pub fn issue(&self, principal_id: &PrincipalId, email: &str) -> Result<TokenPair, TokenError> {
        let now = self.clock.now();
        let expiry = |lifetime: Duration| {
            now.checked_add_signed(lifetime)
                .ok_or_else(|| TokenError::SigningFailed("expiry out of range".to_string()))
        };
        let access_expires_at = expiry(self.lifetimes.access)?;
        let refresh_expires_at = expiry(self.lifetimes.refresh)?;

        let access = Claims::new(principal_id, email, TokenKind::Access, now, access_expires_at);
        let refresh = Claims::new(principal_id, email, TokenKind::Refresh, now, refresh_expires_at);

        Ok(TokenPair {
            access_token: self.encode(&access)?,
            refresh_token: self.encode(&refresh)?,
            access_expires_at,
            refresh_expires_at,
        })
    }

    /// Sign claims into a compact JWT.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    /// Validate a token of either kind and return its claims.
    ///
    /// # Errors
    /// * `AlgorithmMismatch` - Header declares a non-HMAC algorithm
    /// * `InvalidSignature` - Signature does not match the shared secret
    /// * `Malformed` - Token or claims are structurally invalid
    /// * `NotYetValid` - Current time is before `nbf`
    /// * `Expired` - Current time is after `exp`
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation())
            .map_err(map_decode_error)?
            .claims;

        if !claims.is_well_formed() {
            return Err(TokenError::Malformed("inconsistent claims".to_string()));
        }

        let now = self.clock.now().timestamp();
        if claims.is_not_yet_valid(now) {
            return Err(TokenError::NotYetValid);
        }
        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Validate a token and require it to be of the given kind.
    ///
    /// # Errors
    /// * Any error from [`TokenCodec::validate`]
    /// * `WrongKind` - Token is valid but minted as the other kind
    pub fn validate_kind(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let claims = self.validate(token)?;
        if claims.kind != expected {
            return Err(TokenError::WrongKind { expected });
        }
        Ok(claims)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        // Time window is checked against the injected clock with no leeway.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.required_spec_claims.clear();
        validation
    }
}

fn map_decode_error(error: JwtLibError) -> TokenError {
    match error.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName | ErrorKind::MissingAlgorithm => {
            TokenError::AlgorithmMismatch
        }
        _ => TokenError::Malformed(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn codec_with_clock() -> (TokenCodec, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let codec = TokenCodec::new(SECRET).with_clock(clock.clone());
        (codec, clock)
    }

    #[test]
    fn test_issue_and_validate() {
        let (codec, _) = codec_with_clock();

        let pair = codec.issue(&"user123".into(), "alice@example.com").unwrap();
        let claims = codec.validate(&pair.access_token).unwrap();

        assert_eq!(claims.principal_id().as_str(), "user123");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.iat, claims.nbf);
    }

    #[test]
    fn test_issue_lifetimes() {
        let (codec, clock) = codec_with_clock();
        let now = clock.now();

        let pair = codec.issue(&"user123".into(), "alice@example.com").unwrap();

        assert_eq!(pair.access_expires_at - now, Duration::minutes(15));
        assert_eq!(pair.refresh_expires_at - now, Duration::days(7));
        assert_eq!(pair.expires_at(), pair.access_expires_at);

        let refresh = codec.validate(&pair.refresh_token).unwrap();
        assert_eq!(refresh.kind, TokenKind::Refresh);
        assert_eq!(refresh.expires_at(), Some(pair.refresh_expires_at));
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let (codec, clock) = codec_with_clock();
        let pair = codec.issue(&"user123".into(), "alice@example.com").unwrap();

        clock.advance(Duration::minutes(15));
        assert!(codec.validate(&pair.access_token).is_ok());

        clock.advance(Duration::seconds(1));
        assert_eq!(codec.validate(&pair.access_token), Err(TokenError::Expired));

        // Refresh token outlives the access token.
        assert!(codec.validate(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_not_yet_valid() {
        let (codec, clock) = codec_with_clock();
        let pair = codec.issue(&"user123".into(), "alice@example.com").unwrap();

        clock.advance(Duration::seconds(-1));
        assert_eq!(codec.validate(&pair.access_token), Err(TokenError::NotYetValid));
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let (codec, _) = codec_with_clock();
        let other = TokenCodec::new(b"another_secret_key_at_least_32_bytes");

        let pair = other.issue(&"user123".into(), "alice@example.com").unwrap();

        assert_eq!(codec.validate(&pair.access_token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_tampered_payload_is_invalid_signature() {
        let (codec, _) = codec_with_clock();
        let pair = codec.issue(&"user123".into(), "alice@example.com").unwrap();

        let parts: Vec<&str> = pair.access_token.split('.').collect();
        let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
        let mut claims: Claims = serde_json::from_slice(&payload).unwrap();
        claims.sub = "admin".to_string();
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(codec.validate(&forged), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_non_hmac_algorithm_rejected() {
        let (codec, _) = codec_with_clock();
        let pair = codec.issue(&"user123".into(), "alice@example.com").unwrap();
        let parts: Vec<&str> = pair.access_token.split('.').collect();

        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let forged = format!("{}.{}.{}", header, parts[1], parts[2]);

        assert_eq!(codec.validate(&forged), Err(TokenError::AlgorithmMismatch));
    }

    #[test]
    fn test_unsigned_token_rejected() {
        let (codec, _) = codec_with_clock();
        let pair = codec.issue(&"user123".into(), "alice@example.com").unwrap();
        let parts: Vec<&str> = pair.access_token.split('.').collect();

        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let forged = format!("{}.{}.", header, parts[1]);

        assert!(codec.validate(&forged).is_err());
    }

    #[test]
    fn test_garbage_is_malformed() {
        let (codec, _) = codec_with_clock();

        assert!(matches!(codec.validate("not-a-token"), Err(TokenError::Malformed(_))));
        assert!(matches!(codec.validate(""), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_empty_subject_is_malformed() {
        let (codec, clock) = codec_with_clock();
        let now = clock.now();
        let claims = Claims::new(
            &"".into(),
            "alice@example.com",
            TokenKind::Access,
            now,
            now + Duration::minutes(1),
        );
        let token = codec.encode(&claims).unwrap();

        assert!(matches!(codec.validate(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_validate_kind() {
        let (codec, _) = codec_with_clock();
        let pair = codec.issue(&"user123".into(), "alice@example.com").unwrap();

        assert!(codec.validate_kind(&pair.access_token, TokenKind::Access).is_ok());
        assert!(codec.validate_kind(&pair.refresh_token, TokenKind::Refresh).is_ok());
        assert_eq!(
            codec.validate_kind(&pair.refresh_token, TokenKind::Access),
            Err(TokenError::WrongKind {
                expected: TokenKind::Access
            })
        );
    }

    #[test]
    fn test_custom_lifetimes() {
        let lifetimes = TokenLifetimes::from_secs(60, 120).unwrap();
        let (codec, clock) = codec_with_clock();
        let codec = codec.with_lifetimes(lifetimes);

        let pair = codec.issue(&"user123".into(), "alice@example.com").unwrap();
        assert_eq!(pair.access_expires_at - clock.now(), Duration::seconds(60));
    }

    #[test]
    fn test_lifetimes_must_be_ordered() {
        assert_eq!(
            TokenLifetimes::from_secs(900, 900),
            Err(LifetimeError::AccessNotShorter)
        );
        assert_eq!(TokenLifetimes::from_secs(0, 900), Err(LifetimeError::NotPositive));
        assert_eq!(
            TokenLifetimes::from_secs(u64::MAX, u64::MAX),
            Err(LifetimeError::OutOfRange)
        );
    }
}
