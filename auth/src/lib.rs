//! Credential and token core
//!
//! Provides the security-relevant building blocks of the API service:
//! - Password hashing (Argon2id)
//! - Signed access/refresh token issuance and validation (HS256)
//! - Per-request identity context
//! - Ownership authorization check
//! - Authentication coordination
//!
//! Nothing here performs I/O. Storage and transport live in the service crate.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).is_ok());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenCodec;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let pair = codec.issue(&"user123".into(), "alice@example.com").unwrap();
//! let claims = codec.validate(&pair.access_token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```
//!
//! ## Identity and Ownership
//! ```
//! use auth::{check_ownership, Authenticator, OwnershipError};
//!
//! let auth = Authenticator::from_secret(b"secret_key_at_least_32_bytes_long!");
//! let pair = auth.issue_tokens(&"u1".into(), "a@b.com").unwrap();
//!
//! let context = auth.identify(&pair.access_token).unwrap();
//! let caller = context.require_auth().unwrap();
//!
//! assert!(check_ownership(caller, &"u1".into()).is_ok());
//! assert_eq!(check_ownership(caller, &"u2".into()), Err(OwnershipError::Forbidden));
//! ```

pub mod authenticator;
pub mod clock;
pub mod identity;
pub mod jwt;
pub mod ownership;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use identity::IdentityContext;
pub use identity::PrincipalId;
pub use identity::UnauthorizedError;
pub use jwt::Claims;
pub use jwt::LifetimeError;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use jwt::TokenKind;
pub use jwt::TokenLifetimes;
pub use jwt::TokenPair;
pub use ownership::check_ownership;
pub use ownership::OwnershipError;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
