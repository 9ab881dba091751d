use std::fmt;
use std::str::FromStr;

use auth::PrincipalId;
use auth::TokenPair;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::NameError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// Represents a registered principal together with its stored credential.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub name: DisplayName,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }

    /// Principal identifier carried in issued tokens.
    pub fn to_principal(&self) -> PrincipalId {
        PrincipalId::new(self.0.to_string())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Trimmed, 3 to 255 characters, RFC 5322 shaped, with a dotted domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 255;

    /// Create a new validated email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Returns
    /// Validated EmailAddress value object
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 3 characters after trimming
    /// * `TooLong` - More than 255 characters after trimming
    /// * `InvalidFormat` - Not a valid address shape
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_string();
        let email = Self::with_valid_length(email)?;
        let email = Self::with_valid_shape(email)?;
        Ok(Self(email))
    }

    fn with_valid_length(email: String) -> Result<String, EmailError> {
        let length = email.chars().count();
        if length < Self::MIN_LENGTH {
            Err(EmailError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(email)
        }
    }

    fn with_valid_shape(email: String) -> Result<String, EmailError> {
        let parsed = email_address::EmailAddress::from_str(&email)
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))?;

        let domain = parsed.domain();
        let has_dotted_domain = domain
            .rsplit_once('.')
            .map(|(host, tld)| !host.is_empty() && tld.len() >= 2)
            .unwrap_or(false);

        if has_dotted_domain {
            Ok(email)
        } else {
            Err(EmailError::InvalidFormat(format!(
                "domain '{}' has no top-level part",
                domain
            )))
        }
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password that satisfied the length policy.
///
/// Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;
    const MAX_LENGTH: usize = 128;

    /// # Errors
    /// * `TooShort` - Fewer than 8 characters
    /// * `TooLong` - More than 128 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(PasswordPolicyError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(password))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Display name of a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MAX_LENGTH: usize = 255;

    /// # Errors
    /// * `Empty` - Blank after trimming
    /// * `TooLong` - More than 255 characters
    pub fn new(name: String) -> Result<Self, NameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();
        if length == 0 {
            Err(NameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(NameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to register a new principal with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: Password,
    pub name: DisplayName,
}

impl RegisterCommand {
    /// Validate raw registration input.
    ///
    /// # Errors
    /// * `InvalidEmail`, `InvalidPassword`, `InvalidName` - First violated constraint
    pub fn parse(
        email: String,
        password: String,
        name: String,
    ) -> Result<Self, crate::user::errors::UserError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            password: Password::new(password)?,
            name: DisplayName::new(name)?,
        })
    }
}

/// Command to log in with domain types
#[derive(Debug)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: Password,
}

impl LoginCommand {
    /// Validate raw login input before any lookup happens.
    pub fn parse(email: String, password: String) -> Result<Self, crate::user::errors::UserError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            password: Password::new(password)?,
        })
    }
}

/// Principal plus the token pair issued for it.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub tokens: TokenPair,
}
