use async_trait::async_trait;
use auth::IdentityContext;
use auth::TokenPair;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for credential service operations.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Register a new principal and issue its first token pair.
    ///
    /// # Arguments
    /// * `command` - Validated command containing email, password, and name
    ///
    /// # Returns
    /// Created user and token pair
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `PasswordHashing` - Password hashing failed
    /// * `TokenIssuance` - Token signing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, UserError>;

    /// Verify credentials and issue a token pair.
    ///
    /// # Arguments
    /// * `command` - Validated command containing email and password
    ///
    /// # Returns
    /// Authenticated user and token pair
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `PasswordHashing` - Stored hash could not be checked
    /// * `TokenIssuance` - Token signing failed
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, UserError>;

    /// Exchange a refresh token for a new token pair.
    ///
    /// # Arguments
    /// * `refresh_token` - Previously issued refresh token
    ///
    /// # Returns
    /// Brand-new token pair for the same principal
    ///
    /// # Errors
    /// * `InvalidToken` - Token is expired, malformed, or badly signed
    /// * `TokenIssuance` - Token signing failed
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, UserError>;

    /// End a session.
    ///
    /// Nothing is revoked: outstanding tokens stay valid until they expire.
    async fn logout(&self) -> Result<(), UserError>;

    /// Load the principal behind an authenticated request.
    ///
    /// # Errors
    /// * `Unauthorized` - Request carries no identity
    /// * `NotFound` - Principal no longer exists
    /// * `DatabaseError` - Database operation failed
    async fn current_user(&self, identity: &IdentityContext) -> Result<User, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Arguments
    /// * `user` - User entity to create
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Arguments
    /// * `email` - Validated email address
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Arguments
    /// * `id` - User ID
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
}
