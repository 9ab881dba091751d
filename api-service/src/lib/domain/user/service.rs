use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::IdentityContext;
use auth::TokenPair;
use chrono::Utc;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::CredentialServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementation for credential flows.
///
/// Composes the user repository with the shared [`Authenticator`].
/// Password hashing runs on the blocking pool so that a slow hash never
/// stalls the async workers, and finishes even if the request is dropped.
pub struct CredentialService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> CredentialService<UR>
where
    UR: UserRepository,
{
    /// Create a new credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password verifier and token codec
    ///
    /// # Returns
    /// Configured credential service instance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn hash_password(&self, password: Password) -> Result<String, UserError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
            .await
            .map_err(|e| UserError::Unknown(format!("Hashing task failed: {}", e)))?
            .map_err(|e| UserError::PasswordHashing(e.to_string()))
    }

    async fn verify_password(&self, password: Password, user: Option<&User>) -> Result<(), UserError> {
        let authenticator = Arc::clone(&self.authenticator);
        let stored_hash = user.map(|u| u.password_hash.clone());

        let outcome = tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => authenticator.verify_password(password.expose(), &hash),
            None => {
                authenticator.burn_verification(password.expose());
                Err(auth::PasswordError::Mismatch)
            }
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Verification task failed: {}", e)))?;

        match outcome {
            Ok(()) => Ok(()),
            Err(auth::PasswordError::Mismatch) => Err(UserError::InvalidCredentials),
            Err(e) => Err(UserError::PasswordHashing(e.to_string())),
        }
    }

    fn issue_tokens(&self, user: &User) -> Result<TokenPair, UserError> {
        self.authenticator
            .issue_tokens(&user.id.to_principal(), user.email.as_str())
            .map_err(UserError::from)
    }
}

#[async_trait]
impl<UR> CredentialServicePort for CredentialService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, UserError> {
        let password_hash = self.hash_password(command.password).await?;

        let user = User {
            id: UserId::new(),
            email: command.email,
            name: command.name,
            password_hash,
            created_at: Utc::now(),
        };

        let user = self.repository.create(user).await?;
        let tokens = self.issue_tokens(&user)?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(AuthSession { user, tokens })
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthSession, UserError> {
        let user = self.repository.find_by_email(&command.email).await?;

        if let Err(e) = self.verify_password(command.password, user.as_ref()).await {
            if matches!(e, UserError::InvalidCredentials) {
                tracing::warn!(known_email = user.is_some(), "Login rejected");
            }
            return Err(e);
        }

        // verify_password only succeeds against a stored hash
        let user = user.ok_or(UserError::InvalidCredentials)?;
        let tokens = self.issue_tokens(&user)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthSession { user, tokens })
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, UserError> {
        self.authenticator.refresh(refresh_token).map_err(|e| {
            tracing::warn!(reason = e.category(), "Refresh token rejected");
            UserError::from(e)
        })
    }

    async fn logout(&self) -> Result<(), UserError> {
        // No revocation store: outstanding tokens expire on their own.
        tracing::info!("Logout requested");
        Ok(())
    }

    async fn current_user(&self, identity: &IdentityContext) -> Result<User, UserError> {
        let principal = identity.require_auth()?;
        let id = UserId::from_string(principal.as_str())?;

        self.repository
            .find_by_id(&id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}
