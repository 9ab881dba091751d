use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Identifier of an authenticated principal, as carried in the `sub` claim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrincipalId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PrincipalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Authentication required")]
pub struct UnauthorizedError;

/// Verified identity attached to a single request.
///
/// Built once by the authentication gate and never changed afterwards:
/// there is no setter, only the two constructors. Handlers that need a
/// caller call [`IdentityContext::require_auth`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityContext {
    principal: Option<PrincipalId>,
}

impl IdentityContext {
    /// Context for a request that presented no credential.
    pub fn anonymous() -> Self {
        Self { principal: None }
    }

    /// Context for a request whose bearer token was validated.
    ///
    /// An empty principal id is treated as no identity.
    pub fn authenticated(principal: PrincipalId) -> Self {
        if principal.as_str().is_empty() {
            return Self::anonymous();
        }
        Self {
            principal: Some(principal),
        }
    }

    pub fn principal(&self) -> Option<&PrincipalId> {
        self.principal.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// Return the verified principal or fail when the request is anonymous.
    ///
    /// # Errors
    /// * `UnauthorizedError` - No identity was attached to this request
    pub fn require_auth(&self) -> Result<&PrincipalId, UnauthorizedError> {
        self.principal.as_ref().ok_or(UnauthorizedError)
    }
}
