use thiserror::Error;

use crate::identity::PrincipalId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OwnershipError {
    #[error("Principal does not own this resource")]
    Forbidden,
}

/// Allow a mutation only when the caller is the recorded owner.
///
/// Call after loading the resource and before committing any change to it.
///
/// # Errors
/// * `Forbidden` - `principal` differs from `owner`
pub fn check_ownership(principal: &PrincipalId, owner: &PrincipalId) -> Result<(), OwnershipError> {
    if principal == owner {
        Ok(())
    } else {
        Err(OwnershipError::Forbidden)
    }
}
