use thiserror::Error;

use crate::user::errors::UserIdError;

/// Error for ItemId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ItemIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for ItemName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ItemNameError {
    #[error("Item name is required")]
    Empty,

    #[error("Item name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for ItemStatus parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ItemStatusError {
    #[error("Unknown item status '{0}' (expected draft, active or archived)")]
    Unknown(String),
}

/// Top-level error for all item-related operations
#[derive(Debug, Clone, Error)]
pub enum ItemError {
    #[error("Invalid item ID: {0}")]
    InvalidItemId(#[from] ItemIdError),

    #[error("Invalid item name: {0}")]
    InvalidName(#[from] ItemNameError),

    #[error("Invalid item status: {0}")]
    InvalidStatus(#[from] ItemStatusError),

    #[error("Invalid owner identity: {0}")]
    InvalidOwner(#[from] UserIdError),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Authentication required")]
    Unauthorized(#[from] auth::UnauthorizedError),

    #[error("You don't have permission to modify this item")]
    Forbidden(#[from] auth::OwnershipError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
