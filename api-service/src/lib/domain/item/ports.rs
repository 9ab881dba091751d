use async_trait::async_trait;
use auth::IdentityContext;

use crate::domain::item::models::CreateItemCommand;
use crate::domain::item::models::Item;
use crate::domain::item::models::ItemId;
use crate::domain::item::models::UpdateItemCommand;
use crate::item::errors::ItemError;
use crate::user::models::UserId;

/// Port for item domain service operations.
///
/// Mutating operations take the caller's [`IdentityContext`] and enforce
/// ownership before anything is written.
#[async_trait]
pub trait ItemServicePort: Send + Sync + 'static {
    /// Create an item owned by the caller.
    ///
    /// # Errors
    /// * `Unauthorized` - Request carries no identity
    /// * `DatabaseError` - Database operation failed
    async fn create_item(
        &self,
        identity: &IdentityContext,
        command: CreateItemCommand,
    ) -> Result<Item, ItemError>;

    /// Retrieve item by identifier. Public.
    ///
    /// # Errors
    /// * `NotFound` - Item does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_item(&self, id: &ItemId) -> Result<Item, ItemError>;

    /// List all items, newest first. Public.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_items(&self) -> Result<Vec<Item>, ItemError>;

    /// Update an item the caller owns.
    ///
    /// # Arguments
    /// * `identity` - Caller identity
    /// * `id` - Item to update
    /// * `command` - Optional name, description and status
    ///
    /// # Returns
    /// Updated item entity
    ///
    /// # Errors
    /// * `Unauthorized` - Request carries no identity
    /// * `NotFound` - Item does not exist
    /// * `Forbidden` - Caller is not the owner
    /// * `DatabaseError` - Database operation failed
    async fn update_item(
        &self,
        identity: &IdentityContext,
        id: &ItemId,
        command: UpdateItemCommand,
    ) -> Result<Item, ItemError>;

    /// Delete an item the caller owns.
    ///
    /// # Errors
    /// * `Unauthorized` - Request carries no identity
    /// * `NotFound` - Item does not exist
    /// * `Forbidden` - Caller is not the owner
    /// * `DatabaseError` - Database operation failed
    async fn delete_item(&self, identity: &IdentityContext, id: &ItemId) -> Result<(), ItemError>;
}

/// Persistence operations for items.
#[async_trait]
pub trait ItemRepository: Send + Sync + 'static {
    /// Persist new item to storage.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, item: Item) -> Result<Item, ItemError>;

    /// Retrieve item by identifier.
    ///
    /// # Returns
    /// Optional item entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemError>;

    /// Retrieve only the recorded owner of an item.
    ///
    /// # Returns
    /// Optional owner ID (None if the item does not exist)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_owner(&self, id: &ItemId) -> Result<Option<UserId>, ItemError>;

    /// Retrieve all items ordered by creation time, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list(&self) -> Result<Vec<Item>, ItemError>;

    /// Update existing item in storage.
    ///
    /// # Errors
    /// * `NotFound` - Item does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, item: Item) -> Result<Item, ItemError>;

    /// Remove item from storage.
    ///
    /// # Errors
    /// * `NotFound` - Item does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &ItemId) -> Result<(), ItemError>;
}
