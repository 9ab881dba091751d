use std::sync::Arc;

use async_trait::async_trait;
use auth::check_ownership;
use auth::IdentityContext;
use auth::PrincipalId;
use chrono::Utc;

use crate::domain::item::models::CreateItemCommand;
use crate::domain::item::models::Item;
use crate::domain::item::models::ItemId;
use crate::domain::item::models::UpdateItemCommand;
use crate::item::errors::ItemError;
use crate::item::ports::ItemRepository;
use crate::item::ports::ItemServicePort;
use crate::user::models::UserId;

/// Domain service implementation for item operations.
pub struct ItemService<IR>
where
    IR: ItemRepository,
{
    repository: Arc<IR>,
}

impl<IR> ItemService<IR>
where
    IR: ItemRepository,
{
    pub fn new(repository: Arc<IR>) -> Self {
        Self { repository }
    }

    /// Load the item's owner and confirm it is the caller.
    async fn authorize_mutation(
        &self,
        principal: &PrincipalId,
        id: &ItemId,
    ) -> Result<(), ItemError> {
        let owner = self
            .repository
            .find_owner(id)
            .await?
            .ok_or(ItemError::NotFound(id.to_string()))?;

        check_ownership(principal, &owner.to_principal()).map_err(|e| {
            tracing::warn!(item_id = %id, user_id = %principal, "Ownership check failed");
            ItemError::from(e)
        })
    }
}

#[async_trait]
impl<IR> ItemServicePort for ItemService<IR>
where
    IR: ItemRepository,
{
    async fn create_item(
        &self,
        identity: &IdentityContext,
        command: CreateItemCommand,
    ) -> Result<Item, ItemError> {
        let principal = identity.require_auth()?;
        let owner_id = UserId::from_string(principal.as_str())?;

        let now = Utc::now();
        let item = Item {
            id: ItemId::new(),
            name: command.name,
            description: command.description,
            status: command.status,
            owner_id,
            created_at: now,
            updated_at: now,
        };

        let item = self.repository.create(item).await?;
        tracing::info!(item_id = %item.id, user_id = %principal, "Item created");

        Ok(item)
    }

    async fn get_item(&self, id: &ItemId) -> Result<Item, ItemError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ItemError::NotFound(id.to_string()))
    }

    async fn list_items(&self) -> Result<Vec<Item>, ItemError> {
        self.repository.list().await
    }

    async fn update_item(
        &self,
        identity: &IdentityContext,
        id: &ItemId,
        command: UpdateItemCommand,
    ) -> Result<Item, ItemError> {
        let principal = identity.require_auth()?;
        self.authorize_mutation(principal, id).await?;

        let mut item = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ItemError::NotFound(id.to_string()))?;

        command.apply_to(&mut item);
        item.updated_at = Utc::now();

        let item = self.repository.update(item).await?;
        tracing::info!(item_id = %item.id, user_id = %principal, "Item updated");

        Ok(item)
    }

    async fn delete_item(&self, identity: &IdentityContext, id: &ItemId) -> Result<(), ItemError> {
        let principal = identity.require_auth()?;
        self.authorize_mutation(principal, id).await?;

        self.repository.delete(id).await?;
        tracing::info!(item_id = %id, user_id = %principal, "Item deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::item::models::ItemName;
    use crate::domain::item::models::ItemStatus;

    mock! {
        pub TestItemRepository {}

        #[async_trait]
        impl ItemRepository for TestItemRepository {
            async fn create(&self, item: Item) -> Result<Item, ItemError>;
            async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemError>;
            async fn find_owner(&self, id: &ItemId) -> Result<Option<UserId>, ItemError>;
            async fn list(&self) -> Result<Vec<Item>, ItemError>;
            async fn update(&self, item: Item) -> Result<Item, ItemError>;
            async fn delete(&self, id: &ItemId) -> Result<(), ItemError>;
        }
    }

    fn sample_item(owner_id: UserId) -> Item {
        let now = Utc::now();
        Item {
            id: ItemId::new(),
            name: ItemName::new("Lamp".to_string()).unwrap(),
            description: String::new(),
            status: ItemStatus::Draft,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn create_command() -> CreateItemCommand {
        CreateItemCommand {
            name: ItemName::new("Lamp".to_string()).unwrap(),
            description: "Desk lamp".to_string(),
            status: ItemStatus::default(),
        }
    }

    #[tokio::test]
    async fn test_create_item_success() {
        let mut repository = MockTestItemRepository::new();
        let owner = UserId::new();

        repository
            .expect_create()
            .withf(move |item| item.owner_id == owner && item.status == ItemStatus::Draft)
            .times(1)
            .returning(|item| Ok(item));

        let service = ItemService::new(Arc::new(repository));
        let identity = IdentityContext::authenticated(owner.to_principal());

        let item = service.create_item(&identity, create_command()).await.unwrap();
        assert_eq!(item.owner_id, owner);
        assert_eq!(item.description, "Desk lamp");
    }

    #[tokio::test]
    async fn test_create_item_requires_auth() {
        let mut repository = MockTestItemRepository::new();
        repository.expect_create().times(0);

        let service = ItemService::new(Arc::new(repository));

        let result = service
            .create_item(&IdentityContext::anonymous(), create_command())
            .await;
        assert!(matches!(result, Err(ItemError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_get_item_not_found() {
        let mut repository = MockTestItemRepository::new();
        repository.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = ItemService::new(Arc::new(repository));

        let result = service.get_item(&ItemId::new()).await;
        assert!(matches!(result, Err(ItemError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_item_by_owner() {
        let mut repository = MockTestItemRepository::new();
        let owner = UserId::new();
        let existing = sample_item(owner);
        let item_id = existing.id;

        repository
            .expect_find_owner()
            .withf(move |id| *id == item_id)
            .times(1)
            .returning(move |_| Ok(Some(owner)));
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository
            .expect_update()
            .withf(|item| item.status == ItemStatus::Active && item.name.as_str() == "Lamp")
            .times(1)
            .returning(|item| Ok(item));

        let service = ItemService::new(Arc::new(repository));
        let identity = IdentityContext::authenticated(owner.to_principal());
        let command = UpdateItemCommand {
            status: Some(ItemStatus::Active),
            ..Default::default()
        };

        let item = service.update_item(&identity, &item_id, command).await.unwrap();
        assert_eq!(item.status, ItemStatus::Active);
    }

    #[tokio::test]
    async fn test_update_item_by_other_user_is_forbidden() {
        let mut repository = MockTestItemRepository::new();
        let owner = UserId::new();

        repository
            .expect_find_owner()
            .times(1)
            .returning(move |_| Ok(Some(owner)));
        // Nothing is loaded for mutation or written once ownership fails.
        repository.expect_find_by_id().times(0);
        repository.expect_update().times(0);

        let service = ItemService::new(Arc::new(repository));
        let intruder = IdentityContext::authenticated(UserId::new().to_principal());

        let result = service
            .update_item(&intruder, &ItemId::new(), UpdateItemCommand::default())
            .await;
        assert!(matches!(result, Err(ItemError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_missing_item() {
        let mut repository = MockTestItemRepository::new();
        repository.expect_find_owner().times(1).returning(|_| Ok(None));
        repository.expect_update().times(0);

        let service = ItemService::new(Arc::new(repository));
        let identity = IdentityContext::authenticated(UserId::new().to_principal());

        let result = service
            .update_item(&identity, &ItemId::new(), UpdateItemCommand::default())
            .await;
        assert!(matches!(result, Err(ItemError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_item_by_owner() {
        let mut repository = MockTestItemRepository::new();
        let owner = UserId::new();
        let item_id = ItemId::new();

        repository
            .expect_find_owner()
            .times(1)
            .returning(move |_| Ok(Some(owner)));
        repository
            .expect_delete()
            .withf(move |id| *id == item_id)
            .times(1)
            .returning(|_| Ok(()));

        let service = ItemService::new(Arc::new(repository));
        let identity = IdentityContext::authenticated(owner.to_principal());

        assert!(service.delete_item(&identity, &item_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_item_by_other_user_is_forbidden() {
        let mut repository = MockTestItemRepository::new();
        let owner = UserId::new();

        repository
            .expect_find_owner()
            .times(1)
            .returning(move |_| Ok(Some(owner)));
        repository.expect_delete().times(0);

        let service = ItemService::new(Arc::new(repository));
        let intruder = IdentityContext::authenticated(UserId::new().to_principal());

        let result = service.delete_item(&intruder, &ItemId::new()).await;
        assert!(matches!(result, Err(ItemError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_item_requires_auth() {
        let mut repository = MockTestItemRepository::new();
        repository.expect_find_owner().times(0);
        repository.expect_delete().times(0);

        let service = ItemService::new(Arc::new(repository));

        let result = service
            .delete_item(&IdentityContext::anonymous(), &ItemId::new())
            .await;
        assert!(matches!(result, Err(ItemError::Unauthorized(_))));
    }
}
