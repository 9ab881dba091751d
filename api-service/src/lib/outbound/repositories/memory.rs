use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::item::models::Item;
use crate::domain::item::models::ItemId;
use crate::domain::item::ports::ItemRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::item::errors::ItemError;
use crate::user::errors::UserError;

/// Process-local user store for development without a database.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        // Checked under the write lock, like a unique index.
        if users.values().any(|existing| existing.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| &user.email == email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }
}

/// Process-local item store for development without a database.
#[derive(Default)]
pub struct InMemoryItemRepository {
    items: RwLock<HashMap<ItemId, Item>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn create(&self, item: Item) -> Result<Item, ItemError> {
        self.items.write().await.insert(item.id, item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemError> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn find_owner(&self, id: &ItemId) -> Result<Option<UserId>, ItemError> {
        Ok(self.items.read().await.get(id).map(|item| item.owner_id))
    }

    async fn list(&self) -> Result<Vec<Item>, ItemError> {
        let mut items: Vec<Item> = self.items.read().await.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn update(&self, item: Item) -> Result<Item, ItemError> {
        let mut items = self.items.write().await;
        match items.get_mut(&item.id) {
            Some(stored) => {
                *stored = item.clone();
                Ok(item)
            }
            None => Err(ItemError::NotFound(item.id.to_string())),
        }
    }

    async fn delete(&self, id: &ItemId) -> Result<(), ItemError> {
        self.items
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(ItemError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::Utc;

    use super::*;
    use crate::domain::item::models::ItemName;
    use crate::domain::item::models::ItemStatus;
    use crate::domain::user::models::DisplayName;

    fn user(email: &str) -> User {
        User {
            id: UserId::new(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            name: DisplayName::new("A".to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            created_at: Utc::now(),
        }
    }

    fn item(owner_id: UserId, age_secs: i64) -> Item {
        let created = Utc::now() - Duration::seconds(age_secs);
        Item {
            id: ItemId::new(),
            name: ItemName::new("Lamp".to_string()).unwrap(),
            description: String::new(),
            status: ItemStatus::Draft,
            owner_id,
            created_at: created,
            updated_at: created,
        }
    }

    #[tokio::test]
    async fn test_user_email_is_unique() {
        let repository = InMemoryUserRepository::new();

        repository.create(user("a@b.com")).await.unwrap();
        let result = repository.create(user("a@b.com")).await;

        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_user_lookup() {
        let repository = InMemoryUserRepository::new();
        let created = repository.create(user("a@b.com")).await.unwrap();

        let email = EmailAddress::new("a@b.com".to_string()).unwrap();
        let found = repository.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(repository.find_by_id(&UserId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_items_listed_newest_first() {
        let repository = InMemoryItemRepository::new();
        let owner = UserId::new();

        let older = repository.create(item(owner, 60)).await.unwrap();
        let newer = repository.create(item(owner, 0)).await.unwrap();

        let items = repository.list().await.unwrap();
        assert_eq!(items[0].id, newer.id);
        assert_eq!(items[1].id, older.id);
    }

    #[tokio::test]
    async fn test_item_owner_and_delete() {
        let repository = InMemoryItemRepository::new();
        let owner = UserId::new();
        let created = repository.create(item(owner, 0)).await.unwrap();

        assert_eq!(repository.find_owner(&created.id).await.unwrap(), Some(owner));

        repository.delete(&created.id).await.unwrap();
        assert!(repository.find_owner(&created.id).await.unwrap().is_none());
        assert!(matches!(
            repository.delete(&created.id).await,
            Err(ItemError::NotFound(_))
        ));
    }
}
