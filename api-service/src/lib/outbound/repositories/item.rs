use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::item::models::Item;
use crate::domain::item::models::ItemId;
use crate::domain::item::models::ItemName;
use crate::domain::item::models::ItemStatus;
use crate::domain::item::ports::ItemRepository;
use crate::domain::user::models::UserId;
use crate::item::errors::ItemError;

pub struct PostgresItemRepository {
    pool: PgPool,
}

impl PostgresItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    name: String,
    description: String,
    status: String,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for Item {
    type Error = ItemError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        Ok(Item {
            id: ItemId(row.id),
            name: ItemName::new(row.name)?,
            description: row.description,
            status: row.status.parse::<ItemStatus>()?,
            owner_id: UserId(row.owner_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn database_error(e: sqlx::Error) -> ItemError {
    ItemError::DatabaseError(e.to_string())
}

#[async_trait]
impl ItemRepository for PostgresItemRepository {
    async fn create(&self, item: Item) -> Result<Item, ItemError> {
        sqlx::query(
            r#"
            INSERT INTO items (id, name, description, status, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(item.id.0)
        .bind(item.name.as_str())
        .bind(&item.description)
        .bind(item.status.as_str())
        .bind(item.owner_id.0)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(item)
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemError> {
        sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, name, description, status, owner_id, created_at, updated_at
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(Item::try_from)
        .transpose()
    }

    async fn find_owner(&self, id: &ItemId) -> Result<Option<UserId>, ItemError> {
        let owner: Option<(Uuid,)> = sqlx::query_as("SELECT owner_id FROM items WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(owner.map(|(owner_id,)| UserId(owner_id)))
    }

    async fn list(&self) -> Result<Vec<Item>, ItemError> {
        sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, name, description, status, owner_id, created_at, updated_at
            FROM items
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(Item::try_from)
        .collect()
    }

    async fn update(&self, item: Item) -> Result<Item, ItemError> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET name = $2, description = $3, status = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(item.id.0)
        .bind(item.name.as_str())
        .bind(&item.description)
        .bind(item.status.as_str())
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(ItemError::NotFound(item.id.to_string()));
        }

        Ok(item)
    }

    async fn delete(&self, id: &ItemId) -> Result<(), ItemError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(ItemError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
