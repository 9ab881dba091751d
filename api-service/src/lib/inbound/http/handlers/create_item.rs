use auth::IdentityContext;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::ItemData;
use crate::domain::item::models::CreateItemCommand;
use crate::domain::item::models::ItemName;
use crate::domain::item::models::ItemStatus;
use crate::domain::item::ports::ItemServicePort;
use crate::inbound::http::router::AppState;
use crate::item::errors::ItemError;

pub async fn create_item(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityContext>,
    Json(body): Json<CreateItemRequest>,
) -> Result<ApiSuccess<ItemData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .item_service
        .create_item(&identity, command)
        .await
        .map_err(ApiError::from)
        .map(|ref item| ApiSuccess::new(StatusCode::CREATED, item.into()))
}

/// HTTP request body for creating an item (raw JSON)
#[derive(Deserialize)]
pub struct CreateItemRequest {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: Option<String>,
}

impl CreateItemRequest {
    fn try_into_command(self) -> Result<CreateItemCommand, ItemError> {
        let status = match self.status {
            Some(status) => status.parse::<ItemStatus>()?,
            None => ItemStatus::default(),
        };

        Ok(CreateItemCommand {
            name: ItemName::new(self.name)?,
            description: self.description,
            status,
        })
    }
}
