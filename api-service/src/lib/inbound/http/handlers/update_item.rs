use auth::IdentityContext;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::ItemData;
use crate::domain::item::models::ItemId;
use crate::domain::item::models::ItemName;
use crate::domain::item::models::ItemStatus;
use crate::domain::item::models::UpdateItemCommand;
use crate::domain::item::ports::ItemServicePort;
use crate::inbound::http::router::AppState;
use crate::item::errors::ItemError;

pub async fn update_item(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityContext>,
    Path(item_id): Path<String>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<ApiSuccess<ItemData>, ApiError> {
    let item_id = ItemId::from_string(&item_id).map_err(ItemError::from)?;
    let command = body.try_into_command()?;

    state
        .item_service
        .update_item(&identity, &item_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref item| ApiSuccess::new(StatusCode::OK, item.into()))
}

/// HTTP request body for a partial item update. Absent fields are kept.
#[derive(Deserialize, Default)]
pub struct UpdateItemRequest {
    name: Option<String>,
    description: Option<String>,
    status: Option<String>,
}

impl UpdateItemRequest {
    fn try_into_command(self) -> Result<UpdateItemCommand, ItemError> {
        Ok(UpdateItemCommand {
            name: self.name.map(ItemName::new).transpose()?,
            description: self.description,
            status: self
                .status
                .map(|status| status.parse::<ItemStatus>())
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_changes_nothing() {
        let command = UpdateItemRequest::default().try_into_command().unwrap();
        assert!(command.name.is_none());
        assert!(command.description.is_none());
        assert!(command.status.is_none());
    }

    #[test]
    fn test_provided_fields_validated() {
        let request = UpdateItemRequest {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(request.try_into_command(), Err(ItemError::InvalidName(_))));

        let request = UpdateItemRequest {
            status: Some("archived".to_string()),
            ..Default::default()
        };
        assert_eq!(
            request.try_into_command().unwrap().status,
            Some(ItemStatus::Archived)
        );
    }
}
