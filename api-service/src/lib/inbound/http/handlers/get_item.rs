use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::ItemData;
use crate::domain::item::models::ItemId;
use crate::domain::item::ports::ItemServicePort;
use crate::inbound::http::router::AppState;
use crate::item::errors::ItemError;

pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<ApiSuccess<ItemData>, ApiError> {
    let item_id = ItemId::from_string(&item_id).map_err(ItemError::from)?;

    state
        .item_service
        .get_item(&item_id)
        .await
        .map_err(ApiError::from)
        .map(|ref item| ApiSuccess::new(StatusCode::OK, item.into()))
}
