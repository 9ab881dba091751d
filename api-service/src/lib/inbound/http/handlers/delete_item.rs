use auth::IdentityContext;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use crate::domain::item::models::ItemId;
use crate::domain::item::ports::ItemServicePort;
use crate::inbound::http::router::AppState;
use crate::item::errors::ItemError;

pub async fn delete_item(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityContext>,
    Path(item_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let item_id = ItemId::from_string(&item_id).map_err(ItemError::from)?;

    state
        .item_service
        .delete_item(&identity, &item_id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
