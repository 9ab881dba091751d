use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::ItemData;
use crate::domain::item::ports::ItemServicePort;
use crate::inbound::http::router::AppState;

pub async fn list_items(
    State(state): State<AppState>,
) -> Result<ApiSuccess<ListItemsResponseData>, ApiError> {
    state
        .item_service
        .list_items()
        .await
        .map_err(ApiError::from)
        .map(|items| {
            let items: Vec<ItemData> = items.iter().map(ItemData::from).collect();
            ApiSuccess::new(
                StatusCode::OK,
                ListItemsResponseData {
                    total_count: items.len(),
                    items,
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItemsResponseData {
    pub items: Vec<ItemData>,
    pub total_count: usize,
}
