use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenPairData;
use crate::domain::user::ports::CredentialServicePort;
use crate::inbound::http::router::AppState;

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<ApiSuccess<RefreshTokenResponseData>, ApiError> {
    state
        .credential_service
        .refresh_token(&body.refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|pair| {
            ApiSuccess::new(
                StatusCode::OK,
                RefreshTokenResponseData {
                    token_pair: pair.into(),
                },
            )
        })
}

#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshTokenResponseData {
    pub token_pair: TokenPairData,
}
