use auth::TokenPair;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::item::errors::ItemError;
use crate::item::models::Item;
use crate::user::errors::UserError;
use crate::user::models::User;

pub mod create_item;
pub mod current_user;
pub mod delete_item;
pub mod get_item;
pub mod list_items;
pub mod login;
pub mod logout;
pub mod refresh_token;
pub mod register;
pub mod update_item;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const INVALID_OR_EXPIRED_TOKEN: &str = "Invalid or expired token";
pub const INVALID_AUTHORIZATION_HEADER: &str = "Invalid authorization header format";
pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";
const INTERNAL_SERVER_ERROR: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Transport-level failure. Messages are shown to the caller verbatim,
/// except for `InternalServerError` whose detail is only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR.to_string())
            }
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidEmail(_) | UserError::InvalidPassword(_) | UserError::InvalidName(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()),
            UserError::InvalidToken(_) => ApiError::Unauthorized(INVALID_OR_EXPIRED_TOKEN.to_string()),
            UserError::Unauthorized(_) | UserError::InvalidUserId(_) => {
                ApiError::Unauthorized(AUTHENTICATION_REQUIRED.to_string())
            }
            UserError::PasswordHashing(_)
            | UserError::TokenIssuance(_)
            | UserError::DatabaseError(_)
            | UserError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<ItemError> for ApiError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::InvalidItemId(_) | ItemError::InvalidName(_) | ItemError::InvalidStatus(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            ItemError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ItemError::Unauthorized(_) | ItemError::InvalidOwner(_) => {
                ApiError::Unauthorized(AUTHENTICATION_REQUIRED.to_string())
            }
            ItemError::Forbidden(_) => ApiError::Forbidden(err.to_string()),
            ItemError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Public view of a principal. Never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            name: user.name.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}

/// Wire form of a token pair. `expires_at` is the access token's expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPairData {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<TokenPair> for TokenPairData {
    fn from(pair: TokenPair) -> Self {
        Self {
            expires_at: pair.expires_at(),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemData {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Item> for ItemData {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.as_str().to_string(),
            description: item.description.clone(),
            status: item.status.as_str().to_string(),
            owner_id: item.owner_id.to_string(),
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}
