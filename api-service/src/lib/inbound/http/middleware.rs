use auth::IdentityContext;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::INVALID_AUTHORIZATION_HEADER;
use crate::inbound::http::handlers::INVALID_OR_EXPIRED_TOKEN;
use crate::inbound::http::router::AppState;

const BEARER_SCHEME: &str = "Bearer";

/// Authentication gate for every route except the identity operations.
///
/// Inserts exactly one [`IdentityContext`] into the request extensions:
/// anonymous when no credential is presented, authenticated when the bearer
/// token validates. A malformed header or a rejected token ends the request
/// with 401 before any handler runs.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = match bearer_token(req.headers())? {
        None => IdentityContext::anonymous(),
        Some(token) => state.authenticator.identify(token).map_err(|e| {
            tracing::warn!(reason = e.category(), "Bearer token rejected");
            ApiError::Unauthorized(INVALID_OR_EXPIRED_TOKEN.to_string())
        })?,
    };

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// A missing or empty header yields `None`.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| ApiError::Unauthorized(INVALID_AUTHORIZATION_HEADER.to_string()))?;

    if value.is_empty() {
        return Ok(None);
    }

    match value.split(' ').collect::<Vec<_>>().as_slice() {
        [scheme, token] if *scheme == BEARER_SCHEME => Ok(Some(*token)),
        _ => Err(ApiError::Unauthorized(INVALID_AUTHORIZATION_HEADER.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        assert_eq!(bearer_token(&HeaderMap::new()), Ok(None));
        assert_eq!(bearer_token(&headers("")), Ok(None));
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Ok(Some("abc.def.ghi")));
    }

    #[test]
    fn test_malformed_headers_rejected() {
        for value in ["Basic abc", "Bearer", "bearer abc", "Bearer a b", "Bearer  abc", "abc"] {
            assert_eq!(
                bearer_token(&headers(value)),
                Err(ApiError::Unauthorized(INVALID_AUTHORIZATION_HEADER.to_string())),
                "{value}"
            );
        }
    }
}
