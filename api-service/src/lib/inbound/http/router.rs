use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_item::create_item;
use super::handlers::current_user::current_user;
use super::handlers::delete_item::delete_item;
use super::handlers::get_item::get_item;
use super::handlers::list_items::list_items;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::refresh_token::refresh_token;
use super::handlers::register::register;
use super::handlers::update_item::update_item;
use super::middleware::authenticate as auth_middleware;
use crate::item::ports::ItemRepository;
use crate::item::ports::ItemServicePort;
use crate::item::service::ItemService;
use crate::user::ports::CredentialServicePort;
use crate::user::ports::UserRepository;
use crate::user::service::CredentialService;

/// Shared handler state.
///
/// Services sit behind their ports so the same router serves the
/// PostgreSQL and the in-memory wiring.
#[derive(Clone)]
pub struct AppState {
    pub credential_service: Arc<dyn CredentialServicePort>,
    pub item_service: Arc<dyn ItemServicePort>,
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    /// Wire both services over the given repositories.
    pub fn new<UR, IR>(
        user_repository: Arc<UR>,
        item_repository: Arc<IR>,
        authenticator: Arc<Authenticator>,
    ) -> Self
    where
        UR: UserRepository,
        IR: ItemRepository,
    {
        Self {
            credential_service: Arc::new(CredentialService::new(
                user_repository,
                Arc::clone(&authenticator),
            )),
            item_service: Arc::new(ItemService::new(item_repository)),
            authenticator,
        }
    }
}

pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    // Identity operations sit outside the gate: a stale bearer header must
    // not block refresh or logout.
    let identity_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh_token))
        .route("/api/auth/logout", post(logout));

    let gated_routes = Router::new()
        .route("/api/auth/me", get(current_user))
        .route("/api/items", get(list_items).post(create_item))
        .route(
            "/api/items/:item_id",
            get(get_item).patch(update_item).delete(delete_item),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(identity_routes)
        .merge(gated_routes)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(trace_layer)
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}
