use std::sync::Arc;

use api_service::config::Config;
use api_service::inbound::http::router::create_router;
use api_service::inbound::http::router::AppState;
use api_service::outbound::repositories::InMemoryItemRepository;
use api_service::outbound::repositories::InMemoryUserRepository;
use api_service::outbound::repositories::PostgresItemRepository;
use api_service::outbound::repositories::PostgresUserRepository;
use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenCodec;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const MAX_DB_CONNECTIONS: u32 = 5;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "api-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        storage = if config.database.is_some() { "postgresql" } else { "memory" },
        access_token_ttl_secs = config.jwt.access_token_ttl_secs,
        refresh_token_ttl_secs = config.jwt.refresh_token_ttl_secs,
        enforce_token_kind = config.jwt.enforce_token_kind,
        "Configuration loaded"
    );

    if config.uses_development_secret() {
        tracing::warn!("jwt.secret is the development default; set JWT__SECRET outside local development");
    }

    let password_hasher = PasswordHasher::with_cost(config.hashing_cost())?;
    let token_codec =
        TokenCodec::new(config.jwt.secret.as_bytes()).with_lifetimes(config.token_lifetimes()?);
    let authenticator = Arc::new(
        Authenticator::new(password_hasher, token_codec)
            .with_token_kind_enforcement(config.jwt.enforce_token_kind),
    );

    let state = match &config.database {
        Some(database) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(MAX_DB_CONNECTIONS)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = MAX_DB_CONNECTIONS,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            AppState::new(
                Arc::new(PostgresUserRepository::new(pg_pool.clone())),
                Arc::new(PostgresItemRepository::new(pg_pool)),
                authenticator,
            )
        }
        None => {
            tracing::warn!("No database configured; using in-memory storage");
            AppState::new(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryItemRepository::new()),
                authenticator,
            )
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(state, config.request_timeout());
    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
