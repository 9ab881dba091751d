use std::sync::Arc;
use std::time::Duration;

use api_service::inbound::http::router::create_router;
use api_service::inbound::http::router::AppState;
use api_service::outbound::repositories::InMemoryItemRepository;
use api_service::outbound::repositories::InMemoryUserRepository;
use auth::Authenticator;
use auth::HashingCost;
use auth::ManualClock;
use auth::PasswordHasher;
use auth::TokenCodec;
use chrono::DateTime;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;

pub const TEST_PASSWORD: &str = "longenough1";

const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over in-memory storage
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    /// Drives token issuance and validation; advance it to age tokens.
    pub clock: Arc<ManualClock>,
}

/// Principal registered through the API, with its first token pair.
pub struct RegisteredUser {
    pub id: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiry as reported on the wire.
    pub expires_at: DateTime<Utc>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with(false).await
    }

    /// Spawn with `enforce_token_kind` switched on.
    pub async fn spawn_enforcing_token_kind() -> Self {
        Self::spawn_with(true).await
    }

    async fn spawn_with(enforce_token_kind: bool) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let clock = Arc::new(ManualClock::starting_now());

        // Minimum Argon2 cost keeps the suite fast.
        let password_hasher = PasswordHasher::with_cost(HashingCost {
            memory_kib: HashingCost::MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build password hasher");
        let token_codec = TokenCodec::new(TEST_JWT_SECRET).with_clock(clock.clone());
        let authenticator = Arc::new(
            Authenticator::new(password_hasher, token_codec)
                .with_token_kind_enforcement(enforce_token_kind),
        );

        let state = AppState::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryItemRepository::new()),
            authenticator,
        );
        let router = create_router(state, Duration::from_secs(30));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            clock,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register `email` with [`TEST_PASSWORD`], asserting success.
    pub async fn register(&self, email: &str) -> RegisteredUser {
        let response = self
            .post("/api/auth/register")
            .json(&json!({
                "email": email,
                "password": TEST_PASSWORD,
                "name": "Test User"
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        RegisteredUser {
            id: body["data"]["user"]["id"].as_str().unwrap().to_string(),
            email: email.to_string(),
            access_token: body["data"]["token_pair"]["access_token"]
                .as_str()
                .unwrap()
                .to_string(),
            refresh_token: body["data"]["token_pair"]["refresh_token"]
                .as_str()
                .unwrap()
                .to_string(),
            expires_at: body["data"]["token_pair"]["expires_at"]
                .as_str()
                .unwrap()
                .parse()
                .unwrap(),
        }
    }

    /// Create an item as `token`, asserting success; returns the item id.
    pub async fn create_item(&self, token: &str, name: &str) -> String {
        let response = self
            .post_authenticated("/api/items", token)
            .json(&json!({ "name": name, "description": "test item" }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_str().unwrap().to_string()
    }
}
