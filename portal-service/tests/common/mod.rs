use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use portal_service::domain::user::models::EmailAddress;
use portal_service::domain::user::models::Password;
use portal_service::domain::user::models::PasswordPolicy;
use portal_service::domain::user::ports::UserServicePort;
use portal_service::domain::user::service::AuthService;
use portal_service::domain::user::service::UserService;
use portal_service::inbound::http::router::create_router;
use portal_service::inbound::http::session::SessionSettings;
use portal_service::outbound::repositories::InMemoryUserRepository;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_EMAIL: &str = "admin@x.edu";
pub const ADMIN_PASSWORD: &str = "adminPass123";

/// Test application that spawns a real server backed by the in-memory store
pub struct TestApp {
    pub address: String,
    /// Client that keeps cookies between requests, like a browser.
    pub api_client: reqwest::Client,
    /// Client without a cookie store, for bearer and manual-cookie requests.
    pub plain_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(
            Authenticator::new(JWT_SECRET)
                .with_password_hasher(PasswordHasher::with_cost(8 * 1024, 1, 1).unwrap()),
        );
        let repository = Arc::new(InMemoryUserRepository::new());
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
        ));
        let user_service = Arc::new(UserService::new(repository, Arc::clone(&authenticator)));

        let policy = PasswordPolicy::default();
        user_service
            .ensure_admin(
                EmailAddress::new(ADMIN_EMAIL.to_string()).unwrap(),
                Password::new(ADMIN_PASSWORD.to_string(), &policy).unwrap(),
            )
            .await
            .expect("Failed to seed administrator");

        let session = SessionSettings {
            secure: false,
        };

        let router = create_router(auth_service, user_service, session, policy);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
            plain_client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Helper to make GET request with the cookie client
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    /// Helper to make POST request with the cookie client
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.plain_client.get(self.url(path)).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.plain_client.post(self.url(path)).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.plain_client.patch(self.url(path)).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.plain_client.delete(self.url(path)).bearer_auth(token)
    }

    /// Register an account and return the created user JSON.
    pub async fn register(&self, email: &str, password: &str) -> Value {
        let response = self
            .plain_client
            .post(self.url("/auth/register"))
            .json(&json!({
                "email": email,
                "password": password,
                "passwordConfirm": password,
                "firstName": "Alice",
                "lastName": "Liddell"
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["user"].clone()
    }

    /// Log in without storing the cookie and return the bearer token.
    pub async fn login_token(&self, email: &str, password: &str) -> String {
        let response = self
            .plain_client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["token"]
            .as_str()
            .expect("Login response carries a token")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login_token(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Register an account, verify it as the administrator and return its id.
    pub async fn register_verified(&self, email: &str, password: &str) -> i64 {
        let user = self.register(email, password).await;
        let id = user["id"].as_i64().expect("User id is numeric");

        let response = self
            .patch_authenticated(&format!("/admin/users/{}/verify", id), &self.admin_token().await)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::OK);

        id
    }
}
