#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;
use auth_service::domain::user::models::User;
use auth_service::domain::user::models::UserId;
use auth_service::domain::user::notifications::VerificationRequested;
use auth_service::inbound::http::cors_layer;
use auth_service::inbound::http::create_router;
use auth_service::inbound::http::AppState;
use auth_service::user::errors::NotificationError;
use auth_service::user::errors::UserError;
use auth_service::user::ports::NotificationSender;
use auth_service::user::ports::UserRepository;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Store double keeping users in memory, with the same uniqueness rule as Postgres.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        let stored = users
            .get_mut(&user.id)
            .ok_or(UserError::NotFound(user.id.to_string()))?;
        stored.name = user.name.clone();
        stored.surname = user.surname.clone();
        stored.is_active = user.is_active;
        Ok(stored.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

/// Notification double recording what would have been sent.
#[derive(Default)]
pub struct RecordingNotificationSender {
    sent: Mutex<Vec<VerificationRequested>>,
}

impl RecordingNotificationSender {
    pub fn sent(&self) -> Vec<VerificationRequested> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingNotificationSender {
    async fn send_verification(
        &self,
        notification: &VerificationRequested,
    ) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub notifications: Arc<RecordingNotificationSender>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(
            Authenticator::new(TEST_SECRET, "HS256").expect("Failed to create authenticator"),
        );
        let repository = Arc::new(InMemoryUserRepository::default());
        let notifications = Arc::new(RecordingNotificationSender::default());

        let state = AppState::new(
            repository,
            Arc::clone(&notifications),
            Arc::clone(&authenticator),
            chrono::Duration::hours(8),
            chrono::Duration::hours(24),
        );
        let cors = cors_layer(&[ALLOWED_ORIGIN.to_string()]).expect("Invalid CORS origin");
        let router = create_router(state, cors);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
            authenticator,
            notifications,
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

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user and return the created user's id.
    pub async fn register(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/users")
            .json(&json!({
                "email": email,
                "name": "Alice",
                "surname": "Liddell",
                "password": password,
                "date_of_birth": "1990-05-17"
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"]
            .as_str()
            .expect("Missing user id")
            .to_string()
    }

    /// Submit the login form.
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/users/login")
            .form(&[("username", email), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the bearer token.
    pub async fn access_token(&self, email: &str, password: &str) -> String {
        let response = self.login(email, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["access_token"]
            .as_str()
            .expect("Missing access token")
            .to_string()
    }

    /// Wait for the detached verification task to hand over its notification.
    pub async fn verification_for(&self, email: &str) -> VerificationRequested {
        for _ in 0..50 {
            if let Some(notification) = self
                .notifications
                .sent()
                .into_iter()
                .find(|n| n.email == email)
            {
                return notification;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("No verification notification for {email}");
    }
}
