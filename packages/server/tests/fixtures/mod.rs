//! Test server fixture: boots the real router on an ephemeral port.

use std::sync::Arc;

use atelier_server::ui::{ServerConfig, build_router, build_state, state::AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    port: u16,
    pub state: Arc<AppState>,
}

impl TestServer {
    /// Bind an ephemeral port, then serve the real router on it.
    pub async fn start() -> Self {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            secret: TEST_SECRET.to_string(),
            // no endpoint configured: the echo collaborator answers
            ai_endpoint: None,
        };
        let state = build_state(&config);
        let router = build_router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let port = listener.local_addr().expect("listener has no addr").port();

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("test server failed");
        });

        Self { port, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self, query: &str) -> String {
        format!("ws://127.0.0.1:{}/ws?{query}", self.port)
    }
}

/// Register a user and return their token.
pub async fn register(server: &TestServer, email: &str, password: &str) -> String {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/users/register", server.base_url()))
        .json(&serde_json::json!({"email": email, "password": password}))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(response.status(), 201, "registration should succeed");
    let body: serde_json::Value = response.json().await.expect("register body not JSON");
    body["user"]["token"]
        .as_str()
        .expect("register response carries a token")
        .to_string()
}

/// Create a project as the given token's user and return its id.
pub async fn create_project(server: &TestServer, token: &str, name: &str) -> String {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/projects/create", server.base_url()))
        .bearer_auth(token)
        .json(&serde_json::json!({"name": name}))
        .send()
        .await
        .expect("create project request failed");
    assert_eq!(response.status(), 201, "project creation should succeed");
    let body: serde_json::Value = response.json().await.expect("project body not JSON");
    body["id"]
        .as_str()
        .expect("project response carries an id")
        .to_string()
}
