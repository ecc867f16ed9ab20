//! Router construction and server startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::{
    infrastructure::{
        ai::{AiCollaborator, EchoCollaborator, HttpAiCollaborator},
        auth::{InMemoryRevocationStore, TokenService},
        registry::RoomRegistry,
        repository::{InMemoryProjectRepository, InMemoryUserRepository},
    },
    ui::{
        handler::{http, websocket},
        state::AppState,
    },
};

/// Server startup configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Token signing secret
    pub secret: String,
    /// AI completion endpoint; the offline echo collaborator is used when
    /// absent
    pub ai_endpoint: Option<String>,
}

/// Assemble application state from configuration.
pub fn build_state(config: &ServerConfig) -> Arc<AppState> {
    let ai: Arc<dyn AiCollaborator> = match &config.ai_endpoint {
        Some(endpoint) => Arc::new(HttpAiCollaborator::new(endpoint.clone())),
        None => Arc::new(EchoCollaborator),
    };
    Arc::new(AppState {
        users: Arc::new(InMemoryUserRepository::new()),
        projects: Arc::new(InMemoryProjectRepository::new()),
        revocations: Arc::new(InMemoryRevocationStore::new()),
        registry: Arc::new(RoomRegistry::new()),
        tokens: Arc::new(TokenService::new(config.secret.clone())),
        ai,
    })
}

/// Build the router over the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(http::health_check))
        .route("/users/register", post(http::register))
        .route("/users/login", post(http::login))
        .route("/users/logout", get(http::logout))
        .route("/users/profile", get(http::profile))
        .route("/users/all", get(http::all_users))
        .route("/projects/create", post(http::create_project))
        .route("/projects/all", get(http::all_projects))
        .route("/projects/add-user", put(http::add_user))
        .route("/projects/all-project/{projectId}", get(http::get_project))
        .route("/projects/update-file-tree", put(http::update_file_tree))
        .route("/ws", get(websocket::websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let state = build_state(&config);
    let router = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(super::signal::shutdown_signal())
        .await
}
