//! HTTP Layer
//!
//! Server-rendered pages for managing conversations, built on Axum.
//!
//! # Architecture
//!
//! - **Handlers**: one module per resource, talking to a [`ConversationPort`]
//! - **Views**: HTML rendering with escaping of user text
//! - **Middleware**: JWT authentication and request logging
//! - **Error Handling**: [`error::ApiError`] renders as an HTML error page
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, config::ApiConfig};
//!
//! let port = Arc::new(PostgresConversationAdapter::new(pool));
//! let app = create_router(port, ApiConfig::from_env()?);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod views;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use domain_conversation::ConversationPort;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{conversations, health, home, sentences};
use crate::middleware::{auth_middleware, request_log_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub port: Arc<dyn ConversationPort>,
    pub config: ApiConfig,
}

/// Creates the application router
///
/// # Arguments
///
/// * `port` - Conversation store
/// * `config` - Server configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(port: Arc<dyn ConversationPort>, config: ApiConfig) -> Router {
    let state = AppState { port, config };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let conversation_routes = Router::new()
        .route("/conversations", get(conversations::list_conversations))
        .route(
            "/conversations/new",
            get(conversations::new_conversation).post(conversations::create_conversation),
        )
        .route("/conversations/:id", get(conversations::show_conversation))
        .route("/conversations/:id/sentences", post(sentences::add_sentence))
        .route("/conversations/:id/delete", post(conversations::delete_conversation))
        .route_layer(axum_middleware::from_fn(request_log_middleware))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(conversation_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}
