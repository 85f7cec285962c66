use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::client::Endpoint;

pub mod handlers;
pub mod models;
pub mod page;

/// Shared by every request: one pooled HTTP client and the backend endpoint.
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub endpoint: Endpoint,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // server-rendered search page
        .route("/", get(handlers::page_handler))
        // panel fragment for embedding
        .route("/api/panel", get(handlers::panel_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
