//! HTTP API module
//!
//! The local control surface a UI uses to send actions and follow events.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/interval", post(set_interval_handler))
        .route("/notify", post(notify_handler))
        .route("/pause", post(pause_handler))
        .route("/resume", post(resume_handler))
        .route("/updates/check", post(check_updates_handler))
        .route("/updates/download", post(download_update_handler))
        .route("/updates/install", post(install_update_handler))
        .route("/status", get(status_handler))
        .route("/events", get(events_handler))
        .route("/tray", get(tray_handler))
        .route("/tray/:item", post(tray_item_handler))
        .route("/window/all-closed", post(windows_closed_handler))
        .route("/quit", post(quit_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
