use super::handlers;
use super::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session lifecycle
        .route("/sessions/review", post(handlers::create_review_session))
        .route("/sessions/:session_id", delete(handlers::delete_session))
        // Playback queries
        .route(
            "/sessions/:session_id/status",
            get(handlers::get_session_status),
        )
        .route("/sessions/:session_id/frame", get(handlers::get_frame))
        .route("/sessions/:session_id/video", get(handlers::get_video))
        // Results-list navigation
        .route("/sessions/:session_id/seek", post(handlers::seek))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
