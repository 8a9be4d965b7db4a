//! HTTP API server for the surrounding UI
//!
//! This module provides a REST surface around the playback core:
//! - POST /sessions/review - Upload a video and start a review session
//! - GET /sessions/:id/status - Processing phase and latest snapshot
//! - GET /sessions/:id/frame?t= - Resolve playback time to a frame
//! - GET /sessions/:id/video - Stream the original video bytes
//! - POST /sessions/:id/seek - Results-list time jump
//! - DELETE /sessions/:id - Discard a session
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
