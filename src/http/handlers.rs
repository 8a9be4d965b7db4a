use super::state::AppState;
use crate::analysis::{AnalysisFrame, ProcessingStatus};
use crate::session::{ReviewPhase, ReviewSession};
use crate::sync::Selection;
use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub video_id: String,
    pub video_name: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub phase: ReviewPhase,
    /// Latest backend snapshot, while processing
    pub processing: Option<ProcessingStatus>,
}

#[derive(Debug, Deserialize)]
pub struct FrameQuery {
    /// Current playback time in seconds
    pub t: f64,
}

#[derive(Debug, Serialize)]
pub struct FrameResponse {
    /// Index of the matched frame, if playback time resolved to one
    pub index: Option<usize>,
    pub frame: Option<AnalysisFrame>,
    /// Whether this query changed the selection
    pub changed: bool,
}

#[derive(Debug, Deserialize)]
pub struct SeekRequest {
    /// Frame index from the results list
    pub index: Option<usize>,
    /// Or an explicit timestamp in seconds
    pub timestamp: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SeekResponse {
    pub timestamp: f64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn not_found(session_id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Session {} not found", session_id),
        }),
    )
        .into_response()
}

async fn lookup(state: &AppState, session_id: &str) -> Option<Arc<ReviewSession>> {
    let sessions = state.sessions.read().await;
    sessions.get(session_id).cloned()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /sessions/review
/// Upload a video and start a tracked review session
pub async fn create_review_session(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    // Pull the uploaded file out of the form
    let (filename, data) = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                let filename = field
                    .file_name()
                    .unwrap_or("upload.mp4")
                    .to_string();
                match field.bytes().await {
                    Ok(bytes) => break (filename, bytes.to_vec()),
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse {
                                error: format!("Failed to read upload: {}", e),
                            }),
                        )
                            .into_response();
                    }
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "Missing 'file' field".to_string(),
                    }),
                )
                    .into_response();
            }
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Malformed multipart body: {}", e),
                    }),
                )
                    .into_response();
            }
        }
    };

    // Upload failure is surfaced immediately; no partial state is retained
    let receipt = match state.backend.upload(&filename, data).await {
        Ok(r) => r,
        Err(e) => {
            error!("Upload failed: {}", e);
            return (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: format!("Upload failed: {}", e),
                }),
            )
                .into_response();
        }
    };

    let (session, _events) = ReviewSession::start(
        Arc::clone(&state.backend) as Arc<dyn crate::session::ReviewBackend>,
        receipt,
        state.session_config(),
    )
    .await;

    let session_id = session.session_id().to_string();
    let response = CreateSessionResponse {
        session_id: session_id.clone(),
        video_id: session.video_id().to_string(),
        video_name: session.video_name().to_string(),
        status: "processing".to_string(),
    };

    {
        let mut sessions = state.sessions.write().await;
        sessions.insert(session_id.clone(), session);
    }

    info!("Review session started: {}", session_id);

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /sessions/:session_id/status
pub async fn get_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let Some(session) = lookup(&state, &session_id).await else {
        return not_found(&session_id);
    };

    let phase = session.phase().await;
    let processing = match phase {
        ReviewPhase::Processing => session.latest_status(),
        _ => None,
    };

    (
        StatusCode::OK,
        Json(SessionStatusResponse {
            session_id,
            phase,
            processing,
        }),
    )
        .into_response()
}

/// GET /sessions/:session_id/frame?t=12.3
/// Resolve a playback time to its analysis frame
pub async fn get_frame(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<FrameQuery>,
) -> impl IntoResponse {
    let Some(session) = lookup(&state, &session_id).await else {
        return not_found(&session_id);
    };

    let selection = session.handle_time_update(query.t).await;
    let index = session.playback().current_index().await;
    let frame = session.playback().current_frame().await;

    (
        StatusCode::OK,
        Json(FrameResponse {
            index,
            frame,
            changed: !matches!(selection, Selection::Unchanged),
        }),
    )
        .into_response()
}

/// POST /sessions/:session_id/seek
/// Results-list navigation: push a seek request onto the time-jump bus
pub async fn seek(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SeekRequest>,
) -> impl IntoResponse {
    let Some(session) = lookup(&state, &session_id).await else {
        return not_found(&session_id);
    };

    let timestamp = match (request.index, request.timestamp) {
        (Some(index), _) => match session.seek_to_frame(index).await {
            Some(t) => t,
            None => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(ErrorResponse {
                        error: format!("No frame at index {}", index),
                    }),
                )
                    .into_response();
            }
        },
        (None, Some(t)) => {
            session.jump_bus().request_jump(t);
            t
        }
        (None, None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Provide 'index' or 'timestamp'".to_string(),
                }),
            )
                .into_response();
        }
    };

    (StatusCode::OK, Json(SeekResponse { timestamp })).into_response()
}

/// GET /sessions/:session_id/video
/// Stream the original video bytes through to the player element
pub async fn get_video(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let Some(session) = lookup(&state, &session_id).await else {
        return not_found(&session_id);
    };

    match state.backend.video_stream(session.video_name()).await {
        Ok(stream) => Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "video/mp4")
            .header("Accept-Ranges", "bytes")
            .body(Body::from_stream(stream))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        Err(e) => {
            error!("Video stream failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: format!("Video unavailable: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// DELETE /sessions/:session_id
/// Tear the session down, discarding all in-progress state
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let session = {
        let mut sessions = state.sessions.write().await;
        sessions.remove(&session_id)
    };

    match session {
        Some(session) => {
            session.stop().await;
            info!("Review session discarded: {}", session_id);
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found(&session_id),
    }
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
