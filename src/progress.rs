use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::analysis::{BackendClient, ProcessingState, ProcessingStatus};

/// Poll cadence against the backend status endpoint
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Hard ceiling on polling without a terminal state
pub const POLL_CEILING: Duration = Duration::from_secs(600);

/// Terminal outcome of a batch-processing session that did not complete
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Backend reported the `error` state; recovery is a fresh upload
    #[error("processing failed: {0}")]
    Processing(String),

    /// No terminal state within the ceiling; surfaced, never silently dropped
    #[error("processing did not finish within {0:?}")]
    Timeout(Duration),
}

/// Status seam polled by the tracker
///
/// Implemented by `BackendClient`; tests substitute a scripted source.
#[async_trait::async_trait]
pub trait StatusSource: Send + Sync {
    async fn status(&self, video_id: &str) -> Result<ProcessingStatus>;
}

#[async_trait::async_trait]
impl StatusSource for BackendClient {
    async fn status(&self, video_id: &str) -> Result<ProcessingStatus> {
        BackendClient::status(self, video_id).await
    }
}

/// Polling state machine for one batch upload-then-process session
///
/// `run` drives `uploaded -> extracting -> analyzing -> complete` (or
/// `error` from any non-terminal state) by overwriting a full status
/// snapshot on every poll. It resolves exactly once; polling stops the
/// moment a terminal state is observed or the ceiling elapses.
pub struct ProgressTracker {
    source: Arc<dyn StatusSource>,
    video_id: String,
    interval: Duration,
    ceiling: Duration,
    snapshot: watch::Sender<Option<ProcessingStatus>>,
}

impl ProgressTracker {
    pub fn new(source: Arc<dyn StatusSource>, video_id: impl Into<String>) -> Self {
        Self::with_timing(source, video_id, POLL_INTERVAL, POLL_CEILING)
    }

    pub fn with_timing(
        source: Arc<dyn StatusSource>,
        video_id: impl Into<String>,
        interval: Duration,
        ceiling: Duration,
    ) -> Self {
        let (snapshot, _) = watch::channel(None);
        Self {
            source,
            video_id: video_id.into(),
            interval,
            ceiling,
            snapshot,
        }
    }

    /// Watch the per-poll snapshots (progress, counts, elapsed time)
    pub fn subscribe(&self) -> watch::Receiver<Option<ProcessingStatus>> {
        self.snapshot.subscribe()
    }

    /// Poll until a terminal state or the ceiling
    pub async fn run(self) -> Result<ProcessingStatus, TrackerError> {
        info!("Tracking processing of video {}", self.video_id);

        let started = tokio::time::Instant::now();
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            if started.elapsed() >= self.ceiling {
                warn!(
                    "Processing of {} still not terminal after {:?}",
                    self.video_id, self.ceiling
                );
                return Err(TrackerError::Timeout(self.ceiling));
            }

            let status = match self.source.status(&self.video_id).await {
                Ok(s) => s,
                Err(e) => {
                    // Transient poll failure; the next poll retries
                    warn!("Status poll failed: {}", e);
                    continue;
                }
            };

            let state = status.state;
            let _ = self.snapshot.send(Some(status.clone()));

            match state {
                ProcessingState::Complete => {
                    info!(
                        "Processing complete for {} ({} frames)",
                        self.video_id, status.total_frames
                    );
                    return Ok(status);
                }
                ProcessingState::Error => {
                    let message = status
                        .error_message
                        .unwrap_or_else(|| status.current_step.clone());
                    return Err(TrackerError::Processing(message));
                }
                _ => {}
            }
        }
    }
}
