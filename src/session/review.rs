use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::config::SessionConfig;
use super::playback::Playback;
use crate::analysis::{AnalysisFrame, BackendClient, ProcessingStatus, SessionData, UploadReceipt};
use crate::events::{self, PlayerEventReceiver, TimeJumpBus, TimeJumpReceiver};
use crate::progress::{ProgressTracker, StatusSource};
use crate::sync::Selection;

/// Backend surface a review session needs: status polling plus the one-time
/// bulk results fetch
#[async_trait::async_trait]
pub trait ReviewBackend: StatusSource {
    async fn results(&self, video_name: &str) -> Result<SessionData>;
}

#[async_trait::async_trait]
impl ReviewBackend for BackendClient {
    async fn results(&self, video_name: &str) -> Result<SessionData> {
        BackendClient::results(self, video_name).await
    }
}

/// Where a review session is in its lifecycle
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ReviewPhase {
    /// Upload accepted; the tracker is polling
    Processing,
    /// Results bulk-loaded; navigation is live
    Ready { total_frames: usize },
    /// Processing error or polling timeout; only recovery is a new upload
    Failed { message: String },
}

/// A review session: batch results replayed against continuous playback
///
/// Created after a successful upload. Polls processing status until
/// terminal, bulk-loads the result set exactly once on completion, then
/// serves nearest-frame resolution and index-cursor navigation. On failure
/// the session is discarded wholesale.
pub struct ReviewSession {
    config: SessionConfig,
    video_id: String,
    video_name: String,
    playback: Playback,
    phase: Arc<Mutex<ReviewPhase>>,
    status_rx: watch::Receiver<Option<ProcessingStatus>>,
    tracker_task: Mutex<Option<JoinHandle<()>>>,
    jump_bus: TimeJumpBus,
}

impl ReviewSession {
    /// Start tracking a freshly-uploaded video
    pub async fn start(
        backend: Arc<dyn ReviewBackend>,
        receipt: UploadReceipt,
        config: SessionConfig,
    ) -> (Arc<Self>, PlayerEventReceiver) {
        let (events_tx, events_rx) = events::player_events();

        let tracker = ProgressTracker::with_timing(
            Arc::clone(&backend) as Arc<dyn StatusSource>,
            receipt.video_id.clone(),
            config.poll_interval,
            config.poll_ceiling,
        );
        let status_rx = tracker.subscribe();

        let session = Arc::new(Self {
            playback: Playback::new(config.tolerance, events_tx),
            config,
            video_id: receipt.video_id,
            video_name: receipt.video_name,
            phase: Arc::new(Mutex::new(ReviewPhase::Processing)),
            status_rx,
            tracker_task: Mutex::new(None),
            jump_bus: TimeJumpBus::new(),
        });

        let task = tokio::spawn(Self::track(
            tracker,
            backend,
            session.video_name.clone(),
            session.playback.store(),
            Arc::clone(&session.phase),
        ));

        {
            let mut handle = session.tracker_task.lock().await;
            *handle = Some(task);
        }

        (session, events_rx)
    }

    /// Poll to terminal, then bulk-load once on completion
    async fn track(
        tracker: ProgressTracker,
        backend: Arc<dyn ReviewBackend>,
        video_name: String,
        store: Arc<Mutex<crate::store::ResultStore>>,
        phase: Arc<Mutex<ReviewPhase>>,
    ) {
        let outcome = match tracker.run().await {
            Ok(status) => match backend.results(&video_name).await {
                Ok(data) => {
                    let mut store = store.lock().await;
                    match store.bulk_load(data.frames) {
                        Ok(()) => {
                            info!(
                                "Review session ready: {} frames for {}",
                                store.len(),
                                video_name
                            );
                            ReviewPhase::Ready {
                                total_frames: status.total_frames.max(store.len()),
                            }
                        }
                        Err(e) => {
                            error!("Rejecting results for {}: {}", video_name, e);
                            ReviewPhase::Failed {
                                message: e.to_string(),
                            }
                        }
                    }
                }
                Err(e) => {
                    error!("Failed to fetch results for {}: {}", video_name, e);
                    ReviewPhase::Failed {
                        message: e.to_string(),
                    }
                }
            },
            Err(e) => {
                error!("Processing of {} failed: {}", video_name, e);
                ReviewPhase::Failed {
                    message: e.to_string(),
                }
            }
        };

        *phase.lock().await = outcome;
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn video_name(&self) -> &str {
        &self.video_name
    }

    pub async fn phase(&self) -> ReviewPhase {
        self.phase.lock().await.clone()
    }

    /// Latest processing snapshot seen by the tracker
    pub fn latest_status(&self) -> Option<ProcessingStatus> {
        self.status_rx.borrow().clone()
    }

    /// Playback clock moved; keep the index cursor in lockstep
    pub async fn handle_time_update(&self, t: f64) -> Selection {
        self.playback.handle_time_update(t).await
    }

    /// The video's rendered box changed size
    pub async fn handle_resize(
        &self,
        video_w: f64,
        video_h: f64,
        container_w: f64,
        container_h: f64,
    ) {
        self.playback
            .handle_resize(video_w, video_h, container_w, container_h)
            .await;
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Timeline click: ask the player to seek to the frame at `index`
    ///
    /// Returns the target timestamp, or `None` when the index is out of
    /// range or results are not loaded yet.
    pub async fn seek_to_frame(&self, index: usize) -> Option<f64> {
        let timestamp = {
            let store = self.playback.store();
            let store = store.lock().await;
            store.frames().get(index)?.timestamp
        };
        self.jump_bus.request_jump(timestamp);
        Some(timestamp)
    }

    pub async fn frame_at(&self, index: usize) -> Option<AnalysisFrame> {
        let store = self.playback.store();
        let store = store.lock().await;
        store.frames().get(index).cloned()
    }

    pub fn jump_bus(&self) -> TimeJumpBus {
        self.jump_bus.clone()
    }

    pub fn jump_receiver(&self) -> TimeJumpReceiver {
        self.jump_bus.subscribe()
    }

    /// Wait for the tracker to reach its terminal outcome
    pub async fn join(&self) {
        let mut handle = self.tracker_task.lock().await;
        if let Some(task) = handle.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!("Tracker task panicked: {}", e);
                }
            }
        }
    }

    /// Tear the session down, cancelling the tracker if still polling
    pub async fn stop(&self) {
        info!("Stopping review session {}", self.config.session_id);

        let mut handle = self.tracker_task.lock().await;
        if let Some(task) = handle.take() {
            task.abort();
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!("Tracker task panicked: {}", e);
                }
            }
        }
        drop(handle);

        self.playback.reset().await;
    }
}
