use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::config::SessionConfig;
use super::playback::Playback;
use crate::analysis::FrameAnalyzer;
use crate::events::{self, PlayerEventReceiver, TimeJumpBus, TimeJumpReceiver};
use crate::sampler::{FrameCapture, Sampler};
use crate::sync::Selection;

/// Snapshot of a live session's lifetime counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveStats {
    /// Whether the sampler is currently ticking
    pub is_sampling: bool,

    pub started_at: DateTime<Utc>,

    pub duration_secs: f64,

    /// Analysis frames accepted into the store
    pub frames_analyzed: usize,
}

/// A live playback session: the video plays while frames are periodically
/// sampled, shipped for analysis, and overlaid in sync
///
/// Owns the result store, the sampler timer, and the synchronizer cursor.
/// Nothing else writes the store.
pub struct LiveSession {
    config: SessionConfig,
    playback: Playback,
    sampler: Sampler,
    capture: Arc<dyn FrameCapture>,
    analyzer: Arc<dyn FrameAnalyzer>,
    jump_bus: TimeJumpBus,
    started_at: DateTime<Utc>,
}

impl LiveSession {
    /// Create a session and the event channel its UI listens on
    pub fn new(
        config: SessionConfig,
        capture: Arc<dyn FrameCapture>,
        analyzer: Arc<dyn FrameAnalyzer>,
    ) -> (Self, PlayerEventReceiver) {
        let (events_tx, events_rx) = events::player_events();

        let session = Self {
            playback: Playback::new(config.tolerance, events_tx.clone()),
            sampler: Sampler::new(config.sample_period),
            config,
            capture,
            analyzer,
            jump_bus: TimeJumpBus::new(),
            started_at: Utc::now(),
        };

        (session, events_rx)
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    /// Begin sampling (playback entered the "playing, analysis-enabled"
    /// state)
    pub async fn start(&self) {
        info!("Starting live session {}", self.config.session_id);
        self.sampler
            .start(
                Arc::clone(&self.capture),
                Arc::clone(&self.analyzer),
                self.playback.store(),
                self.playback.events(),
            )
            .await;
    }

    /// Pause sampling; the store and selection stay intact
    pub async fn pause(&self) {
        self.sampler.stop().await;
    }

    /// Resume sampling after a pause
    pub async fn resume(&self) {
        self.start().await;
    }

    /// Playback clock moved (the player's `timeupdate`)
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

    /// Sender handle for the results view to request seeks
    pub fn jump_bus(&self) -> TimeJumpBus {
        self.jump_bus.clone()
    }

    /// Player-side end of the seek channel
    pub fn jump_receiver(&self) -> TimeJumpReceiver {
        self.jump_bus.subscribe()
    }

    pub async fn stats(&self) -> LiveStats {
        let duration = Utc::now().signed_duration_since(self.started_at);
        let frames_analyzed = self.playback.store().lock().await.len();

        LiveStats {
            is_sampling: self.sampler.is_running(),
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            frames_analyzed,
        }
    }

    /// Tear the session down: cancel the sampler timer and blank the overlay
    pub async fn stop(&self) -> LiveStats {
        info!("Stopping live session {}", self.config.session_id);
        self.sampler.stop().await;
        self.playback.reset().await;
        self.stats().await
    }
}
