use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::analysis::BackendClient;
use crate::config::PlaybackConfig;
use crate::session::{ReviewSession, SessionConfig};

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Active review sessions (session_id → session)
    pub sessions: Arc<RwLock<HashMap<String, Arc<ReviewSession>>>>,

    /// Client for the vision backend
    pub backend: Arc<BackendClient>,

    /// Configured playback timings applied to every new session
    pub playback: Arc<PlaybackConfig>,
}

impl AppState {
    pub fn new(backend: Arc<BackendClient>, playback: PlaybackConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            backend,
            playback: Arc::new(playback),
        }
    }

    /// A fresh session config (new session id) with the configured timings
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            sample_period: Duration::from_millis(self.playback.sample_period_ms),
            tolerance: self.playback.tolerance_secs,
            poll_interval: Duration::from_millis(self.playback.poll_interval_ms),
            poll_ceiling: Duration::from_secs(self.playback.poll_ceiling_secs),
            ..SessionConfig::default()
        }
    }
}
