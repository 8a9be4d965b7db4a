use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::progress::{POLL_CEILING, POLL_INTERVAL};
use crate::sampler::SAMPLE_PERIOD;
use crate::sync::DEFAULT_TOLERANCE;

/// Configuration for a playback session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier
    pub session_id: String,

    /// Live sampling cadence (default 500 ms, 2 Hz)
    pub sample_period: Duration,

    /// Tolerance window for matching playback time to an analysis frame,
    /// in seconds. Half the sampling period keeps every sampled instant
    /// covered by exactly one frame.
    pub tolerance: f64,

    /// Batch status poll cadence (default 1 s)
    pub poll_interval: Duration,

    /// Ceiling on batch polling without a terminal state (default 10 min)
    pub poll_ceiling: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            sample_period: SAMPLE_PERIOD,
            tolerance: DEFAULT_TOLERANCE,
            poll_interval: POLL_INTERVAL,
            poll_ceiling: POLL_CEILING,
        }
    }
}
