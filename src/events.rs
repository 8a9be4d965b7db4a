use tokio::sync::{mpsc, watch};

use crate::analysis::AnalysisFrame;

/// Notifications from the playback core to the surrounding UI
///
/// Delivered over a single-receiver channel: each event kind has exactly one
/// consumer on the UI side.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// A different analysis frame became current
    FrameChanged(usize),
    /// The current playback time no longer matches any frame
    SelectionCleared,
    /// A live analysis result was accepted into the store
    AnalysisUpdated(AnalysisFrame),
    /// An analyze request went in flight / completed
    AnalyzingChanged(bool),
}

pub type PlayerEventSender = mpsc::UnboundedSender<PlayerEvent>;
pub type PlayerEventReceiver = mpsc::UnboundedReceiver<PlayerEvent>;

pub fn player_events() -> (PlayerEventSender, PlayerEventReceiver) {
    mpsc::unbounded_channel()
}

/// Best-effort seek channel from a results view back to the player
///
/// Last write wins: rapid repeated jumps overwrite each other and delivery
/// needs no acknowledgment.
#[derive(Debug, Clone)]
pub struct TimeJumpBus {
    tx: watch::Sender<Option<f64>>,
}

impl TimeJumpBus {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Ask the player to seek to `timestamp` (seconds)
    pub fn request_jump(&self, timestamp: f64) {
        // No receiver is fine; the jump is simply dropped
        let _ = self.tx.send(Some(timestamp));
    }

    pub fn subscribe(&self) -> TimeJumpReceiver {
        TimeJumpReceiver {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for TimeJumpBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Player-side end of the seek channel
#[derive(Debug)]
pub struct TimeJumpReceiver {
    rx: watch::Receiver<Option<f64>>,
}

impl TimeJumpReceiver {
    /// Wait for the next jump request. Returns `None` once the bus is gone.
    /// Intermediate values overwritten before this call are never seen.
    pub async fn next_jump(&mut self) -> Option<f64> {
        loop {
            if self.rx.changed().await.is_err() {
                return None;
            }
            if let Some(t) = *self.rx.borrow_and_update() {
                return Some(t);
            }
        }
    }

    /// Latest unseen jump request, if any, without waiting
    pub fn latest(&mut self) -> Option<f64> {
        if self.rx.has_changed().unwrap_or(false) {
            *self.rx.borrow_and_update()
        } else {
            None
        }
    }
}
