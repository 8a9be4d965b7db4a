use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::analysis::FrameAnalyzer;
use crate::events::{PlayerEvent, PlayerEventSender};
use crate::store::ResultStore;

/// Sampling cadence: 2 Hz
pub const SAMPLE_PERIOD: Duration = Duration::from_millis(500);

/// An encoded still image captured from the playback surface, stamped with
/// the playback time it was taken at
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub image: Vec<u8>,
    pub timestamp: f64,
}

/// Capture seam supplied by the embedding player surface
#[async_trait::async_trait]
pub trait FrameCapture: Send + Sync {
    /// Grab the currently-visible video frame as an encoded image
    async fn capture(&self) -> Result<CapturedFrame>;
}

/// Periodic live-frame capture and dispatch
///
/// Owns its timer task: started once per active playback stretch, stopped on
/// pause, teardown, or video element loss. At most one analyze request is in
/// flight at a time; ticks that fire while a request is pending are skipped,
/// never queued, so responses can never arrive out of order.
pub struct Sampler {
    period: Duration,
    running: Arc<AtomicBool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Sampler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            running: Arc::new(AtomicBool::new(false)),
            task: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start the sampling timer
    pub async fn start(
        &self,
        capture: Arc<dyn FrameCapture>,
        analyzer: Arc<dyn FrameAnalyzer>,
        store: Arc<Mutex<ResultStore>>,
        events: PlayerEventSender,
    ) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Sampler already running");
            return;
        }

        let running = Arc::clone(&self.running);
        let period = self.period;

        let task = tokio::spawn(async move {
            info!("Sampler task started ({}ms period)", period.as_millis());

            let mut ticker = tokio::time::interval(period);
            // Ticks that fire while a request is in flight are dropped
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if !running.load(Ordering::SeqCst) {
                    break;
                }

                let captured = match capture.capture().await {
                    Ok(c) => c,
                    Err(e) => {
                        warn!("Frame capture failed, skipping tick: {}", e);
                        continue;
                    }
                };

                let _ = events.send(PlayerEvent::AnalyzingChanged(true));

                // Awaited inline: this is the at-most-one-in-flight guard
                match analyzer.analyze_frame(&captured.image, captured.timestamp).await {
                    Ok(frame) => {
                        let mut store = store.lock().await;
                        match store.append(frame.clone()) {
                            Ok(()) => {
                                let _ = events.send(PlayerEvent::AnalysisUpdated(frame));
                            }
                            Err(e) => {
                                // Stale result; drop it rather than corrupt ordering
                                warn!("Dropping analysis frame: {}", e);
                            }
                        }
                    }
                    Err(e) => {
                        // Non-fatal: the next tick is the retry
                        warn!("Analysis tick failed: {}", e);
                    }
                }

                let _ = events.send(PlayerEvent::AnalyzingChanged(false));
            }

            info!("Sampler task stopped");
        });

        {
            let mut handle = self.task.lock().await;
            *handle = Some(task);
        }
    }

    /// Cancel the timer and release its handle
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        let mut handle = self.task.lock().await;
        if let Some(task) = handle.take() {
            task.abort();
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!("Sampler task panicked: {}", e);
                }
            }
        }

        info!("Sampler stopped");
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(SAMPLE_PERIOD)
    }
}
