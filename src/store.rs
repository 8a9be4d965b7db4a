use thiserror::Error;
use tracing::info;

use crate::analysis::AnalysisFrame;
use crate::sync;

/// Slack allowed on append before a frame counts as out of order. Live
/// timestamps come from one monotone playback clock, so this only absorbs
/// float rounding.
pub const ORDER_EPSILON: f64 = 0.001;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("out-of-order frame: timestamp {incoming:.3}s behind latest {latest:.3}s")]
    OutOfOrder { incoming: f64, latest: f64 },

    #[error("bulk load not sorted by timestamp at index {0}")]
    UnsortedBatch(usize),

    #[error("bulk load frame ids not strictly increasing at index {0}")]
    NonMonotonicFrameId(usize),
}

/// Ordered, append-only log of analysis frames
///
/// Frames are immutable once written. Ordering is enforced at the append
/// boundary: a caller holding a stale result drops it here instead of
/// corrupting the log.
#[derive(Debug, Default)]
pub struct ResultStore {
    frames: Vec<AnalysisFrame>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one frame, rejecting timestamps behind the latest entry
    pub fn append(&mut self, frame: AnalysisFrame) -> Result<(), StoreError> {
        if let Some(last) = self.frames.last() {
            if frame.timestamp < last.timestamp - ORDER_EPSILON {
                return Err(StoreError::OutOfOrder {
                    incoming: frame.timestamp,
                    latest: last.timestamp,
                });
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Atomically replace the contents with a pre-sorted batch
    ///
    /// The whole batch is validated before anything is replaced; a bad batch
    /// leaves the store untouched.
    pub fn bulk_load(&mut self, frames: Vec<AnalysisFrame>) -> Result<(), StoreError> {
        for (i, pair) in frames.windows(2).enumerate() {
            if pair[1].timestamp < pair[0].timestamp {
                return Err(StoreError::UnsortedBatch(i + 1));
            }
            if let (Some(a), Some(b)) = (pair[0].frame_id, pair[1].frame_id) {
                if b <= a {
                    return Err(StoreError::NonMonotonicFrameId(i + 1));
                }
            }
        }

        info!("Bulk-loaded {} analysis frames", frames.len());
        self.frames = frames;
        Ok(())
    }

    pub fn latest(&self) -> Option<&AnalysisFrame> {
        self.frames.last()
    }

    /// All frames in timestamp order
    pub fn frames(&self) -> &[AnalysisFrame] {
        &self.frames
    }

    /// Entry minimizing |timestamp - t|, if its delta is within tolerance
    pub fn nearest_to(&self, t: f64, tolerance: f64) -> Option<(usize, &AnalysisFrame)> {
        sync::nearest_to(&self.frames, t, tolerance)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
