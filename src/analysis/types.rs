use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejection reasons for malformed detection payloads
///
/// Raised at the deserialization boundary so that NaNs and inverted boxes
/// never reach the geometry transform.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed bounding box [{0}, {1}, {2}, {3}]")]
    MalformedBBox(f64, f64, f64, f64),

    #[error("confidence {0} outside [0, 1]")]
    ConfidenceOutOfRange(f64),

    #[error("negative or non-finite timestamp {0}")]
    BadTimestamp(f64),
}

/// Axis-aligned bounding box in source-video pixel space
///
/// Wire format is `[x1, y1, x2, y2]` with x1 < x2 and y1 < y2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, PayloadError> {
        let finite = [x1, y1, x2, y2].iter().all(|v| v.is_finite() && *v >= 0.0);
        if !finite || x1 >= x2 || y1 >= y2 {
            return Err(PayloadError::MalformedBBox(x1, y1, x2, y2));
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

impl TryFrom<[f64; 4]> for BoundingBox {
    type Error = PayloadError;

    fn try_from(v: [f64; 4]) -> Result<Self, Self::Error> {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

/// A single detection returned by the vision backend
///
/// Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDetectedObject")]
pub struct DetectedObject {
    /// COCO class name (e.g. "person", "car")
    pub class: String,

    /// Detection confidence (0.0 to 1.0)
    pub confidence: f64,

    /// Box corners in source-video pixels
    pub bbox: BoundingBox,
}

#[derive(Debug, Deserialize)]
struct RawDetectedObject {
    class: String,
    confidence: f64,
    bbox: BoundingBox,
}

impl TryFrom<RawDetectedObject> for DetectedObject {
    type Error = PayloadError;

    fn try_from(raw: RawDetectedObject) -> Result<Self, Self::Error> {
        if !raw.confidence.is_finite() || !(0.0..=1.0).contains(&raw.confidence) {
            return Err(PayloadError::ConfidenceOutOfRange(raw.confidence));
        }
        Ok(Self {
            class: raw.class,
            confidence: raw.confidence,
            bbox: raw.bbox,
        })
    }
}

/// One analyzed frame: scene text plus the detections for a single timestamp
///
/// Created from a backend response, owned by the `ResultStore`, and never
/// mutated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAnalysisFrame")]
pub struct AnalysisFrame {
    /// Backend-assigned frame index (batch results only; live frames are
    /// identified by arrival order)
    pub frame_id: Option<u64>,

    /// Video playback time in seconds
    pub timestamp: f64,

    /// Human-readable scene description
    pub text_analysis: String,

    /// Detections, in backend order
    pub detected_objects: Vec<DetectedObject>,

    /// Aggregate detection count reported by the backend
    pub total_objects: usize,
}

#[derive(Debug, Deserialize)]
struct RawAnalysisFrame {
    #[serde(default)]
    frame_id: Option<u64>,
    timestamp: f64,
    /// Live responses use `scene_description`, batch results `text_analysis`
    #[serde(alias = "scene_description", default)]
    text_analysis: String,
    #[serde(default)]
    detected_objects: Vec<DetectedObject>,
    #[serde(default)]
    total_objects: Option<usize>,
}

impl TryFrom<RawAnalysisFrame> for AnalysisFrame {
    type Error = PayloadError;

    fn try_from(raw: RawAnalysisFrame) -> Result<Self, Self::Error> {
        if !raw.timestamp.is_finite() || raw.timestamp < 0.0 {
            return Err(PayloadError::BadTimestamp(raw.timestamp));
        }
        let total = raw.total_objects.unwrap_or(raw.detected_objects.len());
        Ok(Self {
            frame_id: raw.frame_id,
            timestamp: raw.timestamp,
            text_analysis: raw.text_analysis,
            detected_objects: raw.detected_objects,
            total_objects: total,
        })
    }
}

impl AnalysisFrame {
    /// Playback position as "MM:SS" for display
    pub fn time_formatted(&self) -> String {
        let total = self.timestamp as u64;
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}

/// Complete pre-computed result set for one processed video
///
/// Fetched once when batch processing completes; read-only for the lifetime
/// of the review session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(alias = "video_name")]
    pub video_id: String,

    pub total_frames: usize,

    #[serde(alias = "results")]
    pub frames: Vec<AnalysisFrame>,
}

/// Lifecycle of a batch-processing job on the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingState {
    Uploaded,
    Extracting,
    Analyzing,
    Complete,
    Error,
}

impl ProcessingState {
    /// Terminal states stop the poll loop; no further transitions occur
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }
}

/// Full processing snapshot, overwritten on every status poll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingStatus {
    pub video_id: String,

    pub filename: String,

    #[serde(rename = "status")]
    pub state: ProcessingState,

    /// Overall progress, 0 to 100
    pub progress: f64,

    /// Human-readable description of the current step
    pub current_step: String,

    pub total_frames: usize,

    pub processed_frames: usize,

    /// Elapsed wall-clock time as reported by the backend
    pub elapsed_time: String,

    /// Populated only in the `error` state
    #[serde(default)]
    pub error_message: Option<String>,
}
