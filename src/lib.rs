pub mod analysis;
pub mod config;
pub mod events;
pub mod http;
pub mod overlay;
pub mod progress;
pub mod sampler;
pub mod session;
pub mod store;
pub mod sync;

pub use analysis::{
    AnalysisError, AnalysisFrame, BackendClient, BoundingBox, DetectedObject, FrameAnalyzer,
    PayloadError, ProcessingState, ProcessingStatus, SessionData, UploadReceipt,
};
pub use config::Config;
pub use events::{PlayerEvent, TimeJumpBus, TimeJumpReceiver};
pub use http::{create_router, AppState};
pub use overlay::{BoxStyle, DrawCommand, RenderedRect, ScreenRect};
pub use progress::{ProgressTracker, StatusSource, TrackerError};
pub use sampler::{CapturedFrame, FrameCapture, Sampler};
pub use session::{LiveSession, LiveStats, ReviewPhase, ReviewSession, SessionConfig};
pub use store::{ResultStore, StoreError};
pub use sync::{Selection, Synchronizer};
