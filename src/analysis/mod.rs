//! Detection payloads and the vision backend client
//!
//! This module owns the data model shared with the remote detector:
//! - Validated deserialization of detection payloads (bounding boxes,
//!   confidences, timestamps) at the wire boundary
//! - `BackendClient`, the HTTP contract with the vision backend
//!   (upload, status polling, per-frame analysis, bulk results, video bytes)

pub mod client;
pub mod types;

pub use client::{AnalysisError, BackendClient, FrameAnalyzer, UploadReceipt};
pub use types::{
    AnalysisFrame, BoundingBox, DetectedObject, PayloadError, ProcessingState, ProcessingStatus,
    SessionData,
};
