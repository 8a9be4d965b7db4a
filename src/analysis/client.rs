use anyhow::{Context, Result};
use base64::Engine;
use bytes::Bytes;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use super::types::{AnalysisFrame, ProcessingStatus, SessionData};

/// Ceiling for a single analyze round trip. Must be well above the sampling
/// period so the next tick is the natural retry.
const ANALYZE_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-tick analysis failure. Recoverable: the caller logs, skips the tick,
/// and lets the next tick retry.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No response within the request ceiling. The request future is dropped,
    /// so a late response can never be observed.
    #[error("analysis request timed out after {0:?}")]
    Timeout(Duration),

    #[error("analysis request failed: {0}")]
    Failed(String),
}

/// The analyze seam the sampler talks through
///
/// Implemented by `BackendClient`; tests substitute their own.
#[async_trait::async_trait]
pub trait FrameAnalyzer: Send + Sync {
    async fn analyze_frame(
        &self,
        image: &[u8],
        timestamp: f64,
    ) -> Result<AnalysisFrame, AnalysisError>;
}

/// Receipt returned by the backend when an upload is accepted
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    pub video_id: String,
    pub video_name: String,
}

#[derive(Serialize)]
struct AnalyzeRequest {
    /// Base64-encoded still image
    frame_data: String,
    timestamp: f64,
}

/// HTTP client for the vision backend
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Upload a video file and start backend processing
    pub async fn upload(&self, filename: &str, data: Vec<u8>) -> Result<UploadReceipt> {
        info!("Uploading video {} ({} bytes)", filename, data.len());

        let part = reqwest::multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str("video/mp4")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(self.url("/upload-video"))
            .multipart(form)
            .send()
            .await
            .context("Failed to upload video")?
            .error_for_status()
            .context("Upload rejected by backend")?;

        let receipt: UploadReceipt = response
            .json()
            .await
            .context("Failed to parse upload receipt")?;

        info!("Upload accepted: video_id={}", receipt.video_id);

        Ok(receipt)
    }

    /// Fetch the current processing snapshot for a video
    pub async fn status(&self, video_id: &str) -> Result<ProcessingStatus> {
        let response = self
            .http
            .get(self.url(&format!("/processing-status/{video_id}")))
            .send()
            .await
            .context("Failed to fetch processing status")?
            .error_for_status()
            .context("Status request rejected by backend")?;

        response
            .json()
            .await
            .context("Failed to parse processing status")
    }

    /// Submit one captured frame for analysis
    ///
    /// Bounded by [`ANALYZE_TIMEOUT`]; on timeout the in-flight request is
    /// abandoned and its eventual response discarded with it.
    pub async fn analyze_frame(
        &self,
        image: &[u8],
        timestamp: f64,
    ) -> Result<AnalysisFrame, AnalysisError> {
        let request = AnalyzeRequest {
            frame_data: base64::engine::general_purpose::STANDARD.encode(image),
            timestamp,
        };

        let response = self
            .http
            .post(self.url("/analyze-frame"))
            .timeout(ANALYZE_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalysisError::Timeout(ANALYZE_TIMEOUT)
                } else {
                    AnalysisError::Failed(e.to_string())
                }
            })?;

        let response = response
            .error_for_status()
            .map_err(|e| AnalysisError::Failed(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| AnalysisError::Failed(format!("bad analysis payload: {e}")))
    }

    /// Fetch the complete pre-computed result set for a processed video
    pub async fn results(&self, video_name: &str) -> Result<SessionData> {
        info!("Fetching results for {}", video_name);

        let response = self
            .http
            .get(self.url(&format!("/results/{video_name}")))
            .send()
            .await
            .context("Failed to fetch results")?
            .error_for_status()
            .context("Results request rejected by backend")?;

        let data: SessionData = response
            .json()
            .await
            .context("Failed to parse session data")?;

        info!(
            "Fetched {} analysis frames for {}",
            data.frames.len(),
            data.video_id
        );

        Ok(data)
    }

    /// Stream the original video bytes for the player element
    pub async fn video_stream(
        &self,
        video_name: &str,
    ) -> Result<impl Stream<Item = reqwest::Result<Bytes>>> {
        let response = self
            .http
            .get(self.url(&format!("/video/{video_name}")))
            .send()
            .await
            .context("Failed to fetch video stream")?
            .error_for_status()
            .context("Video request rejected by backend")?;

        Ok(response.bytes_stream())
    }
}

#[async_trait::async_trait]
impl FrameAnalyzer for BackendClient {
    async fn analyze_frame(
        &self,
        image: &[u8],
        timestamp: f64,
    ) -> Result<AnalysisFrame, AnalysisError> {
        BackendClient::analyze_frame(self, image, timestamp).await
    }
}
