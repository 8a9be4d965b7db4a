use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub backend: BackendConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the vision backend (upload/status/analyze/results/video)
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Live sampling period in milliseconds
    pub sample_period_ms: u64,

    /// Match tolerance in seconds
    pub tolerance_secs: f64,

    /// Batch status poll interval in milliseconds
    pub poll_interval_ms: u64,

    /// Ceiling on batch polling in seconds
    pub poll_ceiling_secs: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            sample_period_ms: 500,
            tolerance_secs: 0.25,
            poll_interval_ms: 1000,
            poll_ceiling_secs: 600,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
