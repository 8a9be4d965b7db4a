//! Playback session coordination
//!
//! Two session kinds own the mutable core state and wire the pipeline
//! together:
//! - `LiveSession`: continuous playback with periodic frame sampling;
//!   results stream into the store as the video plays
//! - `ReviewSession`: batch upload, tracked processing, then a one-time
//!   bulk load of the pre-computed result set
//!
//! Both drive the synchronizer from playback time updates and recompose the
//! overlay on selection changes and resizes. All timer handles are owned
//! here and released on teardown.

mod config;
mod live;
mod playback;
mod review;

pub use config::SessionConfig;
pub use live::{LiveSession, LiveStats};
pub use playback::Playback;
pub use review::{ReviewBackend, ReviewPhase, ReviewSession};
