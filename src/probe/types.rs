//! Probed media facts.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Facts about one media file, as reported by the probing tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Path to the media file.
    pub path: PathBuf,
    /// Media duration, truncated to whole seconds.
    pub duration: Duration,
    /// Estimated payload size in megabytes, video and audio combined.
    pub size_mb: f64,
    /// Video codec name, e.g. "h264".
    pub video_format: String,
    /// Audio codec name; `None` when the file carries no usable audio track.
    pub audio_format: Option<String>,
    /// Video width in pixels.
    pub width: u32,
    /// Video height in pixels.
    pub height: u32,
    /// Reduced aspect ratio, e.g. "16:9".
    pub ratio: String,
    /// Frame rate in frames per second, rounded to three decimals.
    pub frame_rate: f64,
}

impl MediaInfo {
    /// Width and height as a pair.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
