//! Metadata of the loaded clip.

use serde::{Deserialize, Serialize};

/// Natural pixel size of a video frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are non-zero.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width divided by height, or `None` for a degenerate size.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if !self.is_valid() {
            return None;
        }
        Some(self.width as f64 / self.height as f64)
    }
}

/// What the host knows about the clip once its metadata has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Natural duration in seconds.
    pub duration_secs: f64,

    /// Natural frame width in pixels.
    pub width: u32,

    /// Natural frame height in pixels.
    pub height: u32,
}

impl MediaInfo {
    /// Create media info; negative or non-finite durations become 0.
    pub fn new(duration_secs: f64, width: u32, height: u32) -> Self {
        let duration_secs = if duration_secs.is_finite() {
            duration_secs.max(0.0)
        } else {
            0.0
        };
        Self {
            duration_secs,
            width,
            height,
        }
    }

    pub fn frame_size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }

    /// Metadata is usable for trimming, cropping, and thumbnailing.
    pub fn is_ready(&self) -> bool {
        self.duration_secs > 0.0 && self.frame_size().is_valid()
    }
}
