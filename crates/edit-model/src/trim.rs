//! Trim range: the time window kept by a trimmed export.

use serde::{Deserialize, Serialize};

/// Smallest allowed distance between trim start and trim end, in seconds.
pub const MIN_TRIM_GAP_SECS: f64 = 0.1;

/// A `[start, end]` window in seconds.
///
/// Edits go through [`TimeRange::set_start`] and [`TimeRange::set_end`],
/// which keep the window inside `[0, duration]` and, when the clip is long
/// enough, keep `end - start >= MIN_TRIM_GAP_SECS`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    /// The whole clip.
    pub fn full(duration_secs: f64) -> Self {
        Self {
            start: 0.0,
            end: duration_secs.max(0.0),
        }
    }

    /// Move the start toward `candidate`, stopping short of the end.
    /// Never goes below zero, even on clips shorter than the gap.
    pub fn set_start(&mut self, candidate: f64) {
        self.start = candidate.min(self.end - MIN_TRIM_GAP_SECS).max(0.0);
    }

    /// Move the end toward `candidate`, stopping short of the start.
    /// Never passes `duration_secs`, or drops below the start.
    pub fn set_end(&mut self, candidate: f64, duration_secs: f64) {
        self.end = candidate
            .max(self.start + MIN_TRIM_GAP_SECS)
            .min(duration_secs)
            .max(self.start);
    }

    /// Length in seconds.
    pub fn len_secs(&self) -> f64 {
        self.end - self.start
    }

    /// A trimmed export needs a non-empty window.
    pub fn is_exportable(&self) -> bool {
        self.end > self.start
    }

    /// Whether `t` falls inside the window.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::full(0.0)
    }
}
