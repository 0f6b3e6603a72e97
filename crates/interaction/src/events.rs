//! Editor events: every user action the editor reacts to, as data.
//!
//! Events serialize as one JSON object per line, tagged by `type`:
//!
//! ```text
//! {"type":"load_media","duration_secs":100.0,"width":1920,"height":1080}
//! {"type":"timeline_pointer_down","x":200.0,"width":800.0}
//! {"type":"key_down","key":"z","ctrl":true}
//! ```

use serde::{Deserialize, Serialize};

use cutline_edit_model::filters::FilterParam;

/// A single user or media-element event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    /// Metadata for a newly selected clip has loaded.
    LoadMedia {
        duration_secs: f64,
        width: u32,
        height: u32,
    },

    TimelinePointerDown { x: f64, width: f64 },
    TimelinePointerMove { x: f64, width: f64 },
    TimelinePointerUp,
    TimelinePointerLeave,

    CropPointerDown {
        x: f64,
        y: f64,
        canvas_width: f64,
        canvas_height: f64,
    },
    CropPointerMove {
        x: f64,
        y: f64,
        canvas_width: f64,
        canvas_height: f64,
    },
    CropPointerUp,
    CropPointerLeave,

    /// Keyboard input. Only the undo chord does anything.
    KeyDown {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        meta: bool,
    },
    /// The undo button.
    UndoCrop,

    SetFilter { param: FilterParam, value: f64 },
    ResetFilters,

    TogglePlay,
    Rewind,
    Forward,
    ToggleMute,
    SetVolume { volume: f64 },

    /// The media element reported its position.
    TimeUpdate { secs: f64 },
    /// The media element reached the end.
    Ended,
}

impl EditorEvent {
    /// Snake-case tag, as written in scripts.
    pub fn kind(&self) -> &'static str {
        match self {
            EditorEvent::LoadMedia { .. } => "load_media",
            EditorEvent::TimelinePointerDown { .. } => "timeline_pointer_down",
            EditorEvent::TimelinePointerMove { .. } => "timeline_pointer_move",
            EditorEvent::TimelinePointerUp => "timeline_pointer_up",
            EditorEvent::TimelinePointerLeave => "timeline_pointer_leave",
            EditorEvent::CropPointerDown { .. } => "crop_pointer_down",
            EditorEvent::CropPointerMove { .. } => "crop_pointer_move",
            EditorEvent::CropPointerUp => "crop_pointer_up",
            EditorEvent::CropPointerLeave => "crop_pointer_leave",
            EditorEvent::KeyDown { .. } => "key_down",
            EditorEvent::UndoCrop => "undo_crop",
            EditorEvent::SetFilter { .. } => "set_filter",
            EditorEvent::ResetFilters => "reset_filters",
            EditorEvent::TogglePlay => "toggle_play",
            EditorEvent::Rewind => "rewind",
            EditorEvent::Forward => "forward",
            EditorEvent::ToggleMute => "toggle_mute",
            EditorEvent::SetVolume { .. } => "set_volume",
            EditorEvent::TimeUpdate { .. } => "time_update",
            EditorEvent::Ended => "ended",
        }
    }
}

/// Parse a JSONL event script. Blank lines and `#` comments are skipped.
pub fn parse_script(jsonl: &str) -> Result<Vec<EditorEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}
