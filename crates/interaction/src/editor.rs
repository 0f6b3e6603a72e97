//! Lifted editor state.
//!
//! `EditorState` is the single owner of trim, crop, crop history, filters
//! and playback. The interaction machines only propose edits; this type
//! applies them, so every view reads one consistent state.

use serde::{Deserialize, Serialize};

use cutline_common::config::AppConfig;
use cutline_edit_model::crop::{CropHistory, CropRect};
use cutline_edit_model::filters::FilterState;
use cutline_edit_model::media::MediaInfo;
use cutline_edit_model::trim::TimeRange;

use crate::crop::{CropInteraction, CropRequest, OverlayGeometry};
use crate::events::EditorEvent;
use crate::timeline::{TimelineGeometry, TimelineInteraction, TimelineRequest};
use crate::transport::{PlaybackState, PlayerCommand};

/// A key press with its modifier state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>, ctrl: bool, meta: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
            meta,
        }
    }

    /// Ctrl+Z or Meta+Z. The key is matched exactly, so Shift+Z (`"Z"`)
    /// does not undo.
    pub fn is_undo(&self) -> bool {
        (self.ctrl || self.meta) && self.key == "z"
    }
}

/// Which export actions the host may enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportAvailability {
    pub trim: bool,
    pub crop: bool,
    pub filter: bool,
}

impl ExportAvailability {
    pub fn any(&self) -> bool {
        self.trim || self.crop || self.filter
    }
}

/// Everything the editor knows about the current session.
#[derive(Debug, Clone)]
pub struct EditorState {
    media: MediaInfo,
    trim: TimeRange,
    crop: CropRect,
    crop_history: CropHistory,
    filters: FilterState,
    playback: PlaybackState,
    timeline: TimelineInteraction,
    overlay: CropInteraction,
    skip_secs: f64,
}

impl EditorState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            media: MediaInfo::new(0.0, 0, 0),
            trim: TimeRange::default(),
            crop: CropRect::default(),
            crop_history: CropHistory::new(),
            filters: FilterState::new(),
            playback: PlaybackState::new(config.playback.default_volume),
            timeline: TimelineInteraction::new(config.timeline.handle_width_px),
            overlay: CropInteraction::new(config.crop.handle_radius_px),
            skip_secs: config.playback.skip_secs,
        }
    }

    pub fn media(&self) -> &MediaInfo {
        &self.media
    }

    pub fn trim(&self) -> &TimeRange {
        &self.trim
    }

    pub fn crop(&self) -> &CropRect {
        &self.crop
    }

    pub fn crop_history(&self) -> &CropHistory {
        &self.crop_history
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn timeline(&self) -> &TimelineInteraction {
        &self.timeline
    }

    pub fn overlay(&self) -> &CropInteraction {
        &self.overlay
    }

    /// Metadata of a new clip arrived. Trim covers the whole clip, the crop
    /// covers the whole frame, and history restarts from that frame.
    pub fn load_media(&mut self, info: MediaInfo) {
        tracing::info!(
            duration_secs = info.duration_secs,
            width = info.width,
            height = info.height,
            "Media loaded"
        );
        self.media = info;
        self.trim = TimeRange::full(info.duration_secs);
        self.crop = CropRect::full(info.frame_size());
        self.crop_history.reseed(self.crop);
        self.playback.reset_for(info.duration_secs);
        self.timeline.pointer_up();
        self.overlay.pointer_up();
    }

    pub fn timeline_geometry(&self, width: f64) -> TimelineGeometry {
        TimelineGeometry::new(width, self.media.duration_secs)
    }

    pub fn overlay_geometry(&self, canvas_width: f64, canvas_height: f64) -> OverlayGeometry {
        OverlayGeometry::new(canvas_width, canvas_height, self.media.frame_size())
    }

    /// Apply a timeline request. A seek yields the command that moves the
    /// media element.
    pub fn apply_timeline_request(&mut self, request: TimelineRequest) -> Option<PlayerCommand> {
        match request {
            TimelineRequest::Seek(t) => Some(self.playback.seek(t)),
            TimelineRequest::SetTrimStart(t) => {
                self.trim.set_start(t);
                None
            }
            TimelineRequest::SetTrimEnd(t) => {
                self.trim.set_end(t, self.media.duration_secs);
                None
            }
        }
    }

    pub fn apply_crop_request(&mut self, request: CropRequest) {
        match request {
            CropRequest::BeginResize { snapshot, .. } => self.crop_history.push(snapshot),
            CropRequest::Resize(rect) => self.crop = rect,
        }
    }

    /// Restore the most recent crop snapshot. Returns false when there is
    /// nothing to undo.
    pub fn undo_crop(&mut self) -> bool {
        match self.crop_history.pop() {
            Some(previous) => {
                self.crop = previous;
                true
            }
            None => {
                tracing::debug!("Crop undo ignored: history empty");
                false
            }
        }
    }

    /// Keyboard shortcut dispatch. Returns whether the chord did anything.
    pub fn handle_key(&mut self, chord: &KeyChord) -> bool {
        chord.is_undo() && self.undo_crop()
    }

    /// Which exports the host may offer right now.
    pub fn export_availability(&self, engine_loaded: bool, processing: bool) -> ExportAvailability {
        if !engine_loaded || processing {
            return ExportAvailability::default();
        }
        ExportAvailability {
            trim: self.trim.is_exportable(),
            crop: self.media.is_ready(),
            filter: self.filters.has_active(),
        }
    }

    /// Dispatch one event. Returns the commands the host must apply to its
    /// media element, in order.
    pub fn apply(&mut self, event: EditorEvent) -> Vec<PlayerCommand> {
        tracing::trace!(event = event.kind(), "Editor event");
        match event {
            EditorEvent::LoadMedia {
                duration_secs,
                width,
                height,
            } => {
                self.load_media(MediaInfo::new(duration_secs, width, height));
                Vec::new()
            }

            EditorEvent::TimelinePointerDown { x, width } => {
                let geometry = self.timeline_geometry(width);
                let request = self.timeline.pointer_down(x, geometry, &self.trim);
                request
                    .and_then(|r| self.apply_timeline_request(r))
                    .into_iter()
                    .collect()
            }
            EditorEvent::TimelinePointerMove { x, width } => {
                let geometry = self.timeline_geometry(width);
                let request = self.timeline.pointer_move(x, geometry);
                request
                    .and_then(|r| self.apply_timeline_request(r))
                    .into_iter()
                    .collect()
            }
            EditorEvent::TimelinePointerUp => {
                self.timeline.pointer_up();
                Vec::new()
            }
            EditorEvent::TimelinePointerLeave => {
                self.timeline.pointer_leave();
                Vec::new()
            }

            EditorEvent::CropPointerDown {
                x,
                y,
                canvas_width,
                canvas_height,
            } => {
                let geometry = self.overlay_geometry(canvas_width, canvas_height);
                if let Some(request) = self.overlay.pointer_down(x, y, geometry, &self.crop) {
                    self.apply_crop_request(request);
                }
                Vec::new()
            }
            EditorEvent::CropPointerMove {
                x,
                y,
                canvas_width,
                canvas_height,
            } => {
                let geometry = self.overlay_geometry(canvas_width, canvas_height);
                if let Some(request) = self.overlay.pointer_move(x, y, geometry, &self.crop) {
                    self.apply_crop_request(request);
                }
                Vec::new()
            }
            EditorEvent::CropPointerUp => {
                self.overlay.pointer_up();
                Vec::new()
            }
            EditorEvent::CropPointerLeave => {
                self.overlay.pointer_leave();
                Vec::new()
            }

            EditorEvent::KeyDown { key, ctrl, meta } => {
                self.handle_key(&KeyChord { key, ctrl, meta });
                Vec::new()
            }
            EditorEvent::UndoCrop => {
                self.undo_crop();
                Vec::new()
            }

            EditorEvent::SetFilter { param, value } => {
                self.filters.set_param(param, value);
                Vec::new()
            }
            EditorEvent::ResetFilters => {
                self.filters.reset();
                Vec::new()
            }

            EditorEvent::TogglePlay => vec![self.playback.toggle_play()],
            EditorEvent::Rewind => vec![self.playback.skip(-self.skip_secs)],
            EditorEvent::Forward => vec![self.playback.skip(self.skip_secs)],
            EditorEvent::ToggleMute => vec![self.playback.toggle_mute()],
            EditorEvent::SetVolume { volume } => self.playback.set_volume(volume),
            EditorEvent::TimeUpdate { secs } => {
                self.playback.on_time_update(secs);
                Vec::new()
            }
            EditorEvent::Ended => {
                self.playback.on_ended();
                Vec::new()
            }
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutline_edit_model::filters::FilterParam;

    fn loaded() -> EditorState {
        let mut editor = EditorState::default();
        editor.load_media(MediaInfo::new(100.0, 1920, 1080));
        editor
    }

    #[test]
    fn test_load_media_resets_everything() {
        let mut editor = loaded();
        editor.apply_crop_request(CropRequest::Resize(CropRect::new(5.0, 5.0, 300.0, 300.0)));
        editor.load_media(MediaInfo::new(30.0, 640, 480));
        assert_eq!(*editor.trim(), TimeRange { start: 0.0, end: 30.0 });
        assert_eq!(*editor.crop(), CropRect::new(0.0, 0.0, 640.0, 480.0));
        assert_eq!(editor.crop_history().len(), 1);
        assert_eq!(editor.playback().current_time, 0.0);
    }

    #[test]
    fn test_undo_chord() {
        assert!(KeyChord::new("z", true, false).is_undo());
        assert!(KeyChord::new("z", false, true).is_undo());
        assert!(!KeyChord::new("z", false, false).is_undo());
        assert!(!KeyChord::new("Z", true, false).is_undo());
        assert!(!KeyChord::new("y", true, false).is_undo());
    }

    #[test]
    fn test_undo_with_empty_history_is_noop() {
        let mut editor = EditorState::default();
        let before = *editor.crop();
        assert!(!editor.handle_key(&KeyChord::new("z", true, false)));
        assert_eq!(*editor.crop(), before);
    }

    #[test]
    fn test_seed_entry_can_be_undone() {
        let mut editor = loaded();
        editor.apply_crop_request(CropRequest::Resize(CropRect::new(0.0, 0.0, 500.0, 500.0)));
        assert!(editor.undo_crop());
        assert_eq!(*editor.crop(), CropRect::new(0.0, 0.0, 1920.0, 1080.0));
        assert!(!editor.undo_crop());
    }

    #[test]
    fn test_export_availability() {
        let mut editor = loaded();
        let available = editor.export_availability(true, false);
        assert!(available.trim);
        assert!(available.crop);
        assert!(!available.filter);

        editor.filters_mut().set_param(FilterParam::Invert, 1.0);
        assert!(editor.export_availability(true, false).filter);
        assert!(!editor.export_availability(true, true).any());
        assert!(!editor.export_availability(false, false).any());
    }

    #[test]
    fn test_nothing_available_before_media() {
        let editor = EditorState::default();
        let available = editor.export_availability(true, false);
        assert!(!available.trim);
        assert!(!available.crop);
    }

    #[test]
    fn test_rewind_and_forward_use_skip() {
        let mut editor = loaded();
        editor.apply(EditorEvent::TimeUpdate { secs: 3.0 });
        assert_eq!(editor.apply(EditorEvent::Rewind), vec![PlayerCommand::Seek(0.0)]);
        assert_eq!(editor.apply(EditorEvent::Forward), vec![PlayerCommand::Seek(5.0)]);
    }

    #[test]
    fn test_timeline_seek_event_moves_playhead() {
        let mut editor = loaded();
        let commands = editor.apply(EditorEvent::TimelinePointerDown { x: 200.0, width: 800.0 });
        assert_eq!(commands, vec![PlayerCommand::Seek(25.0)]);
        assert_eq!(editor.playback().current_time, 25.0);
    }
}
