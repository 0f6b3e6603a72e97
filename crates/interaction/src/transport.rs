//! Playback transport: play/pause, skip, volume and mute.
//!
//! The host owns the actual media element. Every method here updates the
//! mirrored [`PlaybackState`] and returns the [`PlayerCommand`]s the host
//! must apply to keep the element in sync.

use serde::{Deserialize, Serialize};

/// Instruction for the host's media element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum PlayerCommand {
    Play,
    Pause,
    Seek(f64),
    SetVolume(f64),
    SetMuted(bool),
}

/// Mirror of the media element's playback state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub current_time: f64,
    pub duration: f64,
    pub playing: bool,
    pub volume: f64,
    pub muted: bool,
}

impl PlaybackState {
    pub fn new(default_volume: f64) -> Self {
        Self {
            current_time: 0.0,
            duration: 0.0,
            playing: false,
            volume: snap_volume(default_volume),
            muted: false,
        }
    }

    /// New clip: back to the start, paused. Volume and mute carry over.
    pub fn reset_for(&mut self, duration: f64) {
        self.current_time = 0.0;
        self.duration = duration.max(0.0);
        self.playing = false;
    }

    pub fn toggle_play(&mut self) -> PlayerCommand {
        self.playing = !self.playing;
        if self.playing {
            PlayerCommand::Play
        } else {
            PlayerCommand::Pause
        }
    }

    /// Jump by `delta_secs`, staying inside the clip.
    pub fn skip(&mut self, delta_secs: f64) -> PlayerCommand {
        let target = (self.current_time + delta_secs).min(self.duration).max(0.0);
        self.seek(target)
    }

    /// Set the position, clamped to `[0, duration]`.
    pub fn seek(&mut self, secs: f64) -> PlayerCommand {
        let target = if secs.is_nan() {
            0.0
        } else {
            secs.min(self.duration).max(0.0)
        };
        self.current_time = target;
        PlayerCommand::Seek(target)
    }

    pub fn toggle_mute(&mut self) -> PlayerCommand {
        self.muted = !self.muted;
        PlayerCommand::SetMuted(self.muted)
    }

    /// Change the volume. Zero mutes; raising the volume while muted
    /// unmutes.
    pub fn set_volume(&mut self, volume: f64) -> Vec<PlayerCommand> {
        self.volume = snap_volume(volume);
        let mut commands = vec![PlayerCommand::SetVolume(self.volume)];
        if self.volume == 0.0 {
            if !self.muted {
                self.muted = true;
                commands.push(PlayerCommand::SetMuted(true));
            }
        } else if self.muted {
            self.muted = false;
            commands.push(PlayerCommand::SetMuted(false));
        }
        commands
    }

    /// The element reported a new position.
    pub fn on_time_update(&mut self, secs: f64) {
        if secs.is_finite() {
            self.current_time = secs.max(0.0);
        }
    }

    /// Playback reached the end of the clip.
    pub fn on_ended(&mut self) {
        self.playing = false;
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(0.7)
    }
}

/// Clamp to `[0, 1]` and snap to the slider's 0.01 step.
fn snap_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        return 0.0;
    }
    (volume.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

/// `m:ss` clock text. Minutes are not wrapped into hours.
pub fn format_clock(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
