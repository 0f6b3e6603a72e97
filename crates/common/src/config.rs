//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CutlineError, CutlineResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Timeline strip and trim handle settings.
    pub timeline: TimelineSettings,

    /// Crop overlay settings.
    pub crop: CropSettings,

    /// Transport control settings.
    pub playback: PlaybackSettings,

    /// External transcoder settings.
    pub transcoder: TranscoderSettings,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Timeline strip layout and trim handles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// Number of thumbnail tiles in the strip.
    pub tile_count: u32,

    /// Width of a single tile in the strip buffer (pixels).
    pub tile_width: u32,

    /// Height of the strip buffer (pixels).
    pub tile_height: u32,

    /// Width of a trim handle bar; also the grab tolerance (pixels).
    pub handle_width_px: f64,
}

/// Crop overlay handles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CropSettings {
    /// Radius of a corner handle (display pixels).
    pub handle_radius_px: f64,
}

/// Transport controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Seconds moved by the rewind/forward buttons.
    pub skip_secs: f64,

    /// Volume applied when a session starts.
    pub default_volume: f64,
}

/// Where to find the external transcoding tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscoderSettings {
    /// ffmpeg executable (name on PATH or absolute path).
    pub ffmpeg_path: String,

    /// ffprobe executable (name on PATH or absolute path).
    pub ffprobe_path: String,

    /// Width frames are decoded at for thumbnail capture.
    pub frame_width: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "cutline=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            tile_count: 10,
            tile_width: 160,
            tile_height: 90,
            handle_width_px: 10.0,
        }
    }
}

impl Default for CropSettings {
    fn default() -> Self {
        Self {
            handle_radius_px: 6.0,
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            skip_secs: 5.0,
            default_volume: 0.7,
        }
    }
}

impl Default for TranscoderSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            frame_width: 320,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    /// Read and parse one config file.
    pub fn load_from(path: &Path) -> CutlineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CutlineError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| CutlineError::config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Save config to the standard location. Returns the path written.
    pub fn save(&self) -> CutlineResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> CutlineResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("cutline").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_editor_layout() {
        let config = AppConfig::default();
        assert_eq!(config.timeline.tile_count, 10);
        assert_eq!(config.timeline.tile_width, 160);
        assert_eq!(config.timeline.tile_height, 90);
        assert_eq!(config.crop.handle_radius_px, 6.0);
        assert_eq!(config.playback.skip_secs, 5.0);
    }

    #[test]
    fn test_partial_config_fills_missing_sections() {
        let raw = r#"{ "timeline": { "tile_count": 6 }, "logging": { "level": "debug" } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.timeline.tile_count, 6);
        assert_eq!(config.timeline.tile_width, 160);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.transcoder.ffmpeg_path, "ffmpeg");
    }

    #[test]
    fn test_save_then_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.json");
        let mut config = AppConfig::default();
        config.timeline.tile_count = 4;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.timeline.tile_count, 4);
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, CutlineError::Config { .. }));
        assert!(err.to_string().starts_with("Configuration error: cannot parse"));
    }
}
