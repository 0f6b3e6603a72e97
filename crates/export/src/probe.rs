//! Media metadata and frame sampling through ffprobe/ffmpeg.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use image::RgbaImage;
use serde::Deserialize;

use cutline_common::config::TranscoderSettings;
use cutline_common::error::{CutlineError, CutlineResult};
use cutline_edit_model::media::MediaInfo;
use cutline_render_engine::thumbnails::MediaSource;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Duration and natural size of the first video stream.
pub async fn probe_media(ffprobe_path: &str, path: &Path) -> CutlineResult<MediaInfo> {
    if !path.exists() {
        return Err(CutlineError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let output = tokio::process::Command::new(ffprobe_path)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,duration:format=duration",
            "-of",
            "json",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| CutlineError::media(format!("Failed to run ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(CutlineError::media(format!(
            "ffprobe failed (status {}): {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let info = parse_probe_output(&output.stdout)?;
    tracing::debug!(
        path = %path.display(),
        duration_secs = info.duration_secs,
        width = info.width,
        height = info.height,
        "Probed media"
    );
    Ok(info)
}

fn parse_probe_output(stdout: &[u8]) -> CutlineResult<MediaInfo> {
    let probe: ProbeOutput = serde_json::from_slice(stdout)?;
    let stream = probe
        .streams
        .first()
        .ok_or_else(|| CutlineError::media("no video stream found"))?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(CutlineError::media("video stream has no frame size")),
    };

    // Container duration first; some streams only carry it on the format.
    let duration = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(stream.duration.as_deref())
        .and_then(|d| d.trim().parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(MediaInfo::new(duration, width, height))
}

/// Samples single frames from a video file with ffmpeg.
///
/// `seek` only records the position; the frame is decoded on
/// `capture_frame`, so a seek resolves as soon as the position is valid.
#[derive(Debug, Clone)]
pub struct FfmpegFrameSource {
    ffmpeg_path: String,
    path: PathBuf,
    info: MediaInfo,
    frame_width: u32,
    position: f64,
}

impl FfmpegFrameSource {
    pub fn new(settings: &TranscoderSettings, path: impl Into<PathBuf>, info: MediaInfo) -> Self {
        Self {
            ffmpeg_path: settings.ffmpeg_path.clone(),
            path: path.into(),
            info,
            frame_width: settings.frame_width.max(2),
            position: 0.0,
        }
    }

    /// Probe `path` and open it.
    pub async fn open(settings: &TranscoderSettings, path: impl Into<PathBuf>) -> CutlineResult<Self> {
        let path = path.into();
        let info = probe_media(&settings.ffprobe_path, &path).await?;
        Ok(Self::new(settings, path, info))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MediaSource for FfmpegFrameSource {
    fn info(&self) -> MediaInfo {
        self.info
    }

    async fn seek(&mut self, secs: f64) -> CutlineResult<()> {
        if !secs.is_finite() || secs < 0.0 || secs > self.info.duration_secs {
            return Err(CutlineError::capture(format!(
                "seek position {secs} outside [0, {}]",
                self.info.duration_secs
            )));
        }
        self.position = secs;
        Ok(())
    }

    async fn capture_frame(&mut self) -> CutlineResult<RgbaImage> {
        let output = tokio::process::Command::new(&self.ffmpeg_path)
            .args(["-v", "error", "-nostdin", "-ss"])
            .arg(self.position.to_string())
            .arg("-i")
            .arg(&self.path)
            .args(["-frames:v", "1", "-vf"])
            .arg(format!("scale={}:-2", self.frame_width))
            .args(["-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| CutlineError::capture(format!("Failed to start ffmpeg: {e}")))?;

        if !output.status.success() {
            return Err(CutlineError::capture(format!(
                "ffmpeg frame capture failed at {}s: {}",
                self.position,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        frame_from_raw(output.stdout, self.frame_width)
    }
}

/// Wrap a raw RGBA buffer of known width.
fn frame_from_raw(bytes: Vec<u8>, width: u32) -> CutlineResult<RgbaImage> {
    let row = width as usize * 4;
    if row == 0 || bytes.is_empty() || bytes.len() % row != 0 {
        return Err(CutlineError::capture(format!(
            "unexpected raw frame size: {} bytes for width {width}",
            bytes.len()
        )));
    }
    let height = (bytes.len() / row) as u32;
    RgbaImage::from_raw(width, height, bytes)
        .ok_or_else(|| CutlineError::capture("raw frame buffer too small"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_output() {
        let json = br#"{
            "programs": [],
            "streams": [{"width": 1920, "height": 1080}],
            "format": {"duration": "12.480000"}
        }"#;
        let info = parse_probe_output(json).unwrap();
        assert_eq!(info, MediaInfo::new(12.48, 1920, 1080));
    }

    #[test]
    fn test_parse_probe_falls_back_to_stream_duration() {
        let json = br#"{"streams": [{"width": 640, "height": 480, "duration": "3.5"}]}"#;
        assert_eq!(parse_probe_output(json).unwrap().duration_secs, 3.5);
    }

    #[test]
    fn test_parse_probe_without_video() {
        let err = parse_probe_output(br#"{"streams": [], "format": {"duration": "1.0"}}"#)
            .unwrap_err();
        assert!(matches!(err, CutlineError::Media { .. }));
    }

    #[test]
    fn test_frame_from_raw() {
        let frame = frame_from_raw(vec![7u8; 4 * 4 * 3], 4).unwrap();
        assert_eq!(frame.dimensions(), (4, 3));
        assert!(frame_from_raw(vec![0u8; 10], 4).is_err());
        assert!(frame_from_raw(Vec::new(), 4).is_err());
    }

    #[tokio::test]
    async fn test_seek_outside_clip_fails() {
        let mut source = FfmpegFrameSource::new(
            &TranscoderSettings::default(),
            "clip.mp4",
            MediaInfo::new(10.0, 320, 180),
        );
        assert!(source.seek(4.0).await.is_ok());
        assert!(source.seek(11.0).await.is_err());
        assert!(source.seek(f64::NAN).await.is_err());
    }

    #[tokio::test]
    async fn test_probe_missing_file() {
        let err = probe_media("ffprobe", Path::new("/nonexistent/cutline.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, CutlineError::FileNotFound { .. }));
    }
}
