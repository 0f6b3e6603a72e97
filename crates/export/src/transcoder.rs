//! Transcoding engine handle.
//!
//! A [`Transcoder`] is a job-style engine with its own small file space:
//! write inputs, run one command, read outputs, delete files. The core only
//! builds commands; the engine does all decoding and encoding.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use async_trait::async_trait;
use tempfile::TempDir;

use cutline_common::config::TranscoderSettings;
use cutline_common::error::{CutlineError, CutlineResult};

/// Stderr lines kept in a transcode error message.
const STDERR_TAIL_LINES: usize = 12;

/// Trait for transcoding engines.
#[async_trait]
pub trait Transcoder: Send {
    /// Prepare the engine. Must succeed before any other call.
    async fn load(&mut self, config: &TranscoderSettings) -> CutlineResult<()>;

    fn is_loaded(&self) -> bool;

    async fn write_file(&mut self, name: &str, bytes: &[u8]) -> CutlineResult<()>;

    /// Run one command to completion.
    async fn exec(&mut self, args: &[String]) -> CutlineResult<()>;

    async fn read_file(&mut self, name: &str) -> CutlineResult<Vec<u8>>;

    async fn delete_file(&mut self, name: &str) -> CutlineResult<()>;

    /// Release the engine and everything in its file space.
    async fn terminate(&mut self);

    /// Engine name.
    fn name(&self) -> &str;
}

/// Runs the `ffmpeg` binary against files in a private temporary directory.
#[derive(Debug, Default)]
pub struct FfmpegTranscoder {
    ffmpeg_path: String,
    work_dir: Option<TempDir>,
}

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory holding the engine's files, once loaded.
    pub fn work_dir(&self) -> Option<&std::path::Path> {
        self.work_dir.as_ref().map(TempDir::path)
    }

    fn file_path(&self, name: &str) -> CutlineResult<PathBuf> {
        let dir = self
            .work_dir
            .as_ref()
            .ok_or_else(|| CutlineError::not_ready("ffmpeg transcoder not loaded"))?;
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\'])
        {
            return Err(CutlineError::invalid_input(format!(
                "invalid transcoder file name: {name:?}"
            )));
        }
        Ok(dir.path().join(name))
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn load(&mut self, config: &TranscoderSettings) -> CutlineResult<()> {
        if self.work_dir.is_some() {
            return Ok(());
        }
        if !command_exists(&config.ffmpeg_path) {
            return Err(CutlineError::unsupported(format!(
                "ffmpeg not found (looked for {:?})",
                config.ffmpeg_path
            )));
        }

        let work_dir = tempfile::Builder::new().prefix("cutline-").tempdir()?;
        tracing::info!(
            ffmpeg = %config.ffmpeg_path,
            work_dir = %work_dir.path().display(),
            "Transcoder loaded"
        );
        self.ffmpeg_path = config.ffmpeg_path.clone();
        self.work_dir = Some(work_dir);
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.work_dir.is_some()
    }

    async fn write_file(&mut self, name: &str, bytes: &[u8]) -> CutlineResult<()> {
        let path = self.file_path(name)?;
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(file = name, bytes = bytes.len(), "Transcoder file written");
        Ok(())
    }

    async fn exec(&mut self, args: &[String]) -> CutlineResult<()> {
        let dir = self
            .work_dir
            .as_ref()
            .ok_or_else(|| CutlineError::not_ready("ffmpeg transcoder not loaded"))?;

        tracing::debug!(args = ?args, "Running ffmpeg");
        let start = std::time::Instant::now();
        let output = tokio::process::Command::new(&self.ffmpeg_path)
            .args(["-hide_banner", "-nostdin", "-y"])
            .args(args)
            .current_dir(dir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| CutlineError::transcode(format!("Failed to start ffmpeg: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CutlineError::transcode(format!(
                "ffmpeg failed (status {}): {}",
                output.status,
                stderr_tail(&stderr)
            )));
        }

        tracing::info!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            "ffmpeg finished"
        );
        Ok(())
    }

    async fn read_file(&mut self, name: &str) -> CutlineResult<Vec<u8>> {
        let path = self.file_path(name)?;
        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CutlineError::transcode(format!("{name} was not produced"))
            } else {
                CutlineError::Io(e)
            }
        })
    }

    async fn delete_file(&mut self, name: &str) -> CutlineResult<()> {
        let path = self.file_path(name)?;
        tokio::fs::remove_file(&path).await?;
        Ok(())
    }

    async fn terminate(&mut self) {
        if let Some(dir) = self.work_dir.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                tracing::warn!(work_dir = %path.display(), error = %e, "Failed to remove transcoder work dir");
            }
        }
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

/// Whether `binary` resolves on `PATH` (or is a usable path).
pub(crate) fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(r#"command -v "$1" >/dev/null 2>&1"#)
        .arg("sh")
        .arg(binary)
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Last few non-empty stderr lines.
fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let skip = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[skip..].join("\n")
}
