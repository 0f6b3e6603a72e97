//! Export session: one owned transcoder per editing session.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cutline_common::config::TranscoderSettings;
use cutline_common::error::{CutlineError, CutlineResult};

use crate::commands::{ExportKind, INPUT_FILE, OUTPUT_FILE};
use crate::transcoder::Transcoder;

pub const MP4_MIME: &str = "video/mp4";

/// A finished export, ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Write the artifact into `dir` under its file name.
    pub async fn save_into(&self, dir: &Path) -> CutlineResult<PathBuf> {
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}

/// Sets the processing flag on creation and clears it on drop, so the
/// flag is reset on every exit path.
struct ProcessingGuard {
    flag: Arc<AtomicBool>,
}

impl ProcessingGuard {
    fn engage(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Owns the transcoder for the lifetime of an editing session.
pub struct ExportSession<T: Transcoder> {
    transcoder: T,
    processing: Arc<AtomicBool>,
}

impl<T: Transcoder> ExportSession<T> {
    /// Wrap a transcoder that may or may not be loaded yet.
    pub fn new(transcoder: T) -> Self {
        Self {
            transcoder,
            processing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Load `transcoder` and start a session with it.
    pub async fn open(mut transcoder: T, config: &TranscoderSettings) -> CutlineResult<Self> {
        transcoder.load(config).await?;
        tracing::info!(engine = transcoder.name(), "Export session opened");
        Ok(Self::new(transcoder))
    }

    pub fn is_loaded(&self) -> bool {
        self.transcoder.is_loaded()
    }

    /// Shared flag that is true while an export runs. Hosts use it to
    /// disable export controls.
    pub fn processing_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.processing)
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    pub fn transcoder(&self) -> &T {
        &self.transcoder
    }

    pub fn transcoder_mut(&mut self) -> &mut T {
        &mut self.transcoder
    }

    /// Run one export job over `input`.
    ///
    /// Refused with `NotReady` (no side effects) when the engine is not
    /// loaded or another export holds the processing flag. Any engine
    /// failure is logged and returned as an `Export` error; edit state is
    /// never touched.
    pub async fn export(&mut self, kind: &ExportKind, input: &[u8]) -> CutlineResult<ExportArtifact> {
        if !self.transcoder.is_loaded() {
            tracing::debug!(kind = kind.label(), "Export ignored: transcoder not loaded");
            return Err(CutlineError::not_ready("transcoder not loaded"));
        }
        let Some(_guard) = ProcessingGuard::engage(&self.processing) else {
            tracing::debug!(kind = kind.label(), "Export ignored: already processing");
            return Err(CutlineError::not_ready("an export is already running"));
        };

        tracing::info!(
            kind = kind.label(),
            input_bytes = input.len(),
            engine = self.transcoder.name(),
            "Starting export"
        );

        let result = self.run_job(kind, input).await;
        self.remove_scratch_files().await;

        match result {
            Ok(bytes) => {
                let artifact = ExportArtifact {
                    file_name: kind.download_name(),
                    mime_type: MP4_MIME,
                    bytes,
                };
                tracing::info!(
                    kind = kind.label(),
                    file = %artifact.file_name,
                    output_bytes = artifact.bytes.len(),
                    "Export complete"
                );
                Ok(artifact)
            }
            Err(e) => {
                tracing::error!(kind = kind.label(), error = %e, "Export failed");
                Err(CutlineError::export(format!("{} export failed: {e}", kind.label())))
            }
        }
    }

    async fn run_job(&mut self, kind: &ExportKind, input: &[u8]) -> CutlineResult<Vec<u8>> {
        self.transcoder.write_file(INPUT_FILE, input).await?;
        self.transcoder.exec(&kind.args()).await?;
        let output = self.transcoder.read_file(OUTPUT_FILE).await?;
        if output.is_empty() {
            return Err(CutlineError::transcode("no output data"));
        }
        Ok(output)
    }

    async fn remove_scratch_files(&mut self) {
        for name in [INPUT_FILE, OUTPUT_FILE] {
            if let Err(e) = self.transcoder.delete_file(name).await {
                tracing::debug!(file = name, error = %e, "Scratch file not removed");
            }
        }
    }

    /// Tear the engine down and end the session. Hands back the
    /// terminated engine.
    pub async fn close(mut self) -> T {
        self.transcoder.terminate().await;
        tracing::info!(engine = self.transcoder.name(), "Export session closed");
        self.transcoder
    }
}
