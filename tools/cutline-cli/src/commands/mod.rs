pub mod config;
pub mod crop;
pub mod filter;
pub mod info;
mod render;
pub mod replay;
pub mod thumbnails;
pub mod timeline;
pub mod trim;

use std::path::Path;

use cutline_common::config::AppConfig;
use cutline_export::{ExportKind, ExportSession, FfmpegTranscoder};

use crate::ExportTarget;

/// Print or run one export job against `path`.
///
/// A refused export (engine missing or busy) is logged and skipped; a
/// failed one prints the user-facing alert and returns the error.
pub(crate) async fn run_export(
    config: &AppConfig,
    path: &Path,
    kind: ExportKind,
    target: &ExportTarget,
) -> anyhow::Result<()> {
    println!("  Job: {}", kind.label());
    println!("  Command: ffmpeg {}", kind.args().join(" "));

    if target.dry_run {
        return Ok(());
    }

    let input = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;

    let mut session = ExportSession::open(FfmpegTranscoder::new(), &config.transcoder)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load transcoder: {e}"))?;

    let result = session.export(&kind, &input).await;
    session.close().await;

    match result {
        Ok(artifact) => {
            let saved = artifact
                .save_into(&target.output_dir)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to save export: {e}"))?;
            println!("Export complete: {} ({} bytes)", saved.display(), artifact.bytes.len());
            Ok(())
        }
        Err(e) if e.is_not_ready() => {
            tracing::warn!(error = %e, "Export skipped");
            Ok(())
        }
        Err(e) => {
            println!("{}", e.user_message());
            Err(anyhow::anyhow!("{e}"))
        }
    }
}
