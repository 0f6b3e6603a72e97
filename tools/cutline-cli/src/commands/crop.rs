//! Export a cropped copy.

use std::path::PathBuf;

use cutline_common::config::AppConfig;
use cutline_edit_model::crop::CropRect;
use cutline_export::{probe_media, ExportKind};

use crate::ExportTarget;

pub async fn run(
    config: &AppConfig,
    path: PathBuf,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    target: ExportTarget,
) -> anyhow::Result<()> {
    let rect = CropRect::new(x, y, width, height);

    // Bounds are only checked when the clip can be probed; a dry run
    // against a missing file still prints the command.
    match probe_media(&config.transcoder.ffprobe_path, &path).await {
        Ok(info) if !rect.is_valid_within(info.frame_size()) => {
            return Err(anyhow::anyhow!(
                "Crop {}x{}+{}+{} does not fit inside {}x{}",
                width,
                height,
                x,
                y,
                info.width,
                info.height
            ));
        }
        Ok(_) => {}
        Err(e) if target.dry_run => tracing::debug!(error = %e, "Skipping crop bounds check"),
        Err(e) => return Err(anyhow::anyhow!("Failed to probe {}: {e}", path.display())),
    }

    let kind = ExportKind::crop(&rect)
        .ok_or_else(|| anyhow::anyhow!("Crop rounds down to an empty rectangle"))?;

    println!("Cropping {}", path.display());
    super::run_export(config, &path, kind, &target).await
}
