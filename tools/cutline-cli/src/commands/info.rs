//! Show clip metadata.

use std::path::PathBuf;

use cutline_common::config::AppConfig;
use cutline_export::probe_media;
use cutline_interaction::format_clock;

pub async fn run(config: &AppConfig, path: PathBuf) -> anyhow::Result<()> {
    let info = probe_media(&config.transcoder.ffprobe_path, &path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to probe {}: {e}", path.display()))?;

    println!("Clip: {}", path.display());
    println!(
        "  Duration:   {} ({:.3}s)",
        format_clock(info.duration_secs),
        info.duration_secs
    );
    println!("  Frame size: {}x{}", info.width, info.height);
    match info.frame_size().aspect_ratio() {
        Some(aspect) => println!("  Aspect:     {aspect:.4}"),
        None => println!("  Aspect:     unknown"),
    }
    if !info.is_ready() {
        println!("  Warning: clip has no usable duration; editing is disabled");
    }

    Ok(())
}
