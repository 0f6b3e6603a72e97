//! Render the thumbnail strip to a PNG.

use std::path::PathBuf;

use cutline_common::config::AppConfig;
use cutline_export::FfmpegFrameSource;
use cutline_render_engine::raster::write_png;
use cutline_render_engine::thumbnails::{StripLayout, ThumbnailGenerator};

pub async fn run(config: &AppConfig, path: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let mut source = FfmpegFrameSource::open(&config.transcoder, &path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {e}", path.display()))?;

    let layout = StripLayout::from_settings(&config.timeline);
    println!(
        "Sampling {} frames into a {}x{} strip...",
        layout.tiles,
        layout.strip_width(),
        layout.tile_height
    );

    let strip = ThumbnailGenerator::new(layout)
        .generate(&mut source)
        .await
        .map_err(|e| anyhow::anyhow!("Thumbnail generation failed: {e}"))?;

    if strip.blank_count() > 0 {
        println!("  {} tile(s) left blank", strip.blank_count());
    }

    write_png(strip.image(), &output)?;
    println!("Strip written: {}", output.display());
    Ok(())
}
