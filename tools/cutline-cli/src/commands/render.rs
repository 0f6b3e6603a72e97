//! PNG renders shared by `timeline` and `replay`.

use std::path::{Path, PathBuf};

use cutline_common::config::AppConfig;
use cutline_edit_model::crop::CropRect;
use cutline_edit_model::trim::TimeRange;
use cutline_export::FfmpegFrameSource;
use cutline_render_engine::crop_view::{compose_crop_overlay, OverlayFrame};
use cutline_render_engine::raster::{rasterize, rasterize_over, write_png};
use cutline_render_engine::thumbnails::{
    MediaSource, StripCache, StripLayout, ThumbnailGenerator, ThumbnailStrip,
};
use cutline_render_engine::timeline_view::{compose_timeline, TimelineFrame};

/// Strip for the clip behind `source`, generated on the first request.
pub(crate) async fn cached_strip<'a>(
    cache: &'a mut StripCache<PathBuf>,
    config: &AppConfig,
    source: &mut FfmpegFrameSource,
) -> anyhow::Result<&'a ThumbnailStrip> {
    let key = source.path().to_path_buf();
    if cache.begin(&key) {
        let generator = ThumbnailGenerator::new(StripLayout::from_settings(&config.timeline));
        match generator.generate(source).await {
            Ok(strip) => {
                if strip.blank_count() > 0 {
                    println!("  {} thumbnail(s) left blank", strip.blank_count());
                }
                cache.complete(&key, strip);
            }
            Err(e) => {
                cache.abort(&key);
                return Err(anyhow::anyhow!("Thumbnail generation failed: {e}"));
            }
        }
    }
    cache
        .strip()
        .ok_or_else(|| anyhow::anyhow!("No thumbnail strip for {}", key.display()))
}

/// Timeline canvas size and playhead for one render.
pub(crate) struct TimelineShot {
    pub width: u32,
    pub height: u32,
    pub trim: TimeRange,
    pub current_time: f64,
}

pub(crate) fn write_timeline(
    config: &AppConfig,
    duration_secs: f64,
    shot: &TimelineShot,
    strip: &ThumbnailStrip,
    output: &Path,
) -> anyhow::Result<()> {
    let scene = compose_timeline(&TimelineFrame {
        width: shot.width,
        height: shot.height,
        duration_secs,
        current_time: shot.current_time,
        trim: shot.trim,
        tile_count: config.timeline.tile_count,
        handle_width_px: config.timeline.handle_width_px,
    });
    tracing::debug!(commands = scene.len(), "Timeline scene composed");

    write_png(&rasterize(&scene, Some(strip)), output)?;
    println!("Timeline written: {}", output.display());
    Ok(())
}

/// Capture the frame at `at` and draw the crop overlay over it.
pub(crate) async fn write_crop_preview(
    config: &AppConfig,
    source: &mut FfmpegFrameSource,
    at: f64,
    crop: CropRect,
    output: &Path,
) -> anyhow::Result<()> {
    source.seek(at).await?;
    let frame = source.capture_frame().await?;

    let scene = compose_crop_overlay(&OverlayFrame {
        canvas_width: frame.width(),
        canvas_height: frame.height(),
        source: source.info().frame_size(),
        crop,
        handle_radius_px: config.crop.handle_radius_px,
    });
    tracing::debug!(commands = scene.len(), "Crop overlay composed");

    write_png(&rasterize_over(&frame, &scene, None), output)?;
    println!("Crop preview written: {}", output.display());
    Ok(())
}
