//! Render a timeline frame (strip, trim window, handles, playhead) to a PNG.

use std::path::PathBuf;

use cutline_common::config::AppConfig;
use cutline_edit_model::trim::TimeRange;
use cutline_export::FfmpegFrameSource;
use cutline_interaction::format_clock;
use cutline_render_engine::thumbnails::{MediaSource, StripCache};

use super::render::{self, TimelineShot};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    config: &AppConfig,
    path: PathBuf,
    start: Option<f64>,
    end: Option<f64>,
    at: f64,
    width: u32,
    height: u32,
    output: PathBuf,
) -> anyhow::Result<()> {
    let mut source = FfmpegFrameSource::open(&config.transcoder, &path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {e}", path.display()))?;
    let info = source.info();
    if !info.is_ready() {
        return Err(anyhow::anyhow!("{} has no usable duration", path.display()));
    }

    let mut trim = TimeRange::full(info.duration_secs);
    if let Some(start) = start {
        trim.set_start(start);
    }
    if let Some(end) = end {
        trim.set_end(end, info.duration_secs);
    }
    let current_time = at.clamp(0.0, info.duration_secs);

    println!(
        "Timeline: trim {} - {}, playhead {}",
        format_clock(trim.start),
        format_clock(trim.end),
        format_clock(current_time)
    );

    let mut cache = StripCache::new();
    let strip = render::cached_strip(&mut cache, config, &mut source).await?;
    let shot = TimelineShot {
        width,
        height,
        trim,
        current_time,
    };
    render::write_timeline(config, info.duration_secs, &shot, strip, &output)
}
