//! Replay an editor event script against a clip and print the final state.

use std::path::PathBuf;

use serde::Serialize;

use cutline_common::config::AppConfig;
use cutline_edit_model::crop::PixelCrop;
use cutline_edit_model::trim::TimeRange;
use cutline_export::FfmpegFrameSource;
use cutline_interaction::{parse_script, EditorEvent, EditorState, ExportAvailability, PlaybackState};
use cutline_render_engine::thumbnails::{MediaSource, StripCache};

use super::render::{self, TimelineShot};

const TIMELINE_SIZE: (u32, u32) = (800, 80);

#[derive(Debug, Serialize)]
struct ReplayReport {
    events: usize,
    trim: TimeRange,
    crop: PixelCrop,
    undo_depth: usize,
    preview_style: String,
    filter_graph: Option<String>,
    playback: PlaybackState,
    exports: ExportAvailability,
}

pub async fn run(
    config: &AppConfig,
    path: PathBuf,
    script: PathBuf,
    trace_commands: bool,
    render_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut source = FfmpegFrameSource::open(&config.transcoder, &path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {e}", path.display()))?;
    let info = source.info();

    let text = tokio::fs::read_to_string(&script)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", script.display()))?;
    let events =
        parse_script(&text).map_err(|e| anyhow::anyhow!("Invalid event script: {e}"))?;

    let mut editor = EditorState::new(config);
    editor.apply(EditorEvent::LoadMedia {
        duration_secs: info.duration_secs,
        width: info.width,
        height: info.height,
    });

    let count = events.len();
    for event in events {
        let kind = event.kind();
        let commands = editor.apply(event);
        if trace_commands && !commands.is_empty() {
            println!("{kind}: {}", serde_json::to_string(&commands)?);
        }
    }

    let report = ReplayReport {
        events: count,
        trim: *editor.trim(),
        crop: editor.crop().to_pixels(),
        undo_depth: editor.crop_history().len(),
        preview_style: editor.filters().to_preview_style(),
        filter_graph: editor.filters().to_export_filter_graph(),
        playback: *editor.playback(),
        exports: editor.export_availability(true, false),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(dir) = render_dir {
        render_final_state(config, &editor, &mut source, &dir).await?;
    }
    Ok(())
}

/// Write the final timeline and crop overlay as PNGs into `dir`.
async fn render_final_state(
    config: &AppConfig,
    editor: &EditorState,
    source: &mut FfmpegFrameSource,
    dir: &std::path::Path,
) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", dir.display()))?;

    let duration_secs = editor.media().duration_secs;
    let current_time = editor.playback().current_time.clamp(0.0, duration_secs);

    let mut cache = StripCache::new();
    let strip = render::cached_strip(&mut cache, config, source).await?;
    let shot = TimelineShot {
        width: TIMELINE_SIZE.0,
        height: TIMELINE_SIZE.1,
        trim: *editor.trim(),
        current_time,
    };
    render::write_timeline(config, duration_secs, &shot, strip, &dir.join("timeline.png"))?;

    render::write_crop_preview(
        config,
        source,
        current_time,
        *editor.crop(),
        &dir.join("crop.png"),
    )
    .await
}
