//! Transcode job construction.
//!
//! Every job reads [`INPUT_FILE`] and writes [`OUTPUT_FILE`] inside the
//! transcoder's file space. Numbers are written with Rust's shortest
//! round-trip formatting, so `10.0` becomes `10` and `12.5` stays `12.5`.

use cutline_edit_model::crop::{CropRect, PixelCrop};
use cutline_edit_model::filters::FilterState;
use cutline_edit_model::trim::TimeRange;

pub const INPUT_FILE: &str = "input.mp4";
pub const OUTPUT_FILE: &str = "output.mp4";

/// One of the three export jobs, validated.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportKind {
    /// Stream-copy the `[start, end]` window.
    Trim(TimeRange),
    /// Re-encode video cropped to whole pixels; audio is copied.
    Crop(PixelCrop),
    /// Re-encode video through a filter graph; audio is copied.
    Filter(String),
}

impl ExportKind {
    /// `None` unless `end > start`.
    pub fn trim(range: &TimeRange) -> Option<Self> {
        range.is_exportable().then_some(ExportKind::Trim(*range))
    }

    /// `None` when the crop rounds down to an empty rectangle.
    pub fn crop(rect: &CropRect) -> Option<Self> {
        let pixels = rect.to_pixels();
        (pixels.width > 0 && pixels.height > 0).then_some(ExportKind::Crop(pixels))
    }

    /// `None` when no filter is active.
    pub fn filter(filters: &FilterState) -> Option<Self> {
        filters.to_export_filter_graph().map(ExportKind::Filter)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportKind::Trim(_) => "trim",
            ExportKind::Crop(_) => "crop",
            ExportKind::Filter(_) => "filter",
        }
    }

    /// Arguments for the transcoder's `exec`.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["-i".to_string(), INPUT_FILE.to_string()];
        match self {
            ExportKind::Trim(range) => {
                args.extend([
                    "-ss".to_string(),
                    range.start.to_string(),
                    "-to".to_string(),
                    range.end.to_string(),
                    "-c".to_string(),
                    "copy".to_string(),
                ]);
            }
            ExportKind::Crop(crop) => {
                args.extend([
                    "-vf".to_string(),
                    format!("crop={}:{}:{}:{}", crop.width, crop.height, crop.x, crop.y),
                    "-c:a".to_string(),
                    "copy".to_string(),
                ]);
            }
            ExportKind::Filter(graph) => {
                args.extend([
                    "-vf".to_string(),
                    graph.clone(),
                    "-c:a".to_string(),
                    "copy".to_string(),
                ]);
            }
        }
        args.push(OUTPUT_FILE.to_string());
        args
    }

    /// Name offered for the downloaded file.
    pub fn download_name(&self) -> String {
        match self {
            ExportKind::Trim(range) => format!(
                "trimmed-video-{}-{}.mp4",
                range.start.floor(),
                range.end.floor()
            ),
            ExportKind::Crop(crop) => format!("cropped-video-{}x{}.mp4", crop.width, crop.height),
            ExportKind::Filter(_) => "filtered_video.mp4".to_string(),
        }
    }
}
