//! Crop overlay composition.

use cutline_edit_model::crop::{Corner, CropRect};
use cutline_edit_model::media::FrameSize;

use crate::scene::{DrawCommand, Rect, Rgba, Scene, Stroke};

const BORDER_WIDTH: f64 = 2.0;
const HANDLE_STROKE_WIDTH: f64 = 2.0;

/// Inputs for one overlay frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayFrame {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Natural size of the video under the overlay.
    pub source: FrameSize,
    /// Crop in source pixels.
    pub crop: CropRect,
    pub handle_radius_px: f64,
}

/// Build the overlay: dim everything, punch out the crop, outline it and
/// put a handle on each corner.
pub fn compose_crop_overlay(frame: &OverlayFrame) -> Scene {
    let mut scene = Scene::new(frame.canvas_width, frame.canvas_height);
    if !frame.source.is_valid() {
        return scene;
    }

    let canvas_w = frame.canvas_width as f64;
    let canvas_h = frame.canvas_height as f64;
    let scale_x = canvas_w / frame.source.width as f64;
    let scale_y = canvas_h / frame.source.height as f64;
    let shown = frame.crop.scaled(scale_x, scale_y);
    let shown_rect = Rect::new(shown.x, shown.y, shown.width, shown.height);

    scene.push(DrawCommand::Clear);
    scene.push(DrawCommand::FillRect {
        rect: Rect::new(0.0, 0.0, canvas_w, canvas_h),
        color: Rgba::CROP_MASK,
    });
    scene.push(DrawCommand::ClearRect { rect: shown_rect });
    scene.push(DrawCommand::StrokeRect {
        rect: shown_rect,
        stroke: Stroke {
            color: Rgba::ACCENT,
            width: BORDER_WIDTH,
        },
    });

    for corner in Corner::ALL {
        scene.push(DrawCommand::Circle {
            center: shown.corner_point(corner),
            radius: frame.handle_radius_px,
            fill: Rgba::ACCENT,
            stroke: Some(Stroke {
                color: Rgba::WHITE,
                width: HANDLE_STROKE_WIDTH,
            }),
        });
    }

    scene
}
