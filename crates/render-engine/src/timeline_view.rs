//! Timeline strip composition.

use cutline_edit_model::trim::TimeRange;

use crate::scene::{DrawCommand, Rect, Rgba, Scene, Stroke};

/// Playhead line width in pixels.
const PLAYHEAD_WIDTH: f64 = 2.0;

/// Everything needed to draw one timeline frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineFrame {
    /// Container width; the canvas is resized to match.
    pub width: u32,
    /// Container height.
    pub height: u32,
    pub duration_secs: f64,
    pub current_time: f64,
    pub trim: TimeRange,
    /// Number of strip tiles to lay across the width.
    pub tile_count: u32,
    pub handle_width_px: f64,
}

impl TimelineFrame {
    fn time_to_x(&self, t: f64) -> f64 {
        t / self.duration_secs * self.width as f64
    }
}

/// Build the timeline scene: strip tiles, trim highlight, both handles,
/// then the playhead on top.
///
/// A clip without duration produces an empty scene; hosts keep whatever
/// they drew last.
pub fn compose_timeline(frame: &TimelineFrame) -> Scene {
    let mut scene = Scene::new(frame.width, frame.height);
    if frame.duration_secs <= 0.0 || frame.duration_secs.is_nan() {
        return scene;
    }

    let width = frame.width as f64;
    let height = frame.height as f64;

    scene.push(DrawCommand::Clear);

    if frame.tile_count > 0 {
        let tile_width = width / frame.tile_count as f64;
        for tile in 0..frame.tile_count {
            scene.push(DrawCommand::StripSlice {
                tile,
                dest: Rect::new(tile as f64 * tile_width, 0.0, tile_width, height),
            });
        }
    }

    let start_x = frame.time_to_x(frame.trim.start);
    let end_x = frame.time_to_x(frame.trim.end);
    scene.push(DrawCommand::FillRect {
        rect: Rect::new(start_x, 0.0, end_x - start_x, height),
        color: Rgba::TRIM_HIGHLIGHT,
    });

    let half = frame.handle_width_px / 2.0;
    for x in [start_x, end_x] {
        scene.push(DrawCommand::FillRect {
            rect: Rect::new(x - half, 0.0, frame.handle_width_px, height),
            color: Rgba::ACCENT,
        });
    }

    let playhead_x = frame.time_to_x(frame.current_time);
    scene.push(DrawCommand::Line {
        from: (playhead_x, 0.0),
        to: (playhead_x, height),
        stroke: Stroke {
            color: Rgba::RED,
            width: PLAYHEAD_WIDTH,
        },
    });

    scene
}
