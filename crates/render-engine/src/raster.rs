//! Software rasterizer for scenes.
//!
//! Shapes are drawn with `imageproc` onto a [`Blend`] canvas, so
//! translucent colors composite source-over. Rectangles snap to whole
//! pixels. Good enough for previews and for checking composition in tests.

use std::path::Path;

use cutline_common::error::{CutlineError, CutlineResult};
use image::{Pixel, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut, draw_hollow_rect_mut,
    draw_line_segment_mut, Blend,
};
use imageproc::rect::Rect as PixelRect;

use crate::scene::{DrawCommand, Rect, Rgba, Scene, Stroke};
use crate::thumbnails::ThumbnailStrip;

const TRANSPARENT: image::Rgba<u8> = image::Rgba([0, 0, 0, 0]);

type Canvas = Blend<RgbaImage>;

/// Paint `scene` into a new image. Strip slices are skipped when no strip
/// is available yet.
pub fn rasterize(scene: &Scene, strip: Option<&ThumbnailStrip>) -> RgbaImage {
    let mut canvas = Blend(RgbaImage::new(scene.width, scene.height));
    for command in &scene.commands {
        match command {
            DrawCommand::Clear => {
                for pixel in canvas.0.pixels_mut() {
                    *pixel = TRANSPARENT;
                }
            }
            DrawCommand::FillRect { rect, color } => {
                if let Some(area) = pixel_rect(*rect) {
                    draw_filled_rect_mut(&mut canvas, area, to_pixel(*color));
                }
            }
            DrawCommand::ClearRect { rect } => clear_rect(&mut canvas.0, *rect),
            DrawCommand::StrokeRect { rect, stroke } => stroke_rect(&mut canvas, *rect, *stroke),
            DrawCommand::Line { from, to, stroke } => line(&mut canvas, *from, *to, *stroke),
            DrawCommand::Circle {
                center,
                radius,
                fill,
                stroke,
            } => circle(&mut canvas, *center, *radius, *fill, *stroke),
            DrawCommand::StripSlice { tile, dest } => {
                if let Some(strip) = strip {
                    strip_slice(&mut canvas.0, strip, *tile, *dest);
                }
            }
        }
    }
    canvas.0
}

/// Paint `scene` as a layer over a copy of `base`, e.g. the crop overlay
/// over a captured video frame. The scene is drawn at `base`'s size.
pub fn rasterize_over(
    base: &RgbaImage,
    scene: &Scene,
    strip: Option<&ThumbnailStrip>,
) -> RgbaImage {
    let mut sized = scene.clone();
    (sized.width, sized.height) = base.dimensions();
    let layer = rasterize(&sized, strip);
    let mut out = base.clone();
    image::imageops::overlay(&mut out, &layer, 0, 0);
    out
}

/// Encode `image` as PNG at `path`.
pub fn write_png(image: &RgbaImage, path: &Path) -> CutlineResult<()> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| CutlineError::render(format!("cannot write {}: {e}", path.display())))
}

fn to_pixel(color: Rgba) -> image::Rgba<u8> {
    let alpha = (color.a.clamp(0.0, 1.0) * 255.0).round() as u8;
    image::Rgba([color.r, color.g, color.b, alpha])
}

/// Snap to whole pixels. `None` when nothing is left to draw.
fn pixel_rect(rect: Rect) -> Option<PixelRect> {
    let x0 = rect.x.round();
    let y0 = rect.y.round();
    let width = rect.right().round() - x0;
    let height = rect.bottom().round() - y0;
    if !(width >= 1.0 && height >= 1.0) {
        return None;
    }
    Some(PixelRect::at(x0 as i32, y0 as i32).of_size(width as u32, height as u32))
}

/// Stroke width in whole pixels, at least one.
fn stroke_px(stroke: Stroke) -> u32 {
    stroke.width.round().max(1.0) as u32
}

/// Pixel index range whose centres fall in `[lo, hi)`.
fn span(lo: f64, hi: f64, limit: u32) -> std::ops::Range<u32> {
    let start = (lo - 0.5).ceil().max(0.0);
    let end = (hi - 0.5).ceil().max(0.0);
    let start = start.min(limit as f64) as u32;
    let end = end.min(limit as f64) as u32;
    start..end.max(start)
}

fn clear_rect(canvas: &mut RgbaImage, rect: Rect) {
    let (w, h) = canvas.dimensions();
    for y in span(rect.y, rect.bottom(), h) {
        for x in span(rect.x, rect.right(), w) {
            canvas.put_pixel(x, y, TRANSPARENT);
        }
    }
}

/// Nested one-pixel outlines, centred on the rectangle's edges.
fn stroke_rect(canvas: &mut Canvas, rect: Rect, stroke: Stroke) {
    let color = to_pixel(stroke.color);
    let outer = rect.inflate(stroke.width / 2.0);
    for ring in 0..stroke_px(stroke) {
        if let Some(outline) = pixel_rect(outer.inflate(-(ring as f64))) {
            draw_hollow_rect_mut(canvas, outline, color);
        }
    }
}

/// Parallel one-pixel segments spread across the stroke width.
fn line(canvas: &mut Canvas, from: (f64, f64), to: (f64, f64), stroke: Stroke) {
    let color = to_pixel(stroke.color);
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = dx.hypot(dy);
    let (nx, ny) = if len == 0.0 { (1.0, 0.0) } else { (-dy / len, dx / len) };

    let count = stroke_px(stroke);
    for k in 0..count {
        let offset = k as f64 - (count as f64 - 1.0) / 2.0;
        let (ox, oy) = (nx * offset, ny * offset);
        draw_line_segment_mut(
            canvas,
            ((from.0 + ox) as f32, (from.1 + oy) as f32),
            ((to.0 + ox) as f32, (to.1 + oy) as f32),
            color,
        );
    }
}

fn circle(
    canvas: &mut Canvas,
    center: (f64, f64),
    radius: f64,
    fill: Rgba,
    stroke: Option<Stroke>,
) {
    let c = (center.0.round() as i32, center.1.round() as i32);
    let r = radius.round().max(0.0) as i32;
    draw_filled_circle_mut(canvas, c, r, to_pixel(fill));

    if let Some(stroke) = stroke {
        let color = to_pixel(stroke.color);
        let outer = (radius + stroke.width / 2.0).round() as i32;
        for ring in 0..stroke_px(stroke) as i32 {
            let ring_radius = outer - ring;
            if ring_radius > 0 {
                draw_hollow_circle_mut(canvas, c, ring_radius, color);
            }
        }
    }
}

/// Nearest-neighbour copy of one strip tile into `dest`.
fn strip_slice(canvas: &mut RgbaImage, strip: &ThumbnailStrip, tile: u32, dest: Rect) {
    let layout = strip.layout();
    if tile >= layout.tiles || dest.width <= 0.0 || dest.height <= 0.0 {
        return;
    }
    let source = strip.image();
    let tile_x = layout.tile_x(tile);
    let (w, h) = canvas.dimensions();

    for y in span(dest.y, dest.bottom(), h) {
        let v = ((y as f64 + 0.5 - dest.y) / dest.height).clamp(0.0, 1.0);
        let sy = ((v * layout.tile_height as f64) as u32).min(layout.tile_height - 1);
        for x in span(dest.x, dest.right(), w) {
            let u = ((x as f64 + 0.5 - dest.x) / dest.width).clamp(0.0, 1.0);
            let sx = ((u * layout.tile_width as f64) as u32).min(layout.tile_width - 1);
            let texel = source.get_pixel(tile_x + sx, sy);
            canvas.get_pixel_mut(x, y).blend(texel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop_view::{compose_crop_overlay, OverlayFrame};
    use crate::thumbnails::{Placement, StripLayout};
    use crate::timeline_view::{compose_timeline, TimelineFrame};
    use cutline_edit_model::crop::CropRect;
    use cutline_edit_model::media::FrameSize;
    use cutline_edit_model::trim::TimeRange;

    fn timeline_frame() -> TimelineFrame {
        TimelineFrame {
            width: 200,
            height: 20,
            duration_secs: 100.0,
            current_time: 50.0,
            trim: TimeRange {
                start: 20.0,
                end: 80.0,
            },
            tile_count: 10,
            handle_width_px: 10.0,
        }
    }

    #[test]
    fn test_timeline_raster_colors() {
        let image = rasterize(&compose_timeline(&timeline_frame()), None);
        assert_eq!(image.dimensions(), (200, 20));

        // Playhead at x = 100.
        assert_eq!(*image.get_pixel(100, 10), image::Rgba([255, 0, 0, 255]));
        // Start handle centred at x = 40.
        assert_eq!(*image.get_pixel(40, 10), image::Rgba([0x4a, 0x90, 0xe2, 255]));
        // Highlight only, over a transparent canvas.
        let inside = image.get_pixel(60, 10);
        assert_eq!(inside[2], 255);
        assert!((76..=77).contains(&inside[3]));
        // Outside the trim window nothing was drawn.
        assert_eq!(image.get_pixel(5, 10)[3], 0);
    }

    #[test]
    fn test_strip_slices_are_stretched() {
        let layout = StripLayout {
            tiles: 2,
            tile_width: 4,
            tile_height: 2,
        };
        let mut strip = ThumbnailStrip::empty(layout);
        let frame = RgbaImage::from_pixel(8, 4, image::Rgba([0, 200, 0, 255]));
        strip.draw_tile(
            1,
            &frame,
            Placement {
                offset_x: 0.0,
                offset_y: 0.0,
                width: 4.0,
                height: 2.0,
            },
        );

        let mut scene = Scene::new(40, 10);
        scene.push(DrawCommand::StripSlice {
            tile: 1,
            dest: Rect::new(20.0, 0.0, 20.0, 10.0),
        });
        scene.push(DrawCommand::StripSlice {
            tile: 0,
            dest: Rect::new(0.0, 0.0, 20.0, 10.0),
        });
        let image = rasterize(&scene, Some(&strip));
        assert_eq!(*image.get_pixel(30, 5), image::Rgba([0, 200, 0, 255]));
        assert_eq!(image.get_pixel(10, 5)[3], 0);
    }

    #[test]
    fn test_crop_overlay_masks_outside_only() {
        let scene = compose_crop_overlay(&OverlayFrame {
            canvas_width: 100,
            canvas_height: 100,
            source: FrameSize::new(1000, 1000),
            crop: CropRect::new(200.0, 200.0, 600.0, 600.0),
            handle_radius_px: 6.0,
        });
        let image = rasterize(&scene, None);
        assert_eq!(*image.get_pixel(5, 50), image::Rgba([0, 0, 0, 128]));
        assert_eq!(image.get_pixel(50, 50)[3], 0);
        // Border on the left edge at x = 20.
        assert_eq!(*image.get_pixel(20, 50), image::Rgba([0x4a, 0x90, 0xe2, 255]));
        // Handle centre at (80, 80).
        assert_eq!(*image.get_pixel(80, 80), image::Rgba([0x4a, 0x90, 0xe2, 255]));
    }

    #[test]
    fn test_translucent_fill_over_opaque() {
        let mut scene = Scene::new(4, 4);
        scene.push(DrawCommand::FillRect {
            rect: Rect::new(0.0, 0.0, 4.0, 4.0),
            color: Rgba::WHITE,
        });
        scene.push(DrawCommand::FillRect {
            rect: Rect::new(0.0, 0.0, 2.0, 4.0),
            color: Rgba::new(0, 0, 0, 0.5),
        });
        let image = rasterize(&scene, None);
        let dimmed = image.get_pixel(1, 1);
        assert!((125..=129).contains(&dimmed[0]));
        assert_eq!(dimmed[3], 255);
        assert_eq!(*image.get_pixel(3, 1), image::Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_crop_overlay_over_frame_dims_only_outside() {
        let frame = RgbaImage::from_pixel(100, 100, image::Rgba([200, 200, 200, 255]));
        let scene = compose_crop_overlay(&OverlayFrame {
            canvas_width: 100,
            canvas_height: 100,
            source: FrameSize::new(1000, 1000),
            crop: CropRect::new(200.0, 200.0, 600.0, 600.0),
            handle_radius_px: 6.0,
        });
        let preview = rasterize_over(&frame, &scene, None);

        assert_eq!(*preview.get_pixel(50, 50), image::Rgba([200, 200, 200, 255]));
        let dimmed = preview.get_pixel(5, 50);
        assert!((95..=105).contains(&dimmed[0]));
        assert_eq!(dimmed[3], 255);
        assert_eq!(*preview.get_pixel(20, 50), image::Rgba([0x4a, 0x90, 0xe2, 255]));
    }

    #[test]
    fn test_write_png_reports_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let image = RgbaImage::new(2, 2);

        let path = dir.path().join("ok.png");
        write_png(&image, &path).unwrap();
        assert!(path.exists());

        let err = write_png(&image, &dir.path().join("missing/out.png")).unwrap_err();
        assert!(matches!(err, CutlineError::Render { .. }));
    }

    #[test]
    fn test_degenerate_shapes_are_skipped() {
        let mut scene = Scene::new(8, 8);
        scene.push(DrawCommand::FillRect {
            rect: Rect::new(2.0, 2.0, 0.0, 5.0),
            color: Rgba::RED,
        });
        scene.push(DrawCommand::FillRect {
            rect: Rect::new(f64::NAN, 0.0, 3.0, 3.0),
            color: Rgba::RED,
        });
        let image = rasterize(&scene, None);
        assert!(image.pixels().all(|p| p[3] == 0));
    }
}
