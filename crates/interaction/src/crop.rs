//! Crop overlay interaction: corner hit testing and drag-to-resize.
//!
//! The overlay canvas is usually smaller than the source frame. Pointer
//! positions arrive in canvas pixels; the crop rectangle lives in source
//! pixels. [`OverlayGeometry`] converts between the two.

use cutline_edit_model::crop::{Corner, CropRect};
use cutline_edit_model::media::FrameSize;

/// Default corner handle radius, in canvas pixels.
pub const DEFAULT_HANDLE_RADIUS_PX: f64 = 6.0;

/// Canvas size plus the natural size of the frame shown on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayGeometry {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub source: FrameSize,
}

impl OverlayGeometry {
    pub fn new(canvas_width: f64, canvas_height: f64, source: FrameSize) -> Self {
        Self {
            canvas_width,
            canvas_height,
            source,
        }
    }

    /// Whether both the canvas and the source have an area.
    pub fn is_usable(&self) -> bool {
        self.canvas_width > 0.0 && self.canvas_height > 0.0 && self.source.is_valid()
    }

    /// Canvas pixels per source pixel, `(x, y)`.
    pub fn scale(&self) -> (f64, f64) {
        if !self.is_usable() {
            return (0.0, 0.0);
        }
        (
            self.canvas_width / self.source.width as f64,
            self.canvas_height / self.source.height as f64,
        )
    }

    /// Canvas point to source point.
    pub fn to_source(&self, canvas_x: f64, canvas_y: f64) -> (f64, f64) {
        let (sx, sy) = self.scale();
        if sx == 0.0 || sy == 0.0 {
            return (0.0, 0.0);
        }
        (canvas_x / sx, canvas_y / sy)
    }

    /// Source rectangle as drawn on the canvas.
    pub fn to_canvas(&self, rect: &CropRect) -> CropRect {
        let (sx, sy) = self.scale();
        rect.scaled(sx, sy)
    }
}

/// Overlay drag state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropDrag {
    #[default]
    Idle,
    Cropping(Corner),
}

/// An edit the overlay asks the editor to make.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropRequest {
    /// A corner drag is starting. The editor records `snapshot` for undo.
    BeginResize { corner: Corner, snapshot: CropRect },
    /// Replace the current crop.
    Resize(CropRect),
}

/// Pointer state machine for the crop overlay.
#[derive(Debug, Clone)]
pub struct CropInteraction {
    drag: CropDrag,
    handle_radius_px: f64,
}

impl CropInteraction {
    pub fn new(handle_radius_px: f64) -> Self {
        Self {
            drag: CropDrag::Idle,
            handle_radius_px,
        }
    }

    pub fn drag(&self) -> CropDrag {
        self.drag
    }

    /// First corner whose handle covers the canvas point, in
    /// [`Corner::ALL`] order.
    pub fn hit_test(
        &self,
        canvas_x: f64,
        canvas_y: f64,
        geometry: OverlayGeometry,
        crop: &CropRect,
    ) -> Option<Corner> {
        if !geometry.is_usable() {
            return None;
        }
        let on_canvas = geometry.to_canvas(crop);
        Corner::ALL.into_iter().find(|&corner| {
            let (hx, hy) = on_canvas.corner_point(corner);
            (canvas_x - hx).abs() <= self.handle_radius_px
                && (canvas_y - hy).abs() <= self.handle_radius_px
        })
    }

    /// Pointer pressed. Grabbing a corner starts a resize.
    pub fn pointer_down(
        &mut self,
        canvas_x: f64,
        canvas_y: f64,
        geometry: OverlayGeometry,
        crop: &CropRect,
    ) -> Option<CropRequest> {
        let corner = self.hit_test(canvas_x, canvas_y, geometry, crop)?;
        tracing::debug!(corner = corner.as_str(), "Crop resize started");
        self.drag = CropDrag::Cropping(corner);
        Some(CropRequest::BeginResize {
            corner,
            snapshot: *crop,
        })
    }

    /// Pointer moved. Produces the resized crop while a corner is held.
    pub fn pointer_move(
        &mut self,
        canvas_x: f64,
        canvas_y: f64,
        geometry: OverlayGeometry,
        crop: &CropRect,
    ) -> Option<CropRequest> {
        let CropDrag::Cropping(corner) = self.drag else {
            return None;
        };
        if !geometry.is_usable() {
            return None;
        }
        let pointer = geometry.to_source(canvas_x, canvas_y);
        Some(CropRequest::Resize(crop.resize_from(
            corner,
            pointer,
            geometry.source,
        )))
    }

    pub fn pointer_up(&mut self) {
        self.drag = CropDrag::Idle;
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }
}

impl Default for CropInteraction {
    fn default() -> Self {
        Self::new(DEFAULT_HANDLE_RADIUS_PX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> OverlayGeometry {
        // Half-scale canvas for a 1920x1080 source.
        OverlayGeometry::new(960.0, 540.0, FrameSize::new(1920, 1080))
    }

    #[test]
    fn test_hit_test_within_radius() {
        let crop = CropRect::new(200.0, 100.0, 800.0, 600.0);
        let overlay = CropInteraction::default();
        // Top-left is drawn at (100, 50).
        assert_eq!(
            overlay.hit_test(106.0, 44.0, geometry(), &crop),
            Some(Corner::TopLeft)
        );
        assert_eq!(overlay.hit_test(107.0, 50.0, geometry(), &crop), None);
        // Bottom-right is drawn at (500, 350).
        assert_eq!(
            overlay.hit_test(498.0, 352.0, geometry(), &crop),
            Some(Corner::BottomRight)
        );
    }

    #[test]
    fn test_hit_order_prefers_top_left() {
        // Collapsed rect on canvas: every corner lands within one radius.
        let crop = CropRect::new(0.0, 0.0, 4.0, 4.0);
        let overlay = CropInteraction::default();
        assert_eq!(
            overlay.hit_test(1.0, 1.0, geometry(), &crop),
            Some(Corner::TopLeft)
        );
    }

    #[test]
    fn test_miss_keeps_idle() {
        let crop = CropRect::new(200.0, 100.0, 800.0, 600.0);
        let mut overlay = CropInteraction::default();
        assert!(overlay.pointer_down(300.0, 200.0, geometry(), &crop).is_none());
        assert_eq!(overlay.drag(), CropDrag::Idle);
        assert!(overlay.pointer_move(0.0, 0.0, geometry(), &crop).is_none());
    }

    #[test]
    fn test_drag_bottom_right_in_source_space() {
        let crop = CropRect::new(0.0, 0.0, 1000.0, 1000.0);
        let mut overlay = CropInteraction::default();
        let begin = overlay.pointer_down(500.0, 500.0, geometry(), &crop);
        assert_eq!(
            begin,
            Some(CropRequest::BeginResize {
                corner: Corner::BottomRight,
                snapshot: crop,
            })
        );

        // Canvas (25, 25) is source (50, 50): clamps to the minimum size.
        let resized = overlay.pointer_move(25.0, 25.0, geometry(), &crop);
        assert_eq!(
            resized,
            Some(CropRequest::Resize(CropRect::new(0.0, 0.0, 100.0, 100.0)))
        );

        overlay.pointer_up();
        assert_eq!(overlay.drag(), CropDrag::Idle);
    }

    #[test]
    fn test_zero_sized_source_is_ignored() {
        let crop = CropRect::default();
        let mut overlay = CropInteraction::default();
        let empty = OverlayGeometry::new(640.0, 360.0, FrameSize::new(0, 0));
        assert!(overlay.pointer_down(0.0, 0.0, empty, &crop).is_none());
    }

    #[test]
    fn test_geometry_round_trip_point() {
        let (x, y) = geometry().to_source(480.0, 270.0);
        assert_eq!((x, y), (960.0, 540.0));
    }
}
