//! Crop rectangle and its undo history.
//!
//! All coordinates are source pixels: `(0, 0)` is the top-left of the
//! decoded frame, `(width, height)` its bottom-right.

use serde::{Deserialize, Serialize};

use crate::media::FrameSize;

/// Smallest crop width and height, in source pixels.
pub const MIN_CROP_SIZE: f64 = 100.0;

/// One of the four draggable corners of a crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Hit-test order. The first corner that matches wins.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }
}

/// A rectangle in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A crop rectangle rounded down to whole pixels, as handed to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelCrop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole frame (no crop).
    pub fn full(size: FrameSize) -> Self {
        Self::new(0.0, 0.0, size.width as f64, size.height as f64)
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Position of a corner.
    pub fn corner_point(&self, corner: Corner) -> (f64, f64) {
        match corner {
            Corner::TopLeft => (self.x, self.y),
            Corner::TopRight => (self.right(), self.y),
            Corner::BottomLeft => (self.x, self.bottom()),
            Corner::BottomRight => (self.right(), self.bottom()),
        }
    }

    /// Multiply every component by the given axis scale.
    pub fn scaled(&self, scale_x: f64, scale_y: f64) -> CropRect {
        CropRect {
            x: self.x * scale_x,
            y: self.y * scale_y,
            width: self.width * scale_x,
            height: self.height * scale_y,
        }
    }

    /// Whether the rectangle lies inside the frame and meets the minimum size.
    pub fn is_valid_within(&self, bounds: FrameSize) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.width >= MIN_CROP_SIZE
            && self.height >= MIN_CROP_SIZE
            && self.right() <= bounds.width as f64
            && self.bottom() <= bounds.height as f64
    }

    /// Drag `corner` toward `pointer` (source pixels) and return the result.
    ///
    /// The two corners not on the grabbed corner's edges stay where they
    /// are. Width and height never drop below [`MIN_CROP_SIZE`] and the
    /// rectangle never leaves `bounds`.
    pub fn resize_from(&self, corner: Corner, pointer: (f64, f64), bounds: FrameSize) -> CropRect {
        let (mouse_x, mouse_y) = pointer;
        let source_w = bounds.width as f64;
        let source_h = bounds.height as f64;
        let mut next = *self;

        match corner {
            Corner::TopLeft => {
                next.x = clamp_floor_wins(mouse_x, 0.0, self.right() - MIN_CROP_SIZE);
                next.y = clamp_floor_wins(mouse_y, 0.0, self.bottom() - MIN_CROP_SIZE);
                next.width = self.right() - next.x;
                next.height = self.bottom() - next.y;
            }
            Corner::TopRight => {
                next.y = clamp_floor_wins(mouse_y, 0.0, self.bottom() - MIN_CROP_SIZE);
                next.width =
                    clamp_floor_wins(mouse_x - self.x, MIN_CROP_SIZE, source_w - self.x);
                next.height = self.bottom() - next.y;
            }
            Corner::BottomLeft => {
                next.x = clamp_floor_wins(mouse_x, 0.0, self.right() - MIN_CROP_SIZE);
                next.width = self.right() - next.x;
                next.height =
                    clamp_floor_wins(mouse_y - self.y, MIN_CROP_SIZE, source_h - self.y);
            }
            Corner::BottomRight => {
                next.width =
                    clamp_floor_wins(mouse_x - self.x, MIN_CROP_SIZE, source_w - self.x);
                next.height =
                    clamp_floor_wins(mouse_y - self.y, MIN_CROP_SIZE, source_h - self.y);
            }
        }

        next
    }

    /// Round down to whole pixels.
    pub fn to_pixels(&self) -> PixelCrop {
        PixelCrop {
            x: self.x.max(0.0).floor() as u32,
            y: self.y.max(0.0).floor() as u32,
            width: self.width.max(0.0).floor() as u32,
            height: self.height.max(0.0).floor() as u32,
        }
    }
}

impl Default for CropRect {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// `max(lo, min(v, hi))`: when the bounds cross, the lower bound wins
/// instead of panicking like `f64::clamp`.
fn clamp_floor_wins(v: f64, lo: f64, hi: f64) -> f64 {
    v.min(hi).max(lo)
}

/// Snapshots of earlier crop rectangles, most recent last.
///
/// A snapshot is pushed right before each corner drag starts. Undo pops
/// the last one; there is no redo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CropHistory {
    entries: Vec<CropRect>,
}

impl CropHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything and start over from the rectangle of a newly
    /// loaded clip.
    pub fn reseed(&mut self, initial: CropRect) {
        self.entries.clear();
        self.entries.push(initial);
    }

    pub fn push(&mut self, snapshot: CropRect) {
        self.entries.push(snapshot);
    }

    pub fn pop(&mut self) -> Option<CropRect> {
        self.entries.pop()
    }

    pub fn last(&self) -> Option<&CropRect> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
