//! Display lists.
//!
//! A [`Scene`] is an ordered list of 2D drawing commands in canvas pixels.
//! Commands are applied in order with source-over blending, except
//! [`DrawCommand::Clear`] and [`DrawCommand::ClearRect`], which erase to
//! transparent.

use serde::{Deserialize, Serialize};

/// Straight-alpha color. `a` is in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const RED: Rgba = Rgba::opaque(255, 0, 0);
    /// `#4a90e2`, used for trim handles and crop chrome.
    pub const ACCENT: Rgba = Rgba::opaque(0x4a, 0x90, 0xe2);
    /// Trim window highlight.
    pub const TRIM_HIGHLIGHT: Rgba = Rgba::new(0, 0, 255, 0.3);
    /// Dimming outside the crop rectangle.
    pub const CROP_MASK: Rgba = Rgba::new(0, 0, 0, 0.5);

    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// CSS notation: `#rrggbb` when opaque, `rgba(r, g, b, a)` otherwise.
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Grow (or shrink, for negative `by`) on every side.
    pub fn inflate(&self, by: f64) -> Rect {
        Rect::new(
            self.x - by,
            self.y - by,
            self.width + 2.0 * by,
            self.height + 2.0 * by,
        )
    }

    /// Whether the point lies inside, right and bottom edges excluded.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

/// Outline style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
}

/// One drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Erase the whole canvas.
    Clear,
    FillRect { rect: Rect, color: Rgba },
    /// Erase a rectangle.
    ClearRect { rect: Rect },
    /// Outline centred on the rectangle's edges.
    StrokeRect { rect: Rect, stroke: Stroke },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        stroke: Stroke,
    },
    Circle {
        center: (f64, f64),
        radius: f64,
        fill: Rgba,
        stroke: Option<Stroke>,
    },
    /// Tile `tile` of the thumbnail strip, stretched into `dest`.
    StripSlice { tile: u32, dest: Rect },
}

/// A canvas size plus the commands that paint it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}
