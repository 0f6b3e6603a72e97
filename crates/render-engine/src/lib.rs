//! Cutline Render Engine
//!
//! Everything the editor draws, expressed as data first:
//!
//! ```text
//! MediaSource ──seek/capture──▶ ThumbnailGenerator ──▶ ThumbnailStrip
//!                                                           │
//! trim, playhead ──▶ compose_timeline ──▶ Scene ──┐         │
//!                                                 ├── rasterize ──▶ RgbaImage
//! crop rect ──────▶ compose_crop_overlay ─▶ Scene ┘
//! ```
//!
//! Hosts with their own canvas replay the [`Scene`] commands directly;
//! [`raster::rasterize`] exists for headless previews.

pub mod crop_view;
pub mod raster;
pub mod scene;
pub mod thumbnails;
pub mod timeline_view;

pub use crop_view::{compose_crop_overlay, OverlayFrame};
pub use raster::{rasterize, rasterize_over, write_png};
pub use scene::{DrawCommand, Rect, Rgba, Scene, Stroke};
pub use thumbnails::{
    letterbox, MediaSource, Placement, StripCache, StripLayout, ThumbnailGenerator,
    ThumbnailStrip,
};
pub use timeline_view::{compose_timeline, TimelineFrame};
