//! Thumbnail strip generation.
//!
//! The strip is one raster holding `tiles` equally sized tiles side by
//! side. Tile `i` shows the frame at `i * duration / tiles`, letterboxed to
//! preserve the source aspect ratio.
//!
//! Generation seeks the media source once per tile, strictly in order: a
//! seek must resolve before its frame is captured and before the next seek
//! is issued. A failed seek or capture leaves that tile blank and the pass
//! continues.

use async_trait::async_trait;
use image::imageops::{self, FilterType};
use image::RgbaImage;

use cutline_common::config::TimelineSettings;
use cutline_common::error::{CutlineError, CutlineResult};
use cutline_edit_model::media::{FrameSize, MediaInfo};

/// Tile grid of a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLayout {
    pub tiles: u32,
    pub tile_width: u32,
    pub tile_height: u32,
}

impl StripLayout {
    pub fn from_settings(settings: &TimelineSettings) -> Self {
        Self {
            tiles: settings.tile_count,
            tile_width: settings.tile_width,
            tile_height: settings.tile_height,
        }
    }

    /// Total raster width.
    pub fn strip_width(&self) -> u32 {
        self.tiles * self.tile_width
    }

    /// Left edge of tile `index` in the raster.
    pub fn tile_x(&self, index: u32) -> u32 {
        index * self.tile_width
    }

    /// Media position shown by tile `index`.
    pub fn seek_time(&self, index: u32, duration_secs: f64) -> f64 {
        if self.tiles == 0 {
            return 0.0;
        }
        index as f64 / self.tiles as f64 * duration_secs
    }

    fn is_valid(&self) -> bool {
        self.tiles > 0 && self.tile_width > 0 && self.tile_height > 0
    }
}

impl Default for StripLayout {
    fn default() -> Self {
        Self::from_settings(&TimelineSettings::default())
    }
}

/// Where a frame lands inside its tile, in tile-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Fit `source` inside a `tile_width` x `tile_height` tile.
///
/// Wider than the tile: full width, centred vertically. Otherwise: full
/// height, centred horizontally.
pub fn letterbox(source: FrameSize, tile_width: u32, tile_height: u32) -> Option<Placement> {
    let aspect = source.aspect_ratio()?;
    let tile = FrameSize::new(tile_width, tile_height).aspect_ratio()?;
    let (tw, th) = (tile_width as f64, tile_height as f64);

    let placement = if aspect > tile {
        let height = tw / aspect;
        Placement {
            offset_x: 0.0,
            offset_y: (th - height) / 2.0,
            width: tw,
            height,
        }
    } else {
        let width = th * aspect;
        Placement {
            offset_x: (tw - width) / 2.0,
            offset_y: 0.0,
            width,
            height: th,
        }
    };
    Some(placement)
}

/// A seekable video the strip is sampled from.
#[async_trait]
pub trait MediaSource: Send {
    /// Metadata; duration 0 until it has loaded.
    fn info(&self) -> MediaInfo;

    /// Move to `secs`. Resolves once the frame at that position is ready.
    async fn seek(&mut self, secs: f64) -> CutlineResult<()>;

    /// The frame at the current position.
    async fn capture_frame(&mut self) -> CutlineResult<RgbaImage>;
}

/// A finished strip. Never modified after generation returns.
#[derive(Debug, Clone)]
pub struct ThumbnailStrip {
    layout: StripLayout,
    image: RgbaImage,
    blank: Vec<bool>,
}

impl ThumbnailStrip {
    /// Fully transparent strip with every tile blank.
    pub fn empty(layout: StripLayout) -> Self {
        Self {
            layout,
            image: RgbaImage::new(layout.strip_width(), layout.tile_height),
            blank: vec![true; layout.tiles as usize],
        }
    }

    pub fn layout(&self) -> StripLayout {
        self.layout
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn is_blank(&self, index: u32) -> bool {
        self.blank.get(index as usize).copied().unwrap_or(true)
    }

    pub fn blank_count(&self) -> usize {
        self.blank.iter().filter(|b| **b).count()
    }

    pub(crate) fn draw_tile(&mut self, index: u32, frame: &RgbaImage, placement: Placement) {
        let width = placement.width.round().max(1.0) as u32;
        let height = placement.height.round().max(1.0) as u32;
        let scaled = imageops::resize(frame, width, height, FilterType::Triangle);
        let x = self.layout.tile_x(index) as i64 + placement.offset_x.round() as i64;
        let y = placement.offset_y.round() as i64;
        imageops::overlay(&mut self.image, &scaled, x, y);
        if let Some(flag) = self.blank.get_mut(index as usize) {
            *flag = false;
        }
    }
}

/// Produces strips from a media source.
#[derive(Debug, Clone, Default)]
pub struct ThumbnailGenerator {
    layout: StripLayout,
}

impl ThumbnailGenerator {
    pub fn new(layout: StripLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> StripLayout {
        self.layout
    }

    /// Run one full pass over `source`.
    ///
    /// Returning is the completion signal: the strip is complete (blank
    /// tiles included) and ready to draw.
    pub async fn generate(&self, source: &mut dyn MediaSource) -> CutlineResult<ThumbnailStrip> {
        let info = source.info();
        if !info.is_ready() {
            return Err(CutlineError::not_ready(
                "media metadata not loaded; cannot generate thumbnails",
            ));
        }
        if !self.layout.is_valid() {
            return Err(CutlineError::invalid_input(format!(
                "invalid strip layout: {:?}",
                self.layout
            )));
        }
        let placement = letterbox(
            info.frame_size(),
            self.layout.tile_width,
            self.layout.tile_height,
        )
        .ok_or_else(|| CutlineError::media("source has no frame size"))?;

        tracing::debug!(
            tiles = self.layout.tiles,
            duration_secs = info.duration_secs,
            "Generating thumbnail strip"
        );

        let mut strip = ThumbnailStrip::empty(self.layout);
        for index in 0..self.layout.tiles {
            let at = self.layout.seek_time(index, info.duration_secs);

            if let Err(e) = source.seek(at).await {
                tracing::warn!(tile = index, at_secs = at, error = %e, "Thumbnail seek failed");
                continue;
            }

            match source.capture_frame().await {
                Ok(frame) => strip.draw_tile(index, &frame, placement),
                Err(e) => {
                    tracing::warn!(tile = index, at_secs = at, error = %e, "Thumbnail capture failed");
                }
            }
        }

        tracing::info!(
            tiles = self.layout.tiles,
            blank = strip.blank_count(),
            "Thumbnail strip ready"
        );
        Ok(strip)
    }
}

/// Holds the strip for the current media and decides when to regenerate.
///
/// Keyed by media identity (for example the file path). A strip produced
/// for a key that is no longer current is dropped on arrival.
#[derive(Debug, Clone)]
pub struct StripCache<K> {
    in_flight: Option<K>,
    current: Option<(K, ThumbnailStrip)>,
}

impl<K: PartialEq + Clone> StripCache<K> {
    pub fn new() -> Self {
        Self {
            in_flight: None,
            current: None,
        }
    }

    /// Claim a generation pass for `key`. Returns false when a pass for the
    /// same key is already running or its strip is already cached.
    pub fn begin(&mut self, key: &K) -> bool {
        if self.in_flight.as_ref() == Some(key) {
            return false;
        }
        if matches!(&self.current, Some((k, _)) if k == key) {
            return false;
        }
        self.in_flight = Some(key.clone());
        true
    }

    /// Store a finished strip. Returns true when it was accepted and the
    /// timeline should redraw.
    pub fn complete(&mut self, key: &K, strip: ThumbnailStrip) -> bool {
        if self.in_flight.as_ref() != Some(key) {
            tracing::debug!("Discarding thumbnail strip for superseded media");
            return false;
        }
        self.in_flight = None;
        self.current = Some((key.clone(), strip));
        true
    }

    /// Give up on the pass for `key`, for example after an error.
    pub fn abort(&mut self, key: &K) {
        if self.in_flight.as_ref() == Some(key) {
            self.in_flight = None;
        }
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn strip(&self) -> Option<&ThumbnailStrip> {
        self.current.as_ref().map(|(_, strip)| strip)
    }

    pub fn key(&self) -> Option<&K> {
        self.current.as_ref().map(|(key, _)| key)
    }
}

impl<K: PartialEq + Clone> Default for StripCache<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Solid-color frames. The seeks numbered in `fail_seeks` and the
    /// captures numbered in `fail_captures` fail.
    struct FakeSource {
        info: MediaInfo,
        fail_seeks: Vec<usize>,
        fail_captures: Vec<usize>,
        position: f64,
        seeks: Vec<f64>,
        captures: usize,
    }

    impl FakeSource {
        fn new(info: MediaInfo) -> Self {
            Self {
                info,
                fail_seeks: Vec::new(),
                fail_captures: Vec::new(),
                position: 0.0,
                seeks: Vec::new(),
                captures: 0,
            }
        }
    }

    #[async_trait]
    impl MediaSource for FakeSource {
        fn info(&self) -> MediaInfo {
            self.info
        }

        async fn seek(&mut self, secs: f64) -> CutlineResult<()> {
            let call = self.seeks.len();
            self.seeks.push(secs);
            if self.fail_seeks.contains(&call) {
                return Err(CutlineError::capture("decoder stalled"));
            }
            self.position = secs;
            Ok(())
        }

        async fn capture_frame(&mut self) -> CutlineResult<RgbaImage> {
            let call = self.captures;
            self.captures += 1;
            if self.fail_captures.contains(&call) {
                return Err(CutlineError::capture("frame not decodable"));
            }
            let shade = (self.position * 10.0) as u8;
            Ok(RgbaImage::from_pixel(
                self.info.width,
                self.info.height,
                image::Rgba([shade, 0, 255, 255]),
            ))
        }
    }

    #[test]
    fn test_letterbox_pillarboxes_narrow_source() {
        let placement = letterbox(FrameSize::new(640, 480), 160, 90).unwrap();
        assert!((placement.width - 120.0).abs() < 1e-9);
        assert!((placement.offset_x - 20.0).abs() < 1e-9);
        assert_eq!(placement.offset_y, 0.0);
        assert_eq!(placement.height, 90.0);
    }

    #[test]
    fn test_letterbox_wide_source() {
        let placement = letterbox(FrameSize::new(2350, 1000), 160, 90).unwrap();
        assert_eq!(placement.width, 160.0);
        let expected_h = 160.0 / 2.35;
        assert!((placement.height - expected_h).abs() < 1e-9);
        assert!((placement.offset_y - (90.0 - expected_h) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_letterbox_degenerate_source() {
        assert!(letterbox(FrameSize::new(0, 480), 160, 90).is_none());
    }

    #[tokio::test]
    async fn test_sequential_seeks_and_blank_tile() {
        let mut source = FakeSource::new(MediaInfo::new(10.0, 320, 180));
        source.fail_seeks.push(4);

        let generator = ThumbnailGenerator::default();
        let strip = generator.generate(&mut source).await.unwrap();

        assert_eq!(source.seeks.len(), 10);
        for (i, at) in source.seeks.iter().enumerate() {
            assert!((at - i as f64).abs() < 1e-9);
        }
        assert_eq!(strip.image().dimensions(), (1600, 90));
        assert_eq!(strip.blank_count(), 1);
        assert!(strip.is_blank(4));
        assert!(!strip.is_blank(3));

        // Tile 4 stays transparent, tile 5 is painted.
        assert_eq!(strip.image().get_pixel(4 * 160 + 80, 45)[3], 0);
        assert_eq!(strip.image().get_pixel(5 * 160 + 80, 45)[3], 255);
    }

    #[tokio::test]
    async fn test_failed_capture_blanks_tile_and_pass_continues() {
        let mut source = FakeSource::new(MediaInfo::new(10.0, 320, 180));
        source.fail_captures.push(4);

        let strip = ThumbnailGenerator::default()
            .generate(&mut source)
            .await
            .unwrap();

        assert_eq!(source.captures, 10);
        assert_eq!(source.seeks.len(), 10);
        assert!(strip.is_blank(4));
        assert!(!strip.is_blank(5));
        assert_eq!(strip.blank_count(), 1);
        assert_eq!(strip.image().get_pixel(4 * 160 + 80, 45)[3], 0);
        assert_eq!(strip.image().get_pixel(9 * 160 + 80, 45)[3], 255);
    }

    #[tokio::test]
    async fn test_not_ready_source_is_refused() {
        let mut source = FakeSource::new(MediaInfo::new(0.0, 320, 180));
        let err = ThumbnailGenerator::default()
            .generate(&mut source)
            .await
            .unwrap_err();
        assert!(err.is_not_ready());
        assert!(source.seeks.is_empty());
    }

    #[tokio::test]
    async fn test_pillarboxed_tiles_leave_margins_clear() {
        let mut source = FakeSource::new(MediaInfo::new(5.0, 640, 480));
        let strip = ThumbnailGenerator::default()
            .generate(&mut source)
            .await
            .unwrap();
        // 4:3 in a 160x90 tile: 20px margins left and right.
        assert_eq!(strip.image().get_pixel(5, 45)[3], 0);
        assert_eq!(strip.image().get_pixel(80, 45)[3], 255);
        assert_eq!(strip.image().get_pixel(155, 45)[3], 0);
    }

    #[test]
    fn test_cache_refuses_duplicate_pass() {
        let mut cache: StripCache<String> = StripCache::new();
        let key = "a.mp4".to_string();
        assert!(cache.begin(&key));
        assert!(!cache.begin(&key));
        assert!(cache.complete(&key, ThumbnailStrip::empty(StripLayout::default())));
        assert!(!cache.begin(&key));
        assert_eq!(cache.key(), Some(&key));
    }

    #[test]
    fn test_cache_discards_superseded_strip() {
        let mut cache: StripCache<&str> = StripCache::new();
        assert!(cache.begin(&"first.mp4"));
        assert!(cache.begin(&"second.mp4"));
        let stale = ThumbnailStrip::empty(StripLayout::default());
        assert!(!cache.complete(&"first.mp4", stale));
        assert!(cache.strip().is_none());
        assert!(cache.is_generating());

        cache.abort(&"second.mp4");
        assert!(!cache.is_generating());
        assert!(cache.begin(&"second.mp4"));
    }

    proptest! {
        #[test]
        fn prop_letterbox_fits_tile(width in 1u32..8000, height in 1u32..8000) {
            let placement = letterbox(FrameSize::new(width, height), 160, 90).unwrap();
            prop_assert!(placement.offset_x >= -1e-9 && placement.offset_y >= -1e-9);
            prop_assert!(placement.offset_x + placement.width <= 160.0 + 1e-9);
            prop_assert!(placement.offset_y + placement.height <= 90.0 + 1e-9);
            let aspect = width as f64 / height as f64;
            prop_assert!((placement.width / placement.height - aspect).abs() / aspect < 1e-9);
        }
    }
}
