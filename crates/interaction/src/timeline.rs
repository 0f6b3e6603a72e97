//! Timeline strip interaction: trim handles and click-to-seek.
//!
//! # State machine
//!
//! ```text
//!            down near start            down near end
//!   Idle ─────────────────────▶ DraggingStart   Idle ─────────────▶ DraggingEnd
//!    ▲  │ down elsewhere: seek            │                              │
//!    │  └──────────▶ Idle                 │ up / leave                   │ up / leave
//!    └────────────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! The start handle is tested before the end handle, so it wins when both
//! are within reach.

use cutline_edit_model::trim::TimeRange;

/// Default grab tolerance around a handle, in pixels.
pub const DEFAULT_HANDLE_TOLERANCE_PX: f64 = 10.0;

/// Linear mapping between timeline pixels and clip seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineGeometry {
    /// Canvas width in pixels.
    pub width: f64,
    /// Clip duration in seconds.
    pub duration_secs: f64,
}

impl TimelineGeometry {
    pub fn new(width: f64, duration_secs: f64) -> Self {
        Self {
            width,
            duration_secs,
        }
    }

    /// Both axes are non-degenerate.
    pub fn is_usable(&self) -> bool {
        self.width > 0.0 && self.duration_secs > 0.0
    }

    /// Pixel position of time `t`.
    pub fn time_to_x(&self, t: f64) -> f64 {
        if !self.is_usable() {
            return 0.0;
        }
        t / self.duration_secs * self.width
    }

    /// Time under pixel `x`, always within `[0, duration]`.
    pub fn x_to_time(&self, x: f64) -> f64 {
        if !self.is_usable() || x.is_nan() {
            return 0.0;
        }
        (x / self.width).clamp(0.0, 1.0) * self.duration_secs
    }
}

/// Which trim handle, if any, is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimelineDrag {
    #[default]
    Idle,
    DraggingStart,
    DraggingEnd,
}

/// An edit the timeline asks the editor to make.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineRequest {
    /// Move the playhead (and the media position) to this time.
    Seek(f64),
    /// Move trim start toward this time.
    SetTrimStart(f64),
    /// Move trim end toward this time.
    SetTrimEnd(f64),
}

/// Pointer state machine for the timeline strip.
#[derive(Debug, Clone)]
pub struct TimelineInteraction {
    drag: TimelineDrag,
    handle_tolerance_px: f64,
}

impl TimelineInteraction {
    pub fn new(handle_tolerance_px: f64) -> Self {
        Self {
            drag: TimelineDrag::Idle,
            handle_tolerance_px,
        }
    }

    pub fn drag(&self) -> TimelineDrag {
        self.drag
    }

    /// Pointer pressed at `x` (pixels from the canvas' left edge).
    pub fn pointer_down(
        &mut self,
        x: f64,
        geometry: TimelineGeometry,
        trim: &TimeRange,
    ) -> Option<TimelineRequest> {
        if !geometry.is_usable() {
            tracing::debug!("Timeline pointer ignored: no duration or width");
            return None;
        }

        let start_x = geometry.time_to_x(trim.start);
        let end_x = geometry.time_to_x(trim.end);

        if (x - start_x).abs() < self.handle_tolerance_px {
            self.drag = TimelineDrag::DraggingStart;
            None
        } else if (x - end_x).abs() < self.handle_tolerance_px {
            self.drag = TimelineDrag::DraggingEnd;
            None
        } else {
            Some(TimelineRequest::Seek(geometry.x_to_time(x)))
        }
    }

    /// Pointer moved to `x`. Only produces a request while a handle is held.
    pub fn pointer_move(&mut self, x: f64, geometry: TimelineGeometry) -> Option<TimelineRequest> {
        if !geometry.is_usable() {
            return None;
        }
        let candidate = geometry.x_to_time(x);
        match self.drag {
            TimelineDrag::Idle => None,
            TimelineDrag::DraggingStart => Some(TimelineRequest::SetTrimStart(candidate)),
            TimelineDrag::DraggingEnd => Some(TimelineRequest::SetTrimEnd(candidate)),
        }
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) {
        self.drag = TimelineDrag::Idle;
    }

    /// Pointer left the canvas; same as a release.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }
}

impl Default for TimelineInteraction {
    fn default() -> Self {
        Self::new(DEFAULT_HANDLE_TOLERANCE_PX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_click_seeks_proportionally() {
        let geometry = TimelineGeometry::new(800.0, 100.0);
        let trim = TimeRange { start: 10.0, end: 90.0 };
        let mut timeline = TimelineInteraction::default();
        let request = timeline.pointer_down(200.0, geometry, &trim);
        assert_eq!(request, Some(TimelineRequest::Seek(25.0)));
        assert_eq!(timeline.drag(), TimelineDrag::Idle);
    }

    #[test]
    fn test_grab_start_handle() {
        let geometry = TimelineGeometry::new(1000.0, 100.0);
        let trim = TimeRange { start: 10.0, end: 90.0 };
        let mut timeline = TimelineInteraction::default();
        assert!(timeline.pointer_down(105.0, geometry, &trim).is_none());
        assert_eq!(timeline.drag(), TimelineDrag::DraggingStart);
        assert_eq!(
            timeline.pointer_move(300.0, geometry),
            Some(TimelineRequest::SetTrimStart(30.0))
        );
    }

    #[test]
    fn test_grab_end_handle() {
        let geometry = TimelineGeometry::new(1000.0, 100.0);
        let trim = TimeRange { start: 10.0, end: 90.0 };
        let mut timeline = TimelineInteraction::default();
        timeline.pointer_down(893.0, geometry, &trim);
        assert_eq!(timeline.drag(), TimelineDrag::DraggingEnd);
    }

    #[test]
    fn test_start_handle_wins_when_overlapping() {
        let geometry = TimelineGeometry::new(1000.0, 100.0);
        let trim = TimeRange { start: 50.0, end: 50.0 };
        let mut timeline = TimelineInteraction::default();
        timeline.pointer_down(500.0, geometry, &trim);
        assert_eq!(timeline.drag(), TimelineDrag::DraggingStart);
    }

    #[test]
    fn test_leave_ends_drag() {
        let geometry = TimelineGeometry::new(1000.0, 100.0);
        let trim = TimeRange { start: 10.0, end: 90.0 };
        let mut timeline = TimelineInteraction::default();
        timeline.pointer_down(900.0, geometry, &trim);
        timeline.pointer_leave();
        assert_eq!(timeline.drag(), TimelineDrag::Idle);
        assert!(timeline.pointer_move(100.0, geometry).is_none());
    }

    #[test]
    fn test_zero_duration_is_ignored() {
        let geometry = TimelineGeometry::new(1000.0, 0.0);
        let mut timeline = TimelineInteraction::default();
        assert!(timeline
            .pointer_down(10.0, geometry, &TimeRange::full(0.0))
            .is_none());
        assert_eq!(timeline.drag(), TimelineDrag::Idle);
    }

    #[test]
    fn test_out_of_canvas_seek_is_clamped() {
        let geometry = TimelineGeometry::new(400.0, 60.0);
        assert_eq!(geometry.x_to_time(-50.0), 0.0);
        assert_eq!(geometry.x_to_time(900.0), 60.0);
    }

    proptest! {
        #[test]
        fn prop_seek_time_is_linear_and_bounded(
            duration in 0.01f64..10_000.0,
            width in 1.0f64..4000.0,
            fraction in 0.0f64..=1.0,
        ) {
            let geometry = TimelineGeometry::new(width, duration);
            let x = fraction * width;
            let t = geometry.x_to_time(x);
            prop_assert!((0.0..=duration).contains(&t));
            prop_assert!((t - (x / width).clamp(0.0, 1.0) * duration).abs() < 1e-9);
        }
    }
}
