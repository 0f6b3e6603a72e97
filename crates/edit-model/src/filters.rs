//! Cosmetic filter parameters.
//!
//! Eight numeric parameters, each with a range and a neutral value. The
//! same state feeds two outputs:
//! - a CSS-style chain for the live preview (`brightness(1.2) blur(3px)`)
//! - an ffmpeg filter graph for export (`eq=brightness=0.2,boxblur=3`)
//!
//! Both only mention parameters that are away from neutral.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Values closer than this to neutral count as neutral.
const NEUTRAL_EPSILON: f64 = 1e-9;

/// Classic sepia tone matrix for `colorchannelmixer`.
const SEPIA_MATRIX: &str = ".393:.769:.189:0:.349:.686:.168:0:.272:.534:.131";

/// A filter parameter. Declaration order is the fixed output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterParam {
    Brightness,
    Contrast,
    Saturation,
    Blur,
    Sepia,
    Grayscale,
    Invert,
    Hue,
}

impl FilterParam {
    pub const ALL: [FilterParam; 8] = [
        FilterParam::Brightness,
        FilterParam::Contrast,
        FilterParam::Saturation,
        FilterParam::Blur,
        FilterParam::Sepia,
        FilterParam::Grayscale,
        FilterParam::Invert,
        FilterParam::Hue,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterParam::Brightness => "brightness",
            FilterParam::Contrast => "contrast",
            FilterParam::Saturation => "saturation",
            FilterParam::Blur => "blur",
            FilterParam::Sepia => "sepia",
            FilterParam::Grayscale => "grayscale",
            FilterParam::Invert => "invert",
            FilterParam::Hue => "hue",
        }
    }

    /// Slider label.
    pub fn label(self) -> &'static str {
        match self {
            FilterParam::Brightness => "Brightness",
            FilterParam::Contrast => "Contrast",
            FilterParam::Saturation => "Saturation",
            FilterParam::Blur => "Blur",
            FilterParam::Sepia => "Sepia",
            FilterParam::Grayscale => "Grayscale",
            FilterParam::Invert => "Invert",
            FilterParam::Hue => "Hue",
        }
    }

    /// Inclusive `(min, max)`.
    pub fn range(self) -> (f64, f64) {
        match self {
            FilterParam::Brightness => (-1.0, 1.0),
            FilterParam::Contrast | FilterParam::Saturation => (0.0, 2.0),
            FilterParam::Blur => (0.0, 10.0),
            FilterParam::Sepia | FilterParam::Grayscale | FilterParam::Invert => (0.0, 1.0),
            FilterParam::Hue => (-180.0, 180.0),
        }
    }

    /// Slider step.
    pub fn step(self) -> f64 {
        match self {
            FilterParam::Blur => 0.5,
            FilterParam::Hue => 1.0,
            _ => 0.1,
        }
    }

    /// The value at which the parameter has no visible effect.
    pub fn neutral(self) -> f64 {
        match self {
            FilterParam::Contrast | FilterParam::Saturation => 1.0,
            _ => 0.0,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Preview clause for value `v`.
    fn preview_clause(self, v: f64) -> String {
        match self {
            FilterParam::Brightness => format!("brightness({})", 1.0 + v),
            FilterParam::Contrast => format!("contrast({v})"),
            FilterParam::Saturation => format!("saturate({v})"),
            FilterParam::Blur => format!("blur({v}px)"),
            FilterParam::Sepia => format!("sepia({v})"),
            FilterParam::Grayscale => format!("grayscale({v})"),
            FilterParam::Invert => format!("invert({v})"),
            FilterParam::Hue => format!("hue-rotate({v}deg)"),
        }
    }

    /// Export clause for value `v`.
    ///
    /// Sepia, grayscale, and invert are all-or-nothing on export.
    fn export_clause(self, v: f64) -> String {
        match self {
            FilterParam::Brightness => format!("eq=brightness={v}"),
            FilterParam::Contrast => format!("eq=contrast={v}"),
            FilterParam::Saturation => format!("eq=saturation={v}"),
            FilterParam::Blur => format!("boxblur={v}"),
            FilterParam::Sepia => format!("colorchannelmixer={SEPIA_MATRIX}"),
            FilterParam::Grayscale => "hue=s=0".to_string(),
            FilterParam::Invert => "negate".to_string(),
            FilterParam::Hue => format!("hue=h={v}"),
        }
    }
}

impl fmt::Display for FilterParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a filter name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter parameter: {0}")]
pub struct UnknownFilterParam(pub String);

impl FromStr for FilterParam {
    type Err = UnknownFilterParam;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        FilterParam::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| UnknownFilterParam(s.to_string()))
    }
}

/// Parameters currently away from neutral, in output order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFilterSet(BTreeSet<FilterParam>);

impl ActiveFilterSet {
    pub fn contains(&self, param: FilterParam) -> bool {
        self.0.contains(&param)
    }

    pub fn iter(&self) -> impl Iterator<Item = FilterParam> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn set(&mut self, param: FilterParam, active: bool) {
        if active {
            self.0.insert(param);
        } else {
            self.0.remove(&param);
        }
    }
}

/// Current filter values and the derived active set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    values: [f64; 8],
    active: ActiveFilterSet,
}

impl FilterState {
    /// All parameters neutral.
    pub fn new() -> Self {
        Self {
            values: FilterParam::ALL.map(FilterParam::neutral),
            active: ActiveFilterSet::default(),
        }
    }

    /// Clamp `value` to the parameter's range, store it, and return what
    /// was stored. NaN resets the parameter to neutral.
    pub fn set_param(&mut self, param: FilterParam, value: f64) -> f64 {
        let (min, max) = param.range();
        let stored = if value.is_nan() {
            param.neutral()
        } else {
            value.clamp(min, max)
        };
        self.values[param.index()] = stored;
        self.active.set(
            param,
            (stored - param.neutral()).abs() > NEUTRAL_EPSILON,
        );
        stored
    }

    pub fn get(&self, param: FilterParam) -> f64 {
        self.values[param.index()]
    }

    /// Value shown next to the slider of `param`.
    pub fn readout(&self, param: FilterParam) -> String {
        format!("{}", self.get(param))
    }

    pub fn active(&self) -> &ActiveFilterSet {
        &self.active
    }

    pub fn is_active(&self, param: FilterParam) -> bool {
        self.active.contains(param)
    }

    /// Whether anything would change on export.
    pub fn has_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// Back to neutral everywhere.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Space-separated CSS filter chain for the live preview; empty when
    /// nothing is active.
    pub fn to_preview_style(&self) -> String {
        self.active
            .iter()
            .map(|p| p.preview_clause(self.get(p)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// ffmpeg filter clauses, one per active parameter.
    pub fn export_filter_clauses(&self) -> Vec<String> {
        self.active
            .iter()
            .map(|p| p.export_clause(self.get(p)))
            .collect()
    }

    /// Comma-joined ffmpeg filter graph, or `None` when nothing is active.
    pub fn to_export_filter_graph(&self) -> Option<String> {
        if !self.has_active() {
            return None;
        }
        Some(self.export_filter_clauses().join(","))
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new()
    }
}
