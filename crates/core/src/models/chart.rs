use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::analytics::VariationEmphasis;
use super::axis::{AxisSide, TickPlan};
use super::series::SeriesKey;
use super::viewport::{DisplayMode, ValueRange};
use crate::errors::CoreError;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidColor(format!(
                "'{s}' is not a #rrggbb color"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| CoreError::InvalidColor(format!("'{s}': {e}")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// HSL lightness in `0.0..=1.0`.
    pub fn lightness(&self) -> f64 {
        self.to_hsl().2
    }

    /// Raise HSL lightness to at least `floor`, keeping hue and saturation.
    pub fn with_min_lightness(&self, floor: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        if l >= floor {
            *self
        } else {
            Self::from_hsl(h, s, floor.clamp(0.0, 1.0))
        }
    }

    fn to_hsl(&self) -> (f64, f64, f64) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let d = max - min;
        if d == 0.0 {
            return (0.0, 0.0, l);
        }
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if max == r {
            ((g - b) / d).rem_euclid(6.0)
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h * 60.0, s, l)
    }

    fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hp = h / 60.0;
        let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
        let (r1, g1, b1) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::new(to_u8(r1), to_u8(g1), to_u8(b1))
    }
}

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesShape {
    Line,
    /// Filled down to the axis baseline
    Area,
}

/// One sample of a projected series. `y` is `None` outside the series'
/// active span, which renders as a break in the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePoint {
    /// Row index in the full table
    pub index: usize,
    pub date: NaiveDate,
    pub y: Option<f64>,
    pub interpolated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSeries {
    pub key: SeriesKey,
    pub name: String,
    pub color: Rgb,
    pub axis: AxisSide,
    pub shape: SeriesShape,
    pub points: Vec<ScenePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisScene {
    pub side: AxisSide,
    pub range: ValueRange,
    pub ticks: TickPlan,
    pub show_major_grid: bool,
    pub show_minor_grid: bool,
}

/// Everything a renderer needs to draw one frame of the performance chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartScene {
    pub mode: DisplayMode,

    /// Visible row window, `None` when nothing is drawable
    pub window: Option<(usize, usize)>,

    pub series: Vec<SceneSeries>,

    pub primary_axis: AxisScene,

    pub secondary_axis: Option<AxisScene>,

    /// Emphasis of the focused entity's window return
    pub emphasis: Option<VariationEmphasis>,
}

impl ChartScene {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    pub fn series(&self, key: &SeriesKey) -> Option<&SceneSeries> {
        self.series.iter().find(|s| &s.key == key)
    }
}
