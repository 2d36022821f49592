use serde::{Deserialize, Serialize};

/// Which quantity the chart plots on its primary axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Percentage return (MWR basis)
    #[default]
    #[serde(alias = "mwr")]
    Percent,
    /// Absolute monetary value
    #[serde(alias = "value")]
    Absolute,
}

impl DisplayMode {
    /// Parse a persisted mode string. Unknown strings yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percent" | "mwr" => Some(DisplayMode::Percent),
            "absolute" | "value" => Some(DisplayMode::Absolute),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Percent => "percent",
            DisplayMode::Absolute => "absolute",
        }
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inclusive index pair into the aligned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: usize,
    pub end: usize,
}

impl DateRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn full(last_index: usize) -> Self {
        Self::new(0, last_index)
    }

    /// Clamp both ends to `[0, last_index]`. An inverted result means
    /// there is nothing to show for this window.
    pub fn clamped(&self, last_index: usize) -> Option<(usize, usize)> {
        let safe_start = self.start.min(last_index);
        let safe_end = self.end.min(last_index);
        if safe_start > safe_end {
            None
        } else {
            Some((safe_start, safe_end))
        }
    }
}

/// Numeric `[min, max]` window on a value axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Finite and not inverted.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::new(0.0, 100.0)
    }
}

/// One value range per display mode. Switching modes never discards the
/// other mode's range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueRangeByMode {
    pub percent: ValueRange,
    pub absolute: ValueRange,
}

impl ValueRangeByMode {
    pub fn get(&self, mode: DisplayMode) -> ValueRange {
        match mode {
            DisplayMode::Percent => self.percent,
            DisplayMode::Absolute => self.absolute,
        }
    }

    pub fn set(&mut self, mode: DisplayMode, range: ValueRange) {
        match mode {
            DisplayMode::Percent => self.percent = range,
            DisplayMode::Absolute => self.absolute = range,
        }
    }
}

/// The selected date window, value windows and grid toggles.
///
/// Owned by `ViewportRangeModel`; everything else reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub date_range: DateRange,
    pub value_range_by_mode: ValueRangeByMode,
    pub display_mode: DisplayMode,
    pub show_major_grid: bool,
    pub show_minor_grid: bool,
}

impl ViewportState {
    /// The value range of the currently selected display mode.
    pub fn active_value_range(&self) -> ValueRange {
        self.value_range_by_mode.get(self.display_mode)
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            date_range: DateRange::new(0, 0),
            value_range_by_mode: ValueRangeByMode::default(),
            display_mode: DisplayMode::Percent,
            show_major_grid: true,
            show_minor_grid: false,
        }
    }
}
