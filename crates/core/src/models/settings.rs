use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoreError;

use super::viewport::{DisplayMode, ValueRange};

/// Persisted chart preferences as returned by the settings store.
///
/// Every field is optional: absent, unknown or malformed fields degrade to
/// defaults instead of failing the whole read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window_start: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window_end: Option<NaiveDate>,

    /// Legacy single start index (end implied as the last row)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<usize>,

    /// Absolute-mode value range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_range: Option<ValueRange>,

    /// Percent-mode (MWR) value range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mwr_range: Option<ValueRange>,

    /// Legacy percent-mode range, read only when `mwrRange` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis_scale: Option<ValueRange>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_major_grid: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_minor_grid: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_mode: Option<DisplayMode>,
}

impl ChartSettings {
    /// Parse a settings payload. Only a syntactically broken document is an
    /// error; a field of the wrong shape is simply dropped.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }

    /// Field-by-field lenient extraction from an arbitrary JSON value.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        Self {
            time_window_start: obj.get("timeWindowStart").and_then(lenient_date),
            time_window_end: obj.get("timeWindowEnd").and_then(lenient_date),
            time_window: obj.get("timeWindow").and_then(lenient_index),
            value_range: obj.get("valueRange").and_then(lenient_range),
            mwr_range: obj.get("mwrRange").and_then(lenient_range),
            y_axis_scale: obj.get("yAxisScale").and_then(lenient_range),
            show_major_grid: obj.get("showMajorGrid").and_then(Value::as_bool),
            show_minor_grid: obj.get("showMinorGrid").and_then(Value::as_bool),
            display_mode: obj
                .get("displayMode")
                .and_then(Value::as_str)
                .and_then(DisplayMode::parse),
        }
    }

    /// Percent-mode range, falling back to the legacy `yAxisScale`.
    pub fn percent_range(&self) -> Option<ValueRange> {
        self.mwr_range.or(self.y_axis_scale)
    }

    /// Merge a commit into the stored document, the way the settings API
    /// upserts it. Legacy fields are superseded and cleared.
    pub fn apply(&mut self, commit: &SettingsCommit) {
        self.time_window_start = commit.time_window_start;
        self.time_window_end = commit.time_window_end;
        self.time_window = None;
        self.value_range = Some(ValueRange::new(commit.value_range_min, commit.value_range_max));
        self.mwr_range = Some(ValueRange::new(commit.mwr_range_min, commit.mwr_range_max));
        self.y_axis_scale = None;
        self.display_mode = Some(commit.display_mode);
        self.show_major_grid = Some(commit.show_major_grid);
        self.show_minor_grid = Some(commit.show_minor_grid);
    }
}

/// Flat payload written to the settings store on commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsCommit {
    pub time_window_start: Option<NaiveDate>,
    pub time_window_end: Option<NaiveDate>,
    pub value_range_min: f64,
    pub value_range_max: f64,
    pub mwr_range_min: f64,
    pub mwr_range_max: f64,
    pub display_mode: DisplayMode,
    pub show_major_grid: bool,
    pub show_minor_grid: bool,
}

// ── Lenient field parsers ───────────────────────────────────────────

fn lenient_date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?.trim();
    // Accept full timestamps by keeping only the calendar date prefix.
    let date_part = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn lenient_index(value: &Value) -> Option<usize> {
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).ok();
    }
    let n = value.as_f64()?;
    if !n.is_finite() {
        return None;
    }
    // Negative indices clamp to the first row.
    Some(n.max(0.0).floor() as usize)
}

fn lenient_range(value: &Value) -> Option<ValueRange> {
    let obj = value.as_object()?;
    let min = obj.get("min").and_then(Value::as_f64)?;
    let max = obj.get("max").and_then(Value::as_f64)?;
    Some(ValueRange::new(min, max))
}
