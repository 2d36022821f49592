use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::series::SeriesKey;
use super::viewport::DisplayMode;

/// One series' values on one row of the aligned table.
///
/// `None` means "no observation" (or, after gap filling, "outside the
/// series' active span").
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesCell {
    /// Field plotted for the table's display mode (return value in
    /// Percent mode, market value in Absolute mode)
    pub value: Option<f64>,

    /// Return-basis value regardless of display mode
    pub raw_value: Option<f64>,

    pub market_value: Option<f64>,

    pub pnl: Option<f64>,

    /// True when this cell was filled by interpolation
    #[serde(default)]
    pub interpolated: bool,
}

impl SeriesCell {
    /// A cell holds a real or filled sample only when the plotted field is present.
    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }
}

/// One row per distinct date across all input series.
///
/// Before gap filling this is an "aligned row"; afterwards an
/// "interpolated row". The shape is identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    pub date: NaiveDate,

    /// One cell per table column, in column order
    pub cells: Vec<SeriesCell>,
}

pub type AlignedRow = PerformanceRow;
pub type InterpolatedRow = PerformanceRow;

/// Column metadata carried alongside the rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub key: SeriesKey,
    pub name: String,
    pub color: Option<String>,
}

/// Everything known about one series at one row (tooltip data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointReadout {
    pub date: NaiveDate,
    pub key: SeriesKey,
    pub name: String,
    pub value: f64,
    pub raw_value: Option<f64>,
    pub market_value: Option<f64>,
    pub pnl: Option<f64>,
    pub interpolated: bool,
}

/// The synchronized per-date matrix produced by alignment (and then gap
/// filling). Immutable once built: rows are only reachable through shared
/// references so the parallel raw/derived columns can never drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTable {
    mode: DisplayMode,
    columns: Vec<ColumnInfo>,
    rows: Vec<PerformanceRow>,
}

impl PerformanceTable {
    pub(crate) fn from_parts(
        mode: DisplayMode,
        columns: Vec<ColumnInfo>,
        rows: Vec<PerformanceRow>,
    ) -> Self {
        Self {
            mode,
            columns,
            rows,
        }
    }

    pub(crate) fn into_parts(self) -> (DisplayMode, Vec<ColumnInfo>, Vec<PerformanceRow>) {
        (self.mode, self.columns, self.rows)
    }

    /// An empty table (no series, no dates).
    pub fn empty(mode: DisplayMode) -> Self {
        Self::from_parts(mode, Vec::new(), Vec::new())
    }

    /// Display mode this table's `value` field was built for.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn rows(&self) -> &[PerformanceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the last row, `None` for an empty table.
    pub fn last_index(&self) -> Option<usize> {
        self.rows.len().checked_sub(1)
    }

    /// The table's date axis.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn column_index(&self, key: &SeriesKey) -> Option<usize> {
        self.columns.iter().position(|c| &c.key == key)
    }

    pub fn cell(&self, row: usize, key: &SeriesKey) -> Option<&SeriesCell> {
        let col = self.column_index(key)?;
        self.rows.get(row)?.cells.get(col)
    }

    /// All present cells of one column as `(row_index, cell)` pairs.
    pub fn column_cells(&self, key: &SeriesKey) -> Vec<(usize, &SeriesCell)> {
        match self.column_index(key) {
            Some(col) => self
                .rows
                .iter()
                .enumerate()
                .filter_map(|(i, r)| r.cells.get(col).filter(|c| c.is_present()).map(|c| (i, c)))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Hover read-out for one series at one row. `None` when the row does
    /// not exist or the series has no sample there.
    pub fn readout(&self, index: usize, key: &SeriesKey) -> Option<PointReadout> {
        let col = self.column_index(key)?;
        let row = self.rows.get(index)?;
        let cell = row.cells.get(col)?;
        let value = cell.value?;
        Some(PointReadout {
            date: row.date,
            key: key.clone(),
            name: self.columns[col].name.clone(),
            value,
            raw_value: cell.raw_value,
            market_value: cell.market_value,
            pnl: cell.pnl,
            interpolated: cell.interpolated,
        })
    }

    /// Min/max of one field across every column and row, ignoring gaps.
    pub fn extent<F>(&self, field: F) -> Option<(f64, f64)>
    where
        F: Fn(&SeriesCell) -> Option<f64>,
    {
        self.extent_by(|_| true, field)
    }

    /// Min/max of one field across the columns accepted by `include`.
    pub fn extent_by<P, F>(&self, include: P, field: F) -> Option<(f64, f64)>
    where
        P: Fn(&SeriesKey) -> bool,
        F: Fn(&SeriesCell) -> Option<f64>,
    {
        let cols: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| include(&c.key))
            .map(|(i, _)| i)
            .collect();

        self.rows
            .iter()
            .flat_map(|r| cols.iter().filter_map(move |&c| r.cells.get(c)))
            .filter_map(&field)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
