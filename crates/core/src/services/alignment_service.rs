use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::models::series::{Series, TimePoint};
use crate::models::table::{ColumnInfo, PerformanceRow, PerformanceTable, SeriesCell};
use crate::models::viewport::DisplayMode;

/// Merges independent per-entity series onto one shared date axis.
///
/// The axis is the sorted union of every observed date, not a calendar
/// grid, so irregular sampling survives alignment. No filling happens
/// here: a series without an observation on a date gets an empty cell.
pub struct AlignmentService;

impl AlignmentService {
    pub fn new() -> Self {
        Self
    }

    /// Align `series_list` into a table whose `value` field is the primary
    /// field for `mode`.
    ///
    /// An empty list yields an empty table. Columns keep input order; a
    /// repeated key keeps only its first series.
    pub fn align(&self, series_list: &[Series], mode: DisplayMode) -> PerformanceTable {
        let mut columns = Vec::with_capacity(series_list.len());
        let mut lookups: Vec<BTreeMap<NaiveDate, &TimePoint>> = Vec::with_capacity(series_list.len());
        let mut seen_keys = HashSet::new();
        let mut all_dates = BTreeSet::new();

        for series in series_list {
            if !seen_keys.insert(&series.key) {
                log::warn!("Series key {} appears twice; keeping the first column", series.key);
                continue;
            }

            let mut by_date = BTreeMap::new();
            for point in &series.points {
                all_dates.insert(point.date);
                if !point.is_finite() {
                    log::debug!("{}: non-finite sample on {} treated as missing", series.key, point.date);
                    continue;
                }
                if by_date.insert(point.date, point).is_some() {
                    log::debug!("{}: duplicate sample on {}, last one wins", series.key, point.date);
                }
            }

            columns.push(ColumnInfo {
                key: series.key.clone(),
                name: series.name.clone(),
                color: series.color.clone(),
            });
            lookups.push(by_date);
        }

        let rows: Vec<PerformanceRow> = all_dates
            .into_iter()
            .map(|date| PerformanceRow {
                date,
                cells: lookups
                    .iter()
                    .map(|by_date| {
                        by_date
                            .get(&date)
                            .map(|p| observed_cell(p, mode))
                            .unwrap_or_default()
                    })
                    .collect(),
            })
            .collect();

        log::debug!(
            "Aligned {} series onto {} dates ({} mode)",
            columns.len(),
            rows.len(),
            mode
        );

        PerformanceTable::from_parts(mode, columns, rows)
    }
}

impl Default for AlignmentService {
    fn default() -> Self {
        Self::new()
    }
}

/// Which raw field a display mode plots.
pub(crate) fn primary_field(point: &TimePoint, mode: DisplayMode) -> f64 {
    match mode {
        DisplayMode::Percent => point.value,
        DisplayMode::Absolute => point.market_value,
    }
}

fn observed_cell(point: &TimePoint, mode: DisplayMode) -> SeriesCell {
    SeriesCell {
        value: Some(primary_field(point, mode)),
        raw_value: Some(point.value),
        market_value: Some(point.market_value),
        pnl: Some(point.pnl),
        interpolated: false,
    }
}
