use crate::models::series::SeriesKey;
use crate::models::table::{PerformanceTable, SeriesCell};

/// Fills interior gaps of aligned series by straight-line interpolation.
///
/// Gaps are filled only between a series' first and last real observation:
/// before acquisition and after liquidation the series stays absent.
/// All four fields share the same run boundaries so a read at any filled
/// row is internally consistent.
pub struct InterpolationService;

impl InterpolationService {
    pub fn new() -> Self {
        Self
    }

    /// Gap-fill every column of the table.
    pub fn interpolate(&self, table: PerformanceTable) -> PerformanceTable {
        let keys: Vec<SeriesKey> = table.columns().iter().map(|c| c.key.clone()).collect();
        self.interpolate_keys(table, &keys)
    }

    /// Gap-fill only the listed columns. Unknown keys are ignored.
    pub fn interpolate_keys(&self, table: PerformanceTable, keys: &[SeriesKey]) -> PerformanceTable {
        let col_indices: Vec<usize> = keys.iter().filter_map(|k| table.column_index(k)).collect();
        let (mode, columns, mut rows) = table.into_parts();

        for col in col_indices {
            let mut last_known: Option<usize> = None;
            let mut filled = 0usize;

            for j in 0..rows.len() {
                let current = rows[j].cells[col];
                if !current.is_present() || current.interpolated {
                    continue;
                }

                if let Some(i) = last_known {
                    if j - i > 1 {
                        let start = rows[i].cells[col];
                        for k in (i + 1)..j {
                            let t = (k - i) as f64 / (j - i) as f64;
                            rows[k].cells[col] = lerp_cell(&start, &current, t);
                            filled += 1;
                        }
                    }
                }
                last_known = Some(j);
            }

            if filled > 0 {
                log::debug!("{}: filled {filled} gap rows", columns[col].key);
            }
        }

        PerformanceTable::from_parts(mode, columns, rows)
    }
}

impl Default for InterpolationService {
    fn default() -> Self {
        Self::new()
    }
}

fn lerp(a: Option<f64>, b: Option<f64>, t: f64) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + (b - a) * t),
        _ => None,
    }
}

fn lerp_cell(start: &SeriesCell, end: &SeriesCell, t: f64) -> SeriesCell {
    SeriesCell {
        value: lerp(start.value, end.value, t),
        raw_value: lerp(start.raw_value, end.raw_value, t),
        market_value: lerp(start.market_value, end.market_value, t),
        pnl: lerp(start.pnl, end.pnl, t),
        interpolated: true,
    }
}
