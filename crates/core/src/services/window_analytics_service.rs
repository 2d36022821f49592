use crate::models::analytics::WindowStats;
use crate::models::series::SeriesKey;
use crate::models::table::{PerformanceTable, SeriesCell};

/// Computes period P&L and return for the rows bounding a date window.
///
/// Only the two boundary rows are read, so the cost does not depend on
/// the window width and the stats can be refreshed on every drag frame.
pub struct WindowAnalyticsService;

impl WindowAnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Stats for `entity` over rows `start_idx..=end_idx`.
    ///
    /// Indices are clamped to the table. Returns `None` for an empty table,
    /// an unknown entity, or a window that is inverted after clamping.
    /// A boundary row where the entity holds nothing counts as zero.
    pub fn compute_window_stats(
        &self,
        table: &PerformanceTable,
        start_idx: usize,
        end_idx: usize,
        entity: &SeriesKey,
    ) -> Option<WindowStats> {
        let last = table.last_index()?;
        let start = start_idx.min(last);
        let end = end_idx.min(last);
        if start > end {
            return None;
        }
        let col = table.column_index(entity)?;

        let rows = table.rows();
        let start_row = &rows[start];
        let end_row = &rows[end];
        let first = Boundary::from_cell(start_row.cells.get(col));
        let second = Boundary::from_cell(end_row.cells.get(col));

        let period_pnl = second.pnl - first.pnl;

        // At the true beginning of history the backend's MWR on the end row
        // is authoritative; elsewhere fall back to Modified Dietz.
        let backend_return = if start == 0 { second.raw_value } else { None };
        let period_return_pct = backend_return.unwrap_or_else(|| {
            modified_dietz_pct(
                first.market_value - first.pnl,
                second.market_value - second.pnl,
                period_pnl,
            )
        });

        Some(WindowStats {
            period_pnl,
            period_return_pct,
            end_market_value: second.market_value,
            window_start_date: start_row.date,
            window_end_date: end_row.date,
            is_full_range: start == 0 && end == last,
        })
    }
}

impl Default for WindowAnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}

/// Modified Dietz approximation in percent: P&L over the average invested
/// capital, with net flows assumed to arrive mid-period.
pub fn modified_dietz_pct(invested_start: f64, invested_end: f64, period_pnl: f64) -> f64 {
    let net_flows = invested_end - invested_start;
    let avg_capital = invested_start + net_flows / 2.0;
    if avg_capital != 0.0 {
        period_pnl / avg_capital * 100.0
    } else {
        0.0
    }
}

struct Boundary {
    pnl: f64,
    market_value: f64,
    raw_value: Option<f64>,
}

impl Boundary {
    fn from_cell(cell: Option<&SeriesCell>) -> Self {
        let cell = cell.copied().unwrap_or_default();
        Self {
            pnl: cell.pnl.unwrap_or(0.0),
            market_value: cell.market_value.unwrap_or(0.0),
            raw_value: cell.raw_value,
        }
    }
}
