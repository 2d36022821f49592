use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::models::series::SeriesKey;
use crate::models::settings::{ChartSettings, SettingsCommit};
use crate::models::table::PerformanceTable;
use crate::models::viewport::{DateRange, DisplayMode, ValueRange, ValueRangeByMode, ViewportState};
use crate::services::commit_service::CommitScheduler;

/// Owns the chart's viewport: the date-index window, one value window per
/// display mode, and the grid toggles.
///
/// State is seeded once per dataset from persisted settings (or full-range
/// defaults) and afterwards changes only through interaction. Drags update
/// the state immediately; `schedule_commit` queues the settled payload on
/// the model's debounce scheduler, and `poll_commit` / `flush_commit`
/// release it for the settings writer.
#[derive(Debug, Clone)]
pub struct ViewportRangeModel {
    state: ViewportState,
    last_index: Option<usize>,
    initialized: bool,
    padding_ratio: f64,
    scheduler: CommitScheduler,
}

impl ViewportRangeModel {
    pub fn new(padding_ratio: f64) -> Self {
        Self {
            state: ViewportState::default(),
            last_index: None,
            initialized: false,
            padding_ratio,
            scheduler: CommitScheduler::default(),
        }
    }

    /// Replace the debounce quiet period (1 s by default).
    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.scheduler = CommitScheduler::new(quiet_period);
        self
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn last_index(&self) -> Option<usize> {
        self.last_index
    }

    // ── Initialization ──────────────────────────────────────────────

    /// Seed the viewport from `settings` for this dataset.
    ///
    /// Runs at most once: later calls return `false` and leave user
    /// adjustments alone. An empty table does not count as a load.
    pub fn initialize(&mut self, table: &PerformanceTable, settings: &ChartSettings) -> bool {
        if self.initialized {
            return false;
        }
        let Some(last) = table.last_index() else {
            return false;
        };

        let dates = table.dates();
        let seeds = seed_value_ranges(table, self.padding_ratio);

        let percent = match settings.percent_range() {
            Some(r) if r.is_valid() => r,
            Some(r) => {
                log::warn!("Discarding inverted percent range [{}, {}]", r.min, r.max);
                seeds.percent
            }
            None => seeds.percent,
        };
        let absolute = match settings.value_range.map(non_negative) {
            Some(r) if r.is_valid() => r,
            Some(r) => {
                log::warn!("Discarding invalid value range [{}, {}]", r.min, r.max);
                seeds.absolute
            }
            None => seeds.absolute,
        };

        self.state = ViewportState {
            date_range: resolve_date_window(&dates, settings),
            value_range_by_mode: ValueRangeByMode { percent, absolute },
            display_mode: settings.display_mode.unwrap_or_default(),
            show_major_grid: settings.show_major_grid.unwrap_or(true),
            show_minor_grid: settings.show_minor_grid.unwrap_or(false),
        };
        self.last_index = Some(last);
        self.initialized = true;

        log::info!(
            "Viewport initialized: rows {}..={} of {}, {} mode",
            self.state.date_range.start,
            self.state.date_range.end,
            last,
            self.state.display_mode
        );
        true
    }

    /// Adapt to a reloaded dataset without resetting user ranges.
    ///
    /// A window that ended on the old last row keeps following the tail;
    /// otherwise both ends are clamped to the new last row.
    pub fn on_dataset_reload(&mut self, table: &PerformanceTable) {
        if !self.initialized {
            return;
        }
        let Some(new_last) = table.last_index() else {
            return;
        };
        let followed_tail = self.last_index == Some(self.state.date_range.end);
        let range = &mut self.state.date_range;
        range.start = range.start.min(new_last);
        range.end = if followed_tail {
            new_last
        } else {
            range.end.min(new_last)
        };
        self.last_index = Some(new_last);
    }

    /// Forget everything (e.g., when switching to another portfolio or
    /// asset), including a commit that has not been released yet.
    pub fn reset(&mut self) {
        self.state = ViewportState::default();
        self.last_index = None;
        self.initialized = false;
        self.scheduler.cancel();
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// The clamped date window, or `None` when there is nothing to show.
    pub fn visible_window(&self) -> Option<(usize, usize)> {
        let last = self.last_index?;
        self.state.date_range.clamped(last)
    }

    pub fn active_value_range(&self) -> ValueRange {
        self.state.active_value_range()
    }

    // ── Interaction ─────────────────────────────────────────────────

    /// Transient update while a date slider is being dragged.
    ///
    /// Indices are clamped to the table; an inverted pair is stored as-is
    /// and yields an empty window.
    pub fn drag_date_range(&mut self, start: usize, end: usize) {
        let (start, end) = match self.last_index {
            Some(last) => (start.min(last), end.min(last)),
            None => (start, end),
        };
        self.state.date_range = DateRange::new(start, end);
    }

    /// Transient update of the active mode's value window. Invalid ranges
    /// are ignored; Absolute mode never goes below zero.
    pub fn drag_value_range(&mut self, min: f64, max: f64) -> bool {
        let mut range = ValueRange::new(min, max);
        if self.state.display_mode == DisplayMode::Absolute {
            range = non_negative(range);
        }
        if !range.is_valid() {
            log::debug!("Ignoring invalid value range [{min}, {max}]");
            return false;
        }
        self.state
            .value_range_by_mode
            .set(self.state.display_mode, range);
        true
    }

    /// Switch the active value window. The other mode's window is kept.
    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.state.display_mode = mode;
    }

    pub fn set_grid_visibility(&mut self, show_major: bool, show_minor: bool) {
        self.state.show_major_grid = show_major;
        self.state.show_minor_grid = show_minor;
    }

    /// The settled state as a settings payload. Window bounds are written
    /// as dates so they survive datasets that gain or lose rows.
    pub fn commit(&self, table: &PerformanceTable) -> SettingsCommit {
        let rows = table.rows();
        let (start_date, end_date) = match self.visible_window() {
            Some((s, e)) => (rows.get(s).map(|r| r.date), rows.get(e).map(|r| r.date)),
            None => (None, None),
        };
        let ranges = &self.state.value_range_by_mode;
        SettingsCommit {
            time_window_start: start_date,
            time_window_end: end_date,
            value_range_min: ranges.absolute.min,
            value_range_max: ranges.absolute.max,
            mwr_range_min: ranges.percent.min,
            mwr_range_max: ranges.percent.max,
            display_mode: self.state.display_mode,
            show_major_grid: self.state.show_major_grid,
            show_minor_grid: self.state.show_minor_grid,
        }
    }

    // ── Debounced commits ───────────────────────────────────────────

    /// Queue the current state for persistence, restarting the quiet
    /// period. Nothing is queued before the first seeding.
    pub fn schedule_commit(&mut self, table: &PerformanceTable, now: Instant) -> bool {
        if !self.initialized {
            return false;
        }
        let payload = self.commit(table);
        self.scheduler.schedule(payload, now);
        true
    }

    /// The queued payload, once `now` is past the quiet period.
    pub fn poll_commit(&mut self, now: Instant) -> Option<SettingsCommit> {
        self.scheduler.poll(now)
    }

    /// The queued payload regardless of the quiet period (slider released).
    pub fn flush_commit(&mut self) -> Option<SettingsCommit> {
        self.scheduler.flush()
    }

    pub fn has_pending_commit(&self) -> bool {
        self.scheduler.has_pending()
    }

    pub fn commit_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }
}

impl Default for ViewportRangeModel {
    fn default() -> Self {
        Self::new(0.1)
    }
}

/// Resolve persisted window settings against the table's date axis.
///
/// Dates win over the legacy start index; with neither the full range is
/// used. `dates` must be non-empty and ascending.
pub fn resolve_date_window(dates: &[NaiveDate], settings: &ChartSettings) -> DateRange {
    let last = dates.len().saturating_sub(1);

    if settings.time_window_start.is_some() || settings.time_window_end.is_some() {
        let start = settings
            .time_window_start
            .map(|d| dates.iter().position(|&x| x >= d).unwrap_or(last))
            .unwrap_or(0);
        let end = settings
            .time_window_end
            .map(|d| dates.iter().rposition(|&x| x <= d).unwrap_or(0))
            .unwrap_or(last);

        if start > end {
            log::warn!(
                "Persisted window {:?}..{:?} covers no rows; using full range",
                settings.time_window_start,
                settings.time_window_end
            );
            return DateRange::full(last);
        }
        return DateRange::new(start, end);
    }

    if let Some(start) = settings.time_window {
        return DateRange::new(start.min(last), last);
    }

    DateRange::full(last)
}

/// Data-derived value windows: the percent range pads the return extent
/// and rounds outward to integers; the absolute range is `[0, padded max]`
/// over the asset columns (the whole table when there are none).
pub fn seed_value_ranges(table: &PerformanceTable, padding_ratio: f64) -> ValueRangeByMode {
    let percent = table
        .extent(|c| c.raw_value)
        .map(|(lo, hi)| {
            let span = hi - lo;
            let pad = if span > 0.0 {
                span * padding_ratio
            } else {
                (hi.abs() * padding_ratio).max(1.0)
            };
            ValueRange::new((lo - pad).floor(), (hi + pad).ceil())
        })
        .unwrap_or_default();

    let has_assets = table.columns().iter().any(|c| !c.key.is_portfolio());
    let absolute_max = table
        .extent_by(|k| !has_assets || !k.is_portfolio(), |c| c.market_value)
        .map(|(_, hi)| hi);

    ValueRangeByMode {
        percent,
        absolute: ValueRange::new(0.0, padded_max(absolute_max, padding_ratio)),
    }
}

/// Padded maximum of the portfolio's market value (secondary axis extent).
pub fn portfolio_value_max(table: &PerformanceTable, padding_ratio: f64) -> Option<f64> {
    table
        .extent_by(SeriesKey::is_portfolio, |c| c.market_value)
        .map(|(_, hi)| padded_max(Some(hi), padding_ratio))
}

fn padded_max(max: Option<f64>, padding_ratio: f64) -> f64 {
    match max {
        Some(hi) if hi > 0.0 => (hi + hi * padding_ratio).ceil(),
        _ => ValueRange::default().max,
    }
}

fn non_negative(range: ValueRange) -> ValueRange {
    ValueRange::new(range.min.max(0.0), range.max)
}
