pub mod errors;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;
use std::time::Instant;

use models::{
    analytics::WindowStats,
    axis::AxisPlans,
    chart::ChartScene,
    config::EngineConfig,
    series::{SeriesKey, SeriesSource},
    settings::ChartSettings,
    table::PerformanceTable,
    viewport::{DisplayMode, ViewportState},
};
use services::{
    alignment_service::AlignmentService,
    axis_service::AxisPlanner,
    commit_service::SettingsCommitter,
    interpolation_service::InterpolationService,
    render_service::{RenderContext, RenderProjector},
    viewport_service::{portfolio_value_max, ViewportRangeModel},
    window_analytics_service::WindowAnalyticsService,
};
use store::rest::RestSettingsStore;
use store::traits::SettingsStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Main entry point for the wealth-chart core library.
///
/// Holds one portfolio's or one asset's chart: the fetched series, the
/// memoized gap-filled table, the viewport, and the debounced settings
/// writer. All methods are synchronous and cheap enough for drag frames;
/// the only asynchronous work is the settings-store read and the
/// fire-and-forget commit writes.
#[must_use]
pub struct PerformanceChart {
    scope: String,
    config: EngineConfig,
    context: RenderContext,
    focus: SeriesKey,
    source: SeriesSource,
    /// Bumped on every dataset load; part of the table memo key.
    generation: u64,
    table_cache: Option<(u64, DisplayMode, Arc<PerformanceTable>)>,
    alignment_service: AlignmentService,
    interpolation_service: InterpolationService,
    axis_planner: AxisPlanner,
    analytics_service: WindowAnalyticsService,
    render_projector: RenderProjector,
    viewport: ViewportRangeModel,
    committer: Option<SettingsCommitter>,
    stats_tx: watch::Sender<Option<WindowStats>>,
}

impl std::fmt::Debug for PerformanceChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceChart")
            .field("scope", &self.scope)
            .field("context", &self.context)
            .field("focus", &self.focus)
            .field("generation", &self.generation)
            .field("viewport", self.viewport.state())
            .field("pending_commit", &self.viewport.has_pending_commit())
            .field("committer", &self.committer)
            .finish()
    }
}

impl PerformanceChart {
    /// Chart for a whole portfolio: every asset plus the aggregate series,
    /// stats reported for the portfolio.
    pub fn new(scope: impl Into<String>, config: EngineConfig) -> Self {
        let config = config.sanitized();
        let (stats_tx, _) = watch::channel(None);
        Self {
            scope: scope.into(),
            context: RenderContext::Portfolio,
            focus: SeriesKey::Portfolio,
            source: SeriesSource::default(),
            generation: 0,
            table_cache: None,
            alignment_service: AlignmentService::new(),
            interpolation_service: InterpolationService::new(),
            axis_planner: AxisPlanner::new(config.target_tick_count),
            analytics_service: WindowAnalyticsService::new(),
            render_projector: RenderProjector::new(config.min_lightness),
            viewport: ViewportRangeModel::new(config.value_padding_ratio)
                .with_quiet_period(config.commit_quiet_period()),
            committer: None,
            stats_tx,
            config,
        }
    }

    /// Chart for a single asset: the aggregate series is hidden and stats
    /// are reported for `asset`.
    pub fn for_asset(scope: impl Into<String>, asset: SeriesKey, config: EngineConfig) -> Self {
        let mut chart = Self::new(scope, config);
        chart.context = RenderContext::SingleAsset;
        chart.focus = asset;
        chart
    }

    /// Attach the store that receives debounced commits.
    pub fn with_settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.committer = Some(SettingsCommitter::new(store, self.scope.clone()));
        self
    }

    /// Attach a REST settings store at `config.settings_base_url`, if one
    /// is configured. Without a URL the chart is returned unchanged.
    pub fn with_configured_settings_store(self) -> Self {
        match self.config.settings_base_url.clone() {
            Some(base_url) => {
                log::debug!("Using REST settings store at {base_url}");
                self.with_settings_store(Arc::new(RestSettingsStore::new(base_url)))
            }
            None => self,
        }
    }

    /// Name of the attached settings store, if any.
    #[must_use]
    pub fn settings_store_name(&self) -> Option<&str> {
        self.committer.as_ref().map(|c| c.store().name())
    }

    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn focus(&self) -> &SeriesKey {
        &self.focus
    }

    /// Change which entity the window stats describe.
    pub fn set_focus(&mut self, key: SeriesKey) {
        self.focus = key;
        self.publish_window_stats();
    }

    // ── Loading ─────────────────────────────────────────────────────

    /// Read persisted settings for this scope. Store failures are logged
    /// and degrade to defaults.
    pub async fn load_settings(&self) -> ChartSettings {
        let Some(committer) = &self.committer else {
            return ChartSettings::default();
        };
        match committer.store().load(&self.scope).await {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Could not load chart settings for '{}': {e}", self.scope);
                ChartSettings::default()
            }
        }
    }

    /// Install freshly fetched series.
    ///
    /// The first non-empty load seeds the viewport from `settings`; later
    /// loads keep the user's ranges and only clamp them to the new table.
    pub fn load_dataset(&mut self, source: SeriesSource, settings: &ChartSettings) {
        self.source = source;
        self.generation += 1;
        self.table_cache = None;

        let table = self.table();
        log::info!(
            "Loaded dataset for '{}': {} series, {} dates",
            self.scope,
            table.columns().len(),
            table.len()
        );

        if !self.viewport.initialize(&table, settings) {
            self.viewport.on_dataset_reload(&table);
        }
        self.publish_window_stats();
    }

    /// Move to another portfolio or asset: the viewport is seeded again on
    /// the next load, and an unsent commit for the old scope is dropped.
    pub fn switch_scope(&mut self, scope: impl Into<String>) {
        self.scope = scope.into();
        self.viewport.reset();
        if let Some(old) = self.committer.take() {
            self.committer = Some(SettingsCommitter::new(Arc::clone(old.store()), self.scope.clone()));
        }
        self.source = SeriesSource::default();
        self.generation += 1;
        self.table_cache = None;
        self.publish_window_stats();
    }

    /// The gap-filled table for the current display mode, memoized on
    /// (dataset, mode).
    pub fn table(&mut self) -> Arc<PerformanceTable> {
        let mode = self.viewport.state().display_mode;
        if let Some((generation, cached_mode, table)) = &self.table_cache {
            if *generation == self.generation && *cached_mode == mode {
                return Arc::clone(table);
            }
        }

        log::debug!("Rebuilding table for '{}' ({mode} mode)", self.scope);
        let aligned = self
            .alignment_service
            .align(&self.source.series_list(true), mode);
        let table = Arc::new(self.interpolation_service.interpolate(aligned));
        self.table_cache = Some((self.generation, mode, Arc::clone(&table)));
        table
    }

    // ── Viewport interaction ────────────────────────────────────────

    #[must_use]
    pub fn viewport(&self) -> &ViewportState {
        self.viewport.state()
    }

    #[must_use]
    pub fn visible_window(&self) -> Option<(usize, usize)> {
        self.viewport.visible_window()
    }

    /// Live update from the date slider. Stats are republished at once;
    /// the commit waits for the quiet period.
    pub fn drag_date_range(&mut self, start: usize, end: usize, now: Instant) {
        self.viewport.drag_date_range(start, end);
        self.publish_window_stats();
        self.schedule_commit(now);
    }

    /// Live update from the value slider of the active mode.
    pub fn drag_value_range(&mut self, min: f64, max: f64, now: Instant) -> bool {
        let changed = self.viewport.drag_value_range(min, max);
        if changed {
            self.schedule_commit(now);
        }
        changed
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode, now: Instant) {
        if self.viewport.state().display_mode == mode {
            return;
        }
        self.viewport.set_display_mode(mode);
        self.schedule_commit(now);
    }

    pub fn set_grid_visibility(&mut self, show_major: bool, show_minor: bool, now: Instant) {
        self.viewport.set_grid_visibility(show_major, show_minor);
        self.schedule_commit(now);
    }

    // ── Commits ─────────────────────────────────────────────────────

    /// Dispatch the pending commit if the quiet period has elapsed.
    pub fn poll_commit(&mut self, now: Instant) -> Option<JoinHandle<()>> {
        let commit = self.viewport.poll_commit(now)?;
        self.dispatch(commit)
    }

    /// Dispatch the pending commit immediately (slider released).
    pub fn release(&mut self) -> Option<JoinHandle<()>> {
        let commit = self.viewport.flush_commit()?;
        self.dispatch(commit)
    }

    #[must_use]
    pub fn has_pending_commit(&self) -> bool {
        self.viewport.has_pending_commit()
    }

    // ── Derived outputs ─────────────────────────────────────────────

    /// Stats of the focused entity over the visible window.
    pub fn window_stats(&mut self) -> Option<WindowStats> {
        let (start, end) = self.viewport.visible_window()?;
        let table = self.table();
        self.analytics_service
            .compute_window_stats(&table, start, end, &self.focus)
    }

    /// Receiver of a `WindowStats` event on every window adjustment.
    pub fn subscribe_window_stats(&self) -> watch::Receiver<Option<WindowStats>> {
        self.stats_tx.subscribe()
    }

    /// Tick plans for the current viewport.
    pub fn tick_plans(&mut self) -> AxisPlans {
        let table = self.table();
        let secondary_max = portfolio_value_max(&table, self.config.value_padding_ratio);
        self.axis_planner
            .plan_axes(self.viewport.state(), secondary_max)
    }

    /// The drawable scene for the current viewport.
    pub fn scene(&mut self) -> ChartScene {
        let table = self.table();
        let secondary_max = portfolio_value_max(&table, self.config.value_padding_ratio);
        let plans = self
            .axis_planner
            .plan_axes(self.viewport.state(), secondary_max);

        let mut scene = self.render_projector.project(
            &table,
            self.viewport.state(),
            self.viewport.visible_window(),
            &plans,
            secondary_max,
            self.context,
        );
        scene.emphasis = self
            .window_stats()
            .map(|s| s.emphasis(self.config.significant_variation_pct));
        scene
    }

    // ── Internal ────────────────────────────────────────────────────

    fn publish_window_stats(&mut self) {
        let stats = self.window_stats();
        self.stats_tx.send_replace(stats);
    }

    fn schedule_commit(&mut self, now: Instant) {
        if !self.viewport.is_initialized() {
            return;
        }
        let table = self.table();
        self.viewport.schedule_commit(&table, now);
    }

    fn dispatch(&self, commit: models::settings::SettingsCommit) -> Option<JoinHandle<()>> {
        match &self.committer {
            Some(committer) => committer.dispatch(commit),
            None => {
                log::debug!("No settings store attached; commit for '{}' discarded", self.scope);
                None
            }
        }
    }
}
