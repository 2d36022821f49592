use crate::models::axis::{AxisPlans, AxisSide};
use crate::models::chart::{AxisScene, ChartScene, Rgb, SceneSeries, SeriesShape, ScenePoint};
use crate::models::series::SeriesKey;
use crate::models::table::{ColumnInfo, PerformanceTable, SeriesCell};
use crate::models::viewport::{DisplayMode, ViewportState};
use crate::services::axis_service::secondary_range;

/// Deterministic series palette, indexed by asset order.
pub const PALETTE: [Rgb; 10] = [
    Rgb::new(0x1f, 0x77, 0xb4),
    Rgb::new(0xff, 0x7f, 0x0e),
    Rgb::new(0x2c, 0xa0, 0x2c),
    Rgb::new(0xd6, 0x27, 0x28),
    Rgb::new(0x94, 0x67, 0xbd),
    Rgb::new(0x8c, 0x56, 0x4b),
    Rgb::new(0xe3, 0x77, 0xc2),
    Rgb::new(0x7f, 0x7f, 0x7f),
    Rgb::new(0xbc, 0xbd, 0x22),
    Rgb::new(0x17, 0xbe, 0xcf),
];

pub const PORTFOLIO_COLOR: Rgb = Rgb::new(0x3b, 0x82, 0xf6);

pub const DEFAULT_MIN_LIGHTNESS: f64 = 0.35;

/// Whether the chart shows a whole portfolio or a single asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderContext {
    #[default]
    Portfolio,
    /// The aggregate portfolio series is not drawn
    SingleAsset,
}

/// Maps the gap-filled table, the viewport and the tick plans into a
/// drawable scene. Pure: no state, no side effects.
#[derive(Debug, Clone)]
pub struct RenderProjector {
    min_lightness: f64,
}

impl RenderProjector {
    pub fn new(min_lightness: f64) -> Self {
        Self { min_lightness }
    }

    /// Build the scene for `window` (as returned by the viewport model).
    ///
    /// `secondary_max` is the top of the portfolio value axis used in
    /// Absolute mode. A `None` window produces a scene without series.
    pub fn project(
        &self,
        table: &PerformanceTable,
        viewport: &ViewportState,
        window: Option<(usize, usize)>,
        plans: &AxisPlans,
        secondary_max: Option<f64>,
        context: RenderContext,
    ) -> ChartScene {
        let mode = viewport.display_mode;
        let mut series = Vec::new();

        if let Some((start, end)) = window.filter(|(s, e)| s <= e && *e < table.len()) {
            let rows = &table.rows()[start..=end];
            let mut asset_order = 0usize;

            for (col, column) in table.columns().iter().enumerate() {
                if !is_rendered(&column.key, context) {
                    continue;
                }
                let is_portfolio = column.key.is_portfolio();

                let color = if is_portfolio {
                    column_color(column).unwrap_or(PORTFOLIO_COLOR)
                } else {
                    let c = self.series_color(column, asset_order);
                    asset_order += 1;
                    c
                };

                let (axis, shape) = match (is_portfolio, mode) {
                    (true, DisplayMode::Absolute) => (AxisSide::Secondary, SeriesShape::Area),
                    _ => (AxisSide::Primary, SeriesShape::Line),
                };

                let points = rows
                    .iter()
                    .enumerate()
                    .map(|(offset, row)| {
                        let cell = row.cells.get(col).copied().unwrap_or_default();
                        ScenePoint {
                            index: start + offset,
                            date: row.date,
                            y: plotted_value(&cell, mode),
                            interpolated: cell.interpolated,
                        }
                    })
                    .collect();

                series.push(SceneSeries {
                    key: column.key.clone(),
                    name: column.name.clone(),
                    color,
                    axis,
                    shape,
                    points,
                });
            }
        }

        let primary_axis = AxisScene {
            side: AxisSide::Primary,
            range: viewport.active_value_range(),
            ticks: plans.primary.clone(),
            show_major_grid: viewport.show_major_grid,
            show_minor_grid: viewport.show_minor_grid && mode == DisplayMode::Percent,
        };

        let has_secondary_series = series.iter().any(|s| s.axis == AxisSide::Secondary);
        let secondary_axis = match (&plans.secondary, has_secondary_series) {
            (Some(ticks), true) => Some(AxisScene {
                side: AxisSide::Secondary,
                range: secondary_range(secondary_max),
                ticks: ticks.clone(),
                show_major_grid: false,
                show_minor_grid: false,
            }),
            _ => None,
        };

        ChartScene {
            mode,
            window: if series.is_empty() { None } else { window },
            series,
            primary_axis,
            secondary_axis,
            emphasis: None,
        }
    }

    /// Stable color for an asset column: its explicit color when valid,
    /// otherwise the palette entry for its position, lifted to the
    /// lightness floor.
    pub fn series_color(&self, column: &ColumnInfo, order: usize) -> Rgb {
        column_color(column)
            .unwrap_or_else(|| PALETTE[order % PALETTE.len()].with_min_lightness(self.min_lightness))
    }
}

impl Default for RenderProjector {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LIGHTNESS)
    }
}

/// Which field a display mode plots, independent of the mode the table
/// was aligned for.
fn plotted_value(cell: &SeriesCell, mode: DisplayMode) -> Option<f64> {
    match mode {
        DisplayMode::Percent => cell.raw_value,
        DisplayMode::Absolute => cell.market_value,
    }
}

fn column_color(column: &ColumnInfo) -> Option<Rgb> {
    let hex = column.color.as_deref()?;
    match Rgb::from_hex(hex) {
        Ok(c) => Some(c),
        Err(e) => {
            log::warn!("{}: {e}; using palette color", column.key);
            None
        }
    }
}

/// Whether a column is drawn in the given context.
pub fn is_rendered(key: &SeriesKey, context: RenderContext) -> bool {
    !(key.is_portfolio() && context == RenderContext::SingleAsset)
}
