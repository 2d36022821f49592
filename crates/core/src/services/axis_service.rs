use crate::models::axis::{AxisPlans, TickPlan};
use crate::models::viewport::{DisplayMode, ValueRange, ViewportState};

/// Span substituted for a zero-width range.
pub const DEGENERATE_SPAN: f64 = 100.0;

/// Hard cap on generated ticks per list.
pub const MAX_TICK_ITERATIONS: usize = 1000;

pub const DEFAULT_TARGET_TICK_COUNT: usize = 8;

/// Plans "nice" 1-2-5 tick grids for value axes.
///
/// Cheap enough to run unmemoized on every drag frame.
#[derive(Debug, Clone)]
pub struct AxisPlanner {
    target_tick_count: usize,
}

impl AxisPlanner {
    pub fn new(target_tick_count: usize) -> Self {
        Self {
            target_tick_count: target_tick_count.max(1),
        }
    }

    pub fn target_tick_count(&self) -> usize {
        self.target_tick_count
    }

    /// Major ticks only.
    pub fn plan(&self, min: f64, max: f64) -> TickPlan {
        self.plan_with_minor(min, max, false)
    }

    /// Plan a grid for `[min, max]`, adding half-step minor ticks when asked.
    ///
    /// A zero-width range (or one narrower than float precision at its
    /// magnitude) is widened to `DEGENERATE_SPAN` around `min`; an inverted
    /// range is swapped; non-finite bounds become zero.
    pub fn plan_with_minor(&self, min: f64, max: f64, include_minor: bool) -> TickPlan {
        let (min, max) = normalize_range(min, max);
        // Halved before subtracting so spans near f64::MAX stay finite.
        let half_span = max / 2.0 - min / 2.0;
        let major_step = nice_step(half_span / self.target_tick_count as f64 * 2.0);

        let major_ticks = ticks_in_range(min, max, major_step, |_| true);
        let minor_ticks = if include_minor {
            let tolerance = major_step / 100.0;
            ticks_in_range(min, max, major_step / 2.0, |v| {
                ((v / major_step).round() * major_step - v).abs() >= tolerance
            })
        } else {
            Vec::new()
        };

        TickPlan {
            major_step,
            major_ticks,
            minor_ticks,
        }
    }

    /// Plans for both axes of one render.
    ///
    /// Minor ticks exist only in Percent mode with the minor grid enabled.
    /// In Absolute mode a second, major-only plan anchored at zero is
    /// produced for the portfolio axis, up to `secondary_max`.
    pub fn plan_axes(&self, viewport: &ViewportState, secondary_max: Option<f64>) -> AxisPlans {
        let active = viewport.active_value_range();
        let include_minor =
            viewport.show_minor_grid && viewport.display_mode == DisplayMode::Percent;
        let primary = self.plan_with_minor(active.min, active.max, include_minor);

        let secondary = match viewport.display_mode {
            DisplayMode::Absolute => {
                let range = secondary_range(secondary_max);
                Some(self.plan(range.min, range.max))
            }
            DisplayMode::Percent => None,
        };

        AxisPlans { primary, secondary }
    }
}

impl Default for AxisPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_TICK_COUNT)
    }
}

/// Range of the secondary axis: always `[0, max]`, never negative. Without
/// a positive maximum the axis spans `[0, DEGENERATE_SPAN]`.
pub fn secondary_range(max: Option<f64>) -> ValueRange {
    let max = max
        .filter(|m| m.is_finite() && *m > 0.0)
        .unwrap_or(DEGENERATE_SPAN);
    ValueRange::new(0.0, max)
}

/// 1-2-5 scheme scaled by a power of ten, with strict thresholds:
/// `> 5 → 10`, `> 2 → 5`, `> 1 → 2`, else `1`.
pub fn nice_step(raw_step: f64) -> f64 {
    if !raw_step.is_finite() || raw_step <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powi(raw_step.log10().floor() as i32);
    if !magnitude.is_finite() || magnitude <= 0.0 {
        return raw_step;
    }
    let normalized = raw_step / magnitude;
    let nice = if normalized > 5.0 {
        10.0
    } else if normalized > 2.0 {
        5.0
    } else if normalized > 1.0 {
        2.0
    } else {
        1.0
    };
    let step = nice * magnitude;
    if step.is_finite() && step > 0.0 {
        step
    } else {
        raw_step
    }
}

fn normalize_range(min: f64, max: f64) -> (f64, f64) {
    let min = if min.is_finite() { min } else { 0.0 };
    let max = if max.is_finite() { max } else { 0.0 };
    let (min, max) = if min > max { (max, min) } else { (min, max) };
    let scale = min.abs().max(max.abs()).max(1.0);
    if max - min <= f64::EPSILON * scale {
        // At large magnitudes the default span is below float resolution.
        let half = (DEGENERATE_SPAN / 2.0).max(scale * 1e-12);
        ((min - half).max(f64::MIN), (min + half).min(f64::MAX))
    } else {
        (min, max)
    }
}

/// Multiples of `step` inside `[min, max]`, starting at `floor(min/step)*step`.
fn ticks_in_range<F>(min: f64, max: f64, step: f64, keep: F) -> Vec<f64>
where
    F: Fn(f64) -> bool,
{
    let eps = step * 1e-9;
    let first = (min / step).floor();
    let mut ticks: Vec<f64> = Vec::new();
    let mut previous: Option<f64> = None;

    for i in 0..MAX_TICK_ITERATIONS {
        let v = snap((first + i as f64) * step, step);
        if v > max + eps {
            break;
        }
        // Far from zero, consecutive multiples can round to the same float.
        if previous.is_some_and(|p| v <= p) {
            continue;
        }
        previous = Some(v);
        if v >= min - eps && keep(v) {
            ticks.push(v.clamp(min, max));
        }
    }
    ticks
}

/// Round away floating-point noise relative to the step size.
fn snap(v: f64, step: f64) -> f64 {
    let decimals = ((-step.log10().floor()).max(0.0) as i32)
        .saturating_add(1)
        .min(300);
    let factor = 10f64.powi(decimals);
    let scaled = v * factor;
    if !scaled.is_finite() {
        return v;
    }
    scaled.round() / factor + 0.0
}
