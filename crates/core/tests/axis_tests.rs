// ═══════════════════════════════════════════════════════════════════
// Axis Tests — nice steps, major/minor tick planning, dual-axis plans
// ═══════════════════════════════════════════════════════════════════

use wealth_chart_core::models::viewport::{
    DateRange, DisplayMode, ValueRange, ValueRangeByMode, ViewportState,
};
use wealth_chart_core::services::axis_service::{
    nice_step, secondary_range, AxisPlanner, DEGENERATE_SPAN,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn viewport(mode: DisplayMode, show_minor: bool) -> ViewportState {
    ViewportState {
        date_range: DateRange::new(0, 10),
        value_range_by_mode: ValueRangeByMode {
            percent: ValueRange::new(0.0, 100.0),
            absolute: ValueRange::new(0.0, 1000.0),
        },
        display_mode: mode,
        show_major_grid: true,
        show_minor_grid: show_minor,
    }
}

// ── nice_step thresholds ────────────────────────────────────────────

mod nice_steps {
    use super::*;

    #[test]
    fn exact_powers_of_ten_stay() {
        assert!(approx(nice_step(1.0), 1.0));
        assert!(approx(nice_step(10.0), 10.0));
        assert!(approx(nice_step(0.1), 0.1));
    }

    #[test]
    fn thresholds_are_strict() {
        assert!(approx(nice_step(1.5), 2.0));
        assert!(approx(nice_step(2.0), 2.0));
        assert!(approx(nice_step(2.5), 5.0));
        assert!(approx(nice_step(5.0), 5.0));
        assert!(approx(nice_step(5.1), 10.0));
    }

    #[test]
    fn scales_with_magnitude() {
        assert!(approx(nice_step(12.5), 20.0));
        assert!(approx(nice_step(125.0), 200.0));
        assert!(approx(nice_step(0.03), 0.05));
    }

    #[test]
    fn non_positive_or_non_finite_fall_back_to_one() {
        assert_eq!(nice_step(0.0), 1.0);
        assert_eq!(nice_step(-4.0), 1.0);
        assert_eq!(nice_step(f64::NAN), 1.0);
        assert_eq!(nice_step(f64::INFINITY), 1.0);
    }
}

// ── Major ticks ─────────────────────────────────────────────────────

mod major_ticks {
    use super::*;

    #[test]
    fn zero_to_hundred() {
        let plan = AxisPlanner::default().plan(0.0, 100.0);
        assert_eq!(plan.major_step, 20.0);
        assert_eq!(plan.major_ticks, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        assert!(plan.minor_ticks.is_empty());
    }

    #[test]
    fn first_tick_below_min_is_dropped() {
        let plan = AxisPlanner::default().plan(-50.0, 100.0);
        assert_eq!(plan.major_step, 20.0);
        assert_eq!(
            plan.major_ticks,
            vec![-40.0, -20.0, 0.0, 20.0, 40.0, 60.0, 80.0, 100.0]
        );
    }

    #[test]
    fn degenerate_range_uses_default_span() {
        let plan = AxisPlanner::default().plan(0.0, 0.0);
        assert!(plan.major_step > 0.0);
        assert_eq!(plan.major_step, 20.0);
        assert_eq!(plan.major_ticks, vec![-40.0, -20.0, 0.0, 20.0, 40.0]);
        let span = plan.major_ticks.last().unwrap() - plan.major_ticks.first().unwrap();
        assert!(span <= DEGENERATE_SPAN);
    }

    #[test]
    fn degenerate_range_away_from_zero() {
        let plan = AxisPlanner::default().plan(250.0, 250.0);
        assert!(plan.major_ticks.iter().all(|&t| (200.0..=300.0).contains(&t)));
        assert!(plan.major_ticks.contains(&250.0) || plan.major_ticks.contains(&260.0));
    }

    #[test]
    fn inverted_range_is_swapped() {
        let a = AxisPlanner::default().plan(100.0, 0.0);
        let b = AxisPlanner::default().plan(0.0, 100.0);
        assert_eq!(a, b);
    }

    #[test]
    fn non_finite_bounds_do_not_panic() {
        let plan = AxisPlanner::default().plan(f64::NAN, f64::INFINITY);
        assert!(plan.major_step > 0.0);
        assert!(!plan.major_ticks.is_empty());
    }

    #[test]
    fn fractional_steps_have_no_float_noise() {
        let plan = AxisPlanner::default().plan(0.0, 1.6);
        assert_eq!(plan.major_step, 0.2);
        assert!(plan.major_ticks.contains(&0.6));
        assert!(plan.major_ticks.contains(&1.4));
    }

    #[test]
    fn target_tick_count_changes_density() {
        let coarse = AxisPlanner::new(4).plan(0.0, 100.0);
        let fine = AxisPlanner::new(20).plan(0.0, 100.0);
        assert!(coarse.major_step > fine.major_step);
        assert_eq!(AxisPlanner::new(0).target_tick_count(), 1);
    }

    #[test]
    fn ticks_are_ordered_contained_and_positive_step() {
        let planner = AxisPlanner::default();
        let ranges = [
            (0.0, 1.0),
            (-17.3, 42.9),
            (-1e6, 3.5e6),
            (0.0001, 0.0009),
            (999.0, 1001.0),
            (-5.0, -4.0),
            (3.0, 3.0),
        ];
        for (min, max) in ranges {
            let plan = planner.plan(min, max);
            assert!(plan.major_step > 0.0, "step for {min}..{max}");
            assert!(
                plan.major_ticks.windows(2).all(|w| w[0] <= w[1]),
                "ordering for {min}..{max}"
            );
            let (lo, hi) = if min == max {
                (min - DEGENERATE_SPAN / 2.0, min + DEGENERATE_SPAN / 2.0)
            } else {
                (min, max)
            };
            assert!(
                plan.major_ticks.iter().all(|&t| t >= lo && t <= hi),
                "containment for {min}..{max}: {:?}",
                plan.major_ticks
            );
        }
    }

    #[test]
    fn tick_count_is_bounded() {
        let plan = AxisPlanner::new(1_000_000).plan(0.0, 1.0);
        assert!(plan.major_ticks.len() <= 1000);
    }

    #[test]
    fn subnormal_span_is_widened_to_default() {
        let plan = AxisPlanner::default().plan_with_minor(0.0, 5e-323, true);
        assert!(plan.major_step > 0.0);
        assert!(plan.major_step.is_finite());
        assert!(!plan.major_ticks.is_empty());
        assert!(plan
            .major_ticks
            .iter()
            .all(|&t| t >= -DEGENERATE_SPAN / 2.0 && t <= DEGENERATE_SPAN / 2.0));
    }

    #[test]
    fn near_max_float_span_still_has_ticks() {
        let plan = AxisPlanner::default().plan(-1.7e308, 1.7e308);
        assert!(plan.major_step > 0.0);
        assert!(plan.major_step.is_finite());
        assert!(!plan.major_ticks.is_empty());
        assert!(plan.major_ticks.iter().all(|t| t.is_finite()));
        assert!(plan.major_ticks.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn degenerate_range_at_max_float_stays_finite() {
        let plan = AxisPlanner::default().plan(f64::MAX, f64::MAX);
        assert!(plan.major_step > 0.0);
        assert!(plan.major_ticks.iter().all(|t| t.is_finite()));
    }

    #[test]
    fn coarse_float_resolution_yields_no_repeated_ticks() {
        for (min, max) in [(1e16, 1e16 + 2.0), (1e16, 1e16 + 8.0)] {
            let plan = AxisPlanner::default().plan(min, max);
            assert!(plan.major_step > 0.0);
            assert!(!plan.major_ticks.is_empty());
            assert!(
                plan.major_ticks.windows(2).all(|w| w[0] < w[1]),
                "repeated ticks for {min}..{max}: {:?}",
                plan.major_ticks
            );
            assert!(plan.major_ticks.len() <= 20, "{:?}", plan.major_ticks);
        }
    }
}

// ── Minor ticks ─────────────────────────────────────────────────────

mod minor_ticks {
    use super::*;

    #[test]
    fn half_steps_between_majors() {
        let plan = AxisPlanner::default().plan_with_minor(0.0, 100.0, true);
        assert_eq!(plan.minor_step(), 10.0);
        assert_eq!(plan.minor_ticks, vec![10.0, 30.0, 50.0, 70.0, 90.0]);
    }

    #[test]
    fn never_coincide_with_majors() {
        let plan = AxisPlanner::default().plan_with_minor(-17.3, 42.9, true);
        let tol = plan.major_step / 100.0;
        for minor in &plan.minor_ticks {
            assert!(plan.major_ticks.iter().all(|m| (m - minor).abs() >= tol));
        }
    }

    #[test]
    fn omitted_when_not_requested() {
        let plan = AxisPlanner::default().plan_with_minor(0.0, 100.0, false);
        assert!(plan.minor_ticks.is_empty());
    }
}

// ── Dual-axis plans ─────────────────────────────────────────────────

mod axis_plans {
    use super::*;

    #[test]
    fn percent_mode_with_minor_grid() {
        let plans = AxisPlanner::default().plan_axes(&viewport(DisplayMode::Percent, true), Some(5000.0));
        assert!(!plans.primary.minor_ticks.is_empty());
        assert!(plans.secondary.is_none());
    }

    #[test]
    fn percent_mode_without_minor_grid() {
        let plans = AxisPlanner::default().plan_axes(&viewport(DisplayMode::Percent, false), None);
        assert!(plans.primary.minor_ticks.is_empty());
    }

    #[test]
    fn absolute_mode_never_has_minor_ticks() {
        let plans = AxisPlanner::default().plan_axes(&viewport(DisplayMode::Absolute, true), Some(5000.0));
        assert!(plans.primary.minor_ticks.is_empty());
        assert_eq!(plans.primary.major_ticks.first(), Some(&0.0));
        assert_eq!(plans.primary.major_ticks.last(), Some(&1000.0));
    }

    #[test]
    fn absolute_mode_plans_secondary_anchored_at_zero() {
        let plans = AxisPlanner::default().plan_axes(&viewport(DisplayMode::Absolute, false), Some(1000.0));
        let secondary = plans.secondary.unwrap();
        assert_eq!(secondary.major_step, 200.0);
        assert_eq!(
            secondary.major_ticks,
            vec![0.0, 200.0, 400.0, 600.0, 800.0, 1000.0]
        );
        assert!(secondary.minor_ticks.is_empty());
    }

    #[test]
    fn secondary_range_is_never_negative() {
        assert_eq!(secondary_range(Some(1500.0)), ValueRange::new(0.0, 1500.0));
        assert_eq!(secondary_range(Some(-20.0)), ValueRange::new(0.0, DEGENERATE_SPAN));
        assert_eq!(secondary_range(None), ValueRange::new(0.0, DEGENERATE_SPAN));
        assert_eq!(secondary_range(Some(f64::NAN)), ValueRange::new(0.0, DEGENERATE_SPAN));
    }
}
