// ═══════════════════════════════════════════════════════════════════
// Analytics Tests — period P&L, Modified Dietz return, emphasis
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use wealth_chart_core::models::analytics::VariationEmphasis;
use wealth_chart_core::models::series::{Series, SeriesKey, TimePoint};
use wealth_chart_core::models::table::PerformanceTable;
use wealth_chart_core::models::viewport::DisplayMode;
use wealth_chart_core::services::alignment_service::AlignmentService;
use wealth_chart_core::services::interpolation_service::InterpolationService;
use wealth_chart_core::services::window_analytics_service::{
    modified_dietz_pct, WindowAnalyticsService,
};

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn build(series: &[Series]) -> PerformanceTable {
    let aligned = AlignmentService::new().align(series, DisplayMode::Percent);
    InterpolationService::new().interpolate(aligned)
}

/// Three portfolio days: invested 1000 throughout the first two, then
/// 500 more deposited before the third.
fn three_day_portfolio() -> PerformanceTable {
    build(&[Series::portfolio(vec![
        TimePoint::new(make_date(2024, 1, 1), 0.0, 1000.0, 0.0),
        TimePoint::new(make_date(2024, 1, 2), 2.0, 1020.0, 20.0),
        TimePoint::new(make_date(2024, 1, 3), 5.0, 1550.0, 50.0),
    ])])
}

// ── Modified Dietz ──────────────────────────────────────────────────

mod modified_dietz {
    use super::*;

    #[test]
    fn no_flows_is_simple_return() {
        assert!(approx(modified_dietz_pct(1000.0, 1000.0, 50.0), 5.0));
    }

    #[test]
    fn flows_are_weighted_half() {
        // avg capital = 1000 + 500 / 2
        assert!(approx(modified_dietz_pct(1000.0, 1500.0, 30.0), 2.4));
    }

    #[test]
    fn zero_average_capital_yields_zero() {
        assert_eq!(modified_dietz_pct(0.0, 0.0, 25.0), 0.0);
        assert_eq!(modified_dietz_pct(100.0, -100.0, 25.0), 0.0);
    }

    #[test]
    fn losses_are_negative() {
        assert!(approx(modified_dietz_pct(2000.0, 2000.0, -100.0), -5.0));
    }
}

// ── Window stats ────────────────────────────────────────────────────

mod window_stats {
    use super::*;

    #[test]
    fn inner_window_uses_modified_dietz() {
        let table = three_day_portfolio();
        let stats = WindowAnalyticsService::new()
            .compute_window_stats(&table, 1, 2, &SeriesKey::Portfolio)
            .unwrap();

        assert!(approx(stats.period_pnl, 30.0));
        assert!(approx(stats.period_return_pct, 2.4));
        assert!(approx(stats.end_market_value, 1550.0));
        assert_eq!(stats.window_start_date, make_date(2024, 1, 2));
        assert_eq!(stats.window_end_date, make_date(2024, 1, 3));
        assert!(!stats.is_full_range);
    }

    #[test]
    fn window_from_first_row_reports_backend_return() {
        let table = three_day_portfolio();
        let stats = WindowAnalyticsService::new()
            .compute_window_stats(&table, 0, 2, &SeriesKey::Portfolio)
            .unwrap();

        assert!(approx(stats.period_pnl, 50.0));
        assert!(approx(stats.period_return_pct, 5.0));
        assert!(stats.is_full_range);
    }

    #[test]
    fn partial_window_from_first_row_is_not_full_range() {
        let table = three_day_portfolio();
        let stats = WindowAnalyticsService::new()
            .compute_window_stats(&table, 0, 1, &SeriesKey::Portfolio)
            .unwrap();

        assert!(approx(stats.period_return_pct, 2.0));
        assert!(!stats.is_full_range);
    }

    #[test]
    fn single_row_window_has_zero_pnl() {
        let table = three_day_portfolio();
        let stats = WindowAnalyticsService::new()
            .compute_window_stats(&table, 1, 1, &SeriesKey::Portfolio)
            .unwrap();

        assert_eq!(stats.period_pnl, 0.0);
        assert_eq!(stats.period_return_pct, 0.0);
        assert_eq!(stats.window_start_date, stats.window_end_date);
    }

    #[test]
    fn indices_are_clamped() {
        let table = three_day_portfolio();
        let stats = WindowAnalyticsService::new()
            .compute_window_stats(&table, 1, 99, &SeriesKey::Portfolio)
            .unwrap();
        assert_eq!(stats.window_end_date, make_date(2024, 1, 3));
        assert!(approx(stats.period_return_pct, 2.4));
    }

    #[test]
    fn asset_bought_late() {
        let asset = Series::asset(
            "BTC",
            "Bitcoin",
            vec![
                TimePoint::new(make_date(2024, 1, 3), 0.0, 500.0, 0.0),
                TimePoint::new(make_date(2024, 1, 4), 12.0, 560.0, 60.0),
            ],
        );
        let portfolio = Series::portfolio(vec![
            TimePoint::new(make_date(2024, 1, 1), 0.0, 1000.0, 0.0),
            TimePoint::new(make_date(2024, 1, 2), 1.0, 1010.0, 10.0),
            TimePoint::new(make_date(2024, 1, 3), 1.0, 1510.0, 10.0),
            TimePoint::new(make_date(2024, 1, 4), 4.0, 1570.0, 70.0),
        ]);
        let table = build(&[portfolio, asset]);
        let btc = SeriesKey::asset("BTC");
        let service = WindowAnalyticsService::new();

        let held = service.compute_window_stats(&table, 2, 3, &btc).unwrap();
        assert!(approx(held.period_pnl, 60.0));
        assert!(approx(held.period_return_pct, 12.0));

        // Before the purchase the start boundary holds nothing and counts as zero:
        // avg capital = 0 + 500 / 2
        let spanning = service.compute_window_stats(&table, 1, 3, &btc).unwrap();
        assert!(approx(spanning.period_pnl, 60.0));
        assert!(approx(spanning.period_return_pct, 24.0));

        let from_start = service.compute_window_stats(&table, 0, 3, &btc).unwrap();
        assert!(approx(from_start.period_return_pct, 12.0));
    }

    #[test]
    fn empty_table_unknown_entity_and_inverted_window() {
        let service = WindowAnalyticsService::new();
        let empty = build(&[]);
        assert!(service
            .compute_window_stats(&empty, 0, 0, &SeriesKey::Portfolio)
            .is_none());

        let table = three_day_portfolio();
        assert!(service
            .compute_window_stats(&table, 0, 2, &SeriesKey::asset("NOPE"))
            .is_none());
        assert!(service
            .compute_window_stats(&table, 2, 1, &SeriesKey::Portfolio)
            .is_none());
    }

    #[test]
    fn stats_serialize_in_camel_case() {
        let table = three_day_portfolio();
        let stats = WindowAnalyticsService::new()
            .compute_window_stats(&table, 0, 2, &SeriesKey::Portfolio)
            .unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("periodPnl").is_some());
        assert!(json.get("periodReturnPct").is_some());
        assert!(json.get("endMarketValue").is_some());
        assert_eq!(json["isFullRange"], serde_json::json!(true));
        assert_eq!(json["windowStartDate"], serde_json::json!("2024-01-01"));
    }
}

// ── Emphasis ────────────────────────────────────────────────────────

mod emphasis {
    use super::*;

    #[test]
    fn classification_against_threshold() {
        assert_eq!(VariationEmphasis::classify(7.0, 5.0), VariationEmphasis::Gain);
        assert_eq!(VariationEmphasis::classify(5.0, 5.0), VariationEmphasis::Gain);
        assert_eq!(VariationEmphasis::classify(4.99, 5.0), VariationEmphasis::Neutral);
        assert_eq!(VariationEmphasis::classify(-5.0, 5.0), VariationEmphasis::Loss);
        assert_eq!(VariationEmphasis::classify(-12.0, -5.0), VariationEmphasis::Loss);
    }

    #[test]
    fn window_stats_emphasis() {
        let table = three_day_portfolio();
        let service = WindowAnalyticsService::new();
        let full = service
            .compute_window_stats(&table, 0, 2, &SeriesKey::Portfolio)
            .unwrap();
        assert_eq!(full.emphasis(5.0), VariationEmphasis::Gain);

        let inner = service
            .compute_window_stats(&table, 1, 2, &SeriesKey::Portfolio)
            .unwrap();
        assert_eq!(inner.emphasis(5.0), VariationEmphasis::Neutral);
    }
}
