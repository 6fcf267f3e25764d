//! Integration tests for the screening and backtest pipelines.
//!
//! Tests cover:
//! - Universe loading through a mock data port with per-symbol isolation
//! - Screening a mixed universe
//! - Backtest over a universe with known trades
//! - Symbols with too little history yield neutral statistics
//! - Parallel aggregation is deterministic across runs

mod common;

use common::*;
use dayscreen::adapters::file_config_adapter::FileConfigAdapter;
use dayscreen::domain::backtest::{DateRange, backtest_all, backtest_symbol};
use dayscreen::domain::config_validation::load_params;
use dayscreen::domain::error::DayscreenError;
use dayscreen::domain::metrics::TradeStats;
use dayscreen::domain::params::{Params, StrategyVariant};
use dayscreen::domain::position::ExitReason;
use dayscreen::domain::screener::screen_all;
use dayscreen::domain::universe::{SkipReason, load_universe};
use chrono::NaiveDate;

fn start() -> NaiveDate {
    date(2024, 1, 1)
}

fn all_codes(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

mod universe_loading {
    use super::*;

    #[test]
    fn partial_universe_proceeds() {
        let mut broken = generate_flat_bars(start(), 40, 10.0);
        broken[12].close = 20.0;
        let port = MockDataPort::new()
            .with_bars("600519", generate_dip_bars(start(), 5))
            .with_name("600519", "Kweichow Moutai")
            .with_bars("000001", broken)
            .with_bars("300750", generate_flat_bars(start(), 12, 10.0))
            .with_error("601318", "connection reset");

        let codes = all_codes(&["600519", "000001", "300750", "601318"]);
        let result = load_universe(&port, &codes, NaiveDate::MIN, NaiveDate::MAX, 30).unwrap();

        assert_eq!(result.series.len(), 1);
        assert_eq!(result.series[0].name, "Kweichow Moutai");
        assert_eq!(result.skipped.len(), 3);

        let reason_for = |code: &str| {
            result
                .skipped
                .iter()
                .find(|s| s.code == code)
                .map(|s| s.reason.clone())
                .unwrap()
        };
        assert!(matches!(reason_for("000001"), SkipReason::Malformed { index: 12, .. }));
        assert_eq!(reason_for("300750"), SkipReason::InsufficientBars { bars: 12 });
        assert!(matches!(reason_for("601318"), SkipReason::FetchFailed(r) if r.contains("connection reset")));
    }

    #[test]
    fn whole_universe_failing_is_an_error() {
        let port = MockDataPort::new().with_error("601318", "timeout");
        let err = load_universe(&port, &all_codes(&["601318"]), NaiveDate::MIN, NaiveDate::MAX, 30)
            .unwrap_err();
        assert!(matches!(err, DayscreenError::InsufficientData { .. }));
    }

    #[test]
    fn fetch_window_limits_history() {
        let port = MockDataPort::new().with_bars("600519", generate_dip_bars(start(), 5));
        let result = load_universe(
            &port,
            &all_codes(&["600519"]),
            NaiveDate::MIN,
            day(start(), 64),
            30,
        )
        .unwrap();
        assert_eq!(result.series[0].len(), 65);
    }
}

mod screening {
    use super::*;

    #[test]
    fn only_signalling_symbols_are_reported() {
        let universe = vec![
            make_series("600519", generate_dip_bars(start(), 0)),
            make_series("000001", generate_flat_bars(start(), 80, 10.0)),
            make_series("300750", generate_dip_bars(start(), 1)),
        ];
        let rows = screen_all(&universe, &Params::default(), None);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].code, "600519");
        assert_eq!(rows[0].date, day(start(), 64));
        assert!(rows[0].j < 0.0);
        assert!(rows[0].diff > 0.0);
    }

    #[test]
    fn as_of_date_replays_past_signal() {
        let universe = vec![make_series("300750", generate_dip_bars(start(), 1))];
        let rows = screen_all(&universe, &Params::default(), Some(day(start(), 64)));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].code, "300750");
    }

    #[test]
    fn trend_variant_requires_uptrend() {
        let config = FileConfigAdapter::from_string("[signal]\nvariant = trend_pullback\n").unwrap();
        let params = load_params(&config).unwrap();
        assert_eq!(params.variant, StrategyVariant::TrendPullback);

        let universe = vec![make_series("600519", generate_dip_bars(start(), 0))];
        assert!(screen_all(&universe, &params, None).is_empty());
    }
}

mod backtest_pipeline {
    use super::*;

    fn full_range() -> DateRange {
        DateRange::new(start(), date(2024, 12, 31)).unwrap()
    }

    #[test]
    fn known_trade_per_symbol() {
        let universe = vec![
            make_series("600519", generate_dip_bars(start(), 6)),
            make_series("000001", generate_flat_bars(start(), 90, 10.0)),
        ];
        let result = backtest_all(&universe, &Params::default(), &full_range());

        assert_eq!(result.symbols_tested, 2);
        assert_eq!(result.total_trades(), 1);
        let t = &result.trades[0];
        assert_eq!(t.code, "600519");
        assert_eq!(t.name, "Name 600519");
        assert_eq!(t.entry_date, day(start(), 64));
        assert_eq!(t.exit_date, day(start(), 68));
        assert_eq!(t.exit_reason, ExitReason::TakeProfit);
        assert_eq!(t.holding_days, 4);
        assert!((result.stats.win_rate - 1.0).abs() < f64::EPSILON);
        assert_eq!(result.stats.profit_loss_ratio, 0.0);
    }

    #[test]
    fn wider_take_profit_turns_rebound_into_timeout() {
        let config = FileConfigAdapter::from_string(
            "[backtest]\ntake_profit = 0.5\nmax_holding_days = 3\n",
        )
        .unwrap();
        let params = load_params(&config).unwrap();
        let series = make_series("600519", generate_dip_bars(start(), 6));
        let trades = backtest_symbol(&series, &params, &full_range());

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].exit_reason, ExitReason::Timeout);
        assert_eq!(trades[0].exit_date, day(start(), 67));
    }

    #[test]
    fn short_histories_give_neutral_statistics() {
        let universe: Vec<_> = ["600519", "000001", "300750"]
            .iter()
            .map(|code| make_series(code, generate_flat_bars(start(), 25, 10.0)))
            .collect();
        let result = backtest_all(&universe, &Params::default(), &full_range());

        assert!(result.trades.is_empty());
        assert_eq!(result.stats, TradeStats::default());
    }

    #[test]
    fn window_limits_entries_but_not_indicator_history() {
        // Window starts at bar 34: 31 in-window bars reach the signal at 64.
        let series = make_series("600519", generate_dip_bars(start(), 6));
        let range = DateRange::new(day(start(), 34), day(start(), 70)).unwrap();
        let trades = backtest_symbol(&series, &Params::default(), &range);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].entry_date, day(start(), 64));

        // Starting at bar 40 leaves the signal before the scan start.
        let late = DateRange::new(day(start(), 40), day(start(), 70)).unwrap();
        assert!(backtest_symbol(&series, &Params::default(), &late).is_empty());
    }

    #[test]
    fn parallel_runs_are_deterministic() {
        let universe: Vec<_> = (0..12)
            .map(|k| {
                let code = format!("60{k:04}");
                if k % 3 == 0 {
                    make_series(&code, generate_flat_bars(start(), 70, 10.0))
                } else {
                    make_series(&code, generate_dip_bars(start(), k))
                }
            })
            .collect();
        let params = Params::default();
        let first = backtest_all(&universe, &params, &full_range());
        for _ in 0..3 {
            assert_eq!(backtest_all(&universe, &params, &full_range()), first);
        }
        assert_eq!(first.total_trades(), 8);
    }
}
