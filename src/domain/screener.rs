//! Latest-bar screening across a universe.

use crate::domain::annotated::{annotate, AnnotatedSeries};
use crate::domain::bar_series::BarSeries;
use crate::domain::params::Params;
use crate::domain::signal::{evaluate_at, reason_text};
use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{debug, info};

/// One qualifying symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenRow {
    pub code: String,
    pub name: String,
    pub date: NaiveDate,
    pub close: f64,
    pub pct_change: f64,
    pub j: f64,
    pub diff: f64,
    pub volume_ratio: f64,
    /// Fraction below the last swing high; trend-pullback variant only.
    pub pullback_pct: Option<f64>,
    pub reason: String,
}

/// Screens the most recent bar of `series`.
pub fn screen_symbol(series: &BarSeries, params: &Params) -> Option<ScreenRow> {
    let annotated = annotate(series, &params.indicators);
    screen_index(&annotated, annotated.len().checked_sub(1)?, params)
}

/// Screens the last bar dated on or before `date`, with indicators computed
/// over the full series.
pub fn screen_symbol_on(series: &BarSeries, params: &Params, date: NaiveDate) -> Option<ScreenRow> {
    let annotated = annotate(series, &params.indicators);
    let index = annotated.index_on_or_before(date)?;
    screen_index(&annotated, index, params)
}

fn screen_index(annotated: &AnnotatedSeries, index: usize, params: &Params) -> Option<ScreenRow> {
    let code = annotated.code();
    if index + 1 < params.signal.min_bars {
        debug!(code, bars = index + 1, "not enough history to screen");
        return None;
    }
    let bar = &annotated.bars()[index];
    if bar.is_limit_up(params.signal.limit_up_pct) {
        debug!(code, pct_change = bar.pct_change, "skipping limit-up day");
        return None;
    }

    let (matched, detail) = evaluate_at(annotated, index, params);
    let detail = detail.filter(|_| matched)?;

    Some(ScreenRow {
        code: code.to_string(),
        name: annotated.name().to_string(),
        date: bar.date,
        close: bar.close,
        pct_change: bar.pct_change,
        j: detail.j,
        diff: detail.diff,
        volume_ratio: detail.volume_ratio,
        pullback_pct: detail.pullback.map(|p| p.pct),
        reason: reason_text(&detail),
    })
}

/// Screens every symbol in parallel; rows keep the input order.
pub fn screen_all(
    all_series: &[BarSeries],
    params: &Params,
    as_of: Option<NaiveDate>,
) -> Vec<ScreenRow> {
    let rows: Vec<ScreenRow> = all_series
        .par_iter()
        .filter_map(|series| match as_of {
            Some(date) => screen_symbol_on(series, params, date),
            None => screen_symbol(series, params),
        })
        .collect();
    info!(
        symbols = all_series.len(),
        matches = rows.len(),
        variant = %params.variant,
        "screening complete"
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::OhlcvBar;

    fn day(i: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64)
    }

    fn bar(i: usize, close: f64, volume: f64, pct_change: f64) -> OhlcvBar {
        OhlcvBar {
            date: day(i),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume,
            amount: None,
            pct_change,
        }
    }

    fn dip_after_rally() -> Vec<OhlcvBar> {
        let mut bars: Vec<OhlcvBar> = (0..60)
            .map(|i| bar(i, 10.0 + i as f64 * 0.2, 10_000.0, 2.0))
            .collect();
        let mut close = bars[59].close;
        for i in 60..64 {
            close *= 0.97;
            bars.push(bar(i, close, 5_000.0, -3.0));
        }
        bars.push(bar(64, close * 0.98, 3_000.0, -2.0));
        bars
    }

    fn series(code: &str, bars: Vec<OhlcvBar>) -> BarSeries {
        BarSeries::new(code, format!("Name {code}"), bars).unwrap()
    }

    #[test]
    fn matching_symbol_yields_row() {
        let row = screen_symbol(&series("600519", dip_after_rally()), &Params::default()).unwrap();
        assert_eq!(row.code, "600519");
        assert_eq!(row.name, "Name 600519");
        assert_eq!(row.date, day(64));
        assert_eq!(row.pct_change, -2.0);
        assert!(row.j < 0.0);
        assert!(row.diff > 0.0);
        assert!(row.volume_ratio < 0.7);
        assert!(row.pullback_pct.is_none());
        assert!(row.reason.contains("entry signal"));
    }

    #[test]
    fn short_history_is_not_eligible() {
        let bars: Vec<OhlcvBar> = dip_after_rally().into_iter().skip(40).collect();
        assert!(screen_symbol(&series("600519", bars), &Params::default()).is_none());
    }

    #[test]
    fn limit_up_day_is_skipped() {
        let mut bars = dip_after_rally();
        bars[64].pct_change = 9.5;
        assert!(screen_symbol(&series("600519", bars), &Params::default()).is_none());
    }

    #[test]
    fn as_of_date_uses_earlier_bar() {
        let mut bars = dip_after_rally();
        bars.push(bar(65, bars[64].close * 1.05, 20_000.0, 5.0));
        let s = series("600519", bars);
        let params = Params::default();

        assert!(screen_symbol(&s, &params).is_none());
        let row = screen_symbol_on(&s, &params, day(64)).unwrap();
        assert_eq!(row.date, day(64));
        assert!(screen_symbol_on(&s, &params, day(0) - chrono::Duration::days(1)).is_none());
    }

    #[test]
    fn screen_all_keeps_input_order() {
        let flat: Vec<OhlcvBar> = (0..60).map(|i| bar(i, 10.0, 1000.0, 0.0)).collect();
        let universe = vec![
            series("600519", dip_after_rally()),
            series("000001", flat),
            series("300750", dip_after_rally()),
        ];
        let rows = screen_all(&universe, &Params::default(), None);
        let codes: Vec<&str> = rows.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["600519", "300750"]);
    }
}
