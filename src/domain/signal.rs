//! Entry-signal evaluation over an annotated series.
//!
//! The base predicate looks for a shrinking-volume, flat-or-down day with an
//! oversold J while DIFF remains positive. The trend-pullback variant first
//! requires an uptrend and a shallow retracement from the latest swing high.

use crate::domain::annotated::AnnotatedSeries;
use crate::domain::params::{Params, SignalParams, StrategyVariant, TrendParams};
use crate::domain::swing::find_swing_points;

const RATIO_EPSILON: f64 = 1e-9;

/// Retracement measured against the most recent swing high.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PullbackDetail {
    /// `(close - swing_high) / swing_high`, a fraction.
    pub pct: f64,
    pub swing_high: f64,
}

/// Values the predicate looked at, for the evaluated bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalDetail {
    pub volume_ratio: f64,
    pub j: f64,
    pub diff: f64,
    pub pct_change: f64,
    pub pullback: Option<PullbackDetail>,
}

/// Evaluates the most recent bar. An empty series never matches and carries
/// no detail.
pub fn evaluate(series: &AnnotatedSeries, params: &Params) -> (bool, Option<SignalDetail>) {
    match series.len() {
        0 => (false, None),
        n => evaluate_at(series, n - 1, params),
    }
}

/// Evaluates bar `index`, looking only at bars up to and including it.
pub fn evaluate_at(
    series: &AnnotatedSeries,
    index: usize,
    params: &Params,
) -> (bool, Option<SignalDetail>) {
    let Some(mut detail) = base_detail(series, index) else {
        return (false, None);
    };

    if params.variant == StrategyVariant::TrendPullback {
        if !trend_filter(series, index, params.indicators.ma_short, params.indicators.ma_long) {
            return (false, Some(detail));
        }
        detail.pullback = pullback(series, index, &params.trend);
        let close = series.bars()[index].close;
        match detail.pullback {
            Some(p) if meets_pullback(close, p.swing_high, params.trend.pullback_ratio) => {}
            _ => return (false, Some(detail)),
        }
    }

    (base_predicate(&detail, &params.signal), Some(detail))
}

/// `volume / VOL_MA`, or 1 when the average is undefined or zero.
pub fn volume_ratio(volume: f64, volume_ma: Option<f64>) -> f64 {
    match volume_ma {
        Some(ma) if ma > 0.0 => volume / ma,
        _ => 1.0,
    }
}

fn base_detail(series: &AnnotatedSeries, index: usize) -> Option<SignalDetail> {
    let bar = series.bars().get(index)?;
    let kdj = series.kdj(index)?;
    let macd = series.macd(index)?;
    Some(SignalDetail {
        volume_ratio: volume_ratio(bar.volume, series.volume_ma(index)),
        j: kdj.j,
        diff: macd.diff,
        pct_change: bar.pct_change,
        pullback: None,
    })
}

fn base_predicate(detail: &SignalDetail, p: &SignalParams) -> bool {
    let volume_ok = detail.volume_ratio < p.volume_ratio_threshold;
    let change_ok = detail.pct_change <= p.change_threshold;
    let kdj_ok = detail.j < p.j_threshold;
    let macd_ok = detail.diff > p.diff_threshold;
    volume_ok && change_ok && kdj_ok && macd_ok
}

fn trend_filter(series: &AnnotatedSeries, index: usize, short: usize, long: usize) -> bool {
    let (Some(close), Some(ma_short), Some(ma_long)) = (
        series.close(index),
        series.ma(short, index),
        series.ma(long, index),
    ) else {
        return false;
    };
    ma_short > ma_long && close > ma_short
}

/// `close >= swing_high * ratio`, inclusive of a close landing on the line.
fn meets_pullback(close: f64, swing_high: f64, ratio: f64) -> bool {
    close / swing_high >= ratio - RATIO_EPSILON
}

/// Finds the latest swing high in the trailing `lookback_days` bars ending at
/// `index` and measures the close against it.
fn pullback(series: &AnnotatedSeries, index: usize, p: &TrendParams) -> Option<PullbackDetail> {
    let start = (index + 1).saturating_sub(p.lookback_days);
    let window = series.bars().get(start..=index)?;
    if window.len() < p.min_bars {
        return None;
    }
    let swings = find_swing_points(window, p.swing_half_width);
    let swing_high = window[swings.last_high()?].high;
    let close = window[window.len() - 1].close;
    Some(PullbackDetail {
        pct: (close - swing_high) / swing_high,
        swing_high,
    })
}

/// Human-readable explanation of a match.
pub fn reason_text(detail: &SignalDetail) -> String {
    let mut reason = format!(
        "Shrinking volume (ratio {:.2}), change {:.1}%, J {:.1} in oversold zone, \
         DIFF {:.2} still bullish; entry signal.",
        detail.volume_ratio, detail.pct_change, detail.j, detail.diff
    );
    if let Some(p) = detail.pullback {
        reason.push_str(&format!(
            " Pullback {:.1}% from swing high {:.2}.",
            p.pct * 100.0,
            p.swing_high
        ));
    }
    reason
}
