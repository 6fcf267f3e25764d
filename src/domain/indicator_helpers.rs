//! Shared helper functions for indicator calculations.

use crate::domain::indicator::{
    calculate_kdj, calculate_macd, calculate_sma, calculate_volume_sma,
    IndicatorSeries, IndicatorType,
};
use crate::domain::ohlcv::OhlcvBar;
use std::collections::HashMap;

/// Trailing simple mean over `period` values; `NAN` until the window fills.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Trailing minimum over `period` values; `NAN` until the window fills.
pub fn rolling_min(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| w.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Trailing maximum over `period` values; `NAN` until the window fills.
pub fn rolling_max(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| {
        w.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

fn rolling<F>(values: &[f64], period: usize, reduce: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    if period == 0 {
        return vec![f64::NAN; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                f64::NAN
            } else {
                reduce(&values[i + 1 - period..=i])
            }
        })
        .collect()
}

/// Compute every requested indicator over `bars`, keyed by type.
pub fn compute_indicators(
    bars: &[OhlcvBar],
    types: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    let mut out = HashMap::with_capacity(types.len());
    for &indicator_type in types {
        if out.contains_key(&indicator_type) {
            continue;
        }
        let series = match indicator_type {
            IndicatorType::Sma(period) => calculate_sma(bars, period),
            IndicatorType::VolumeSma(period) => calculate_volume_sma(bars, period),
            IndicatorType::Kdj { n, m1, m2 } => calculate_kdj(bars, n, m1, m2),
            IndicatorType::Macd { fast, slow, signal } => calculate_macd(bars, fast, slow, signal),
        };
        out.insert(indicator_type, series);
    }
    out
}
