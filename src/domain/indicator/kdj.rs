//! KDJ stochastic oscillator.
//!
//! RSV = 100 * (C - LLV(L, n)) / (HHV(H, n) - LLV(L, n))
//! K = (m1-1)/m1 * K[-1] + RSV/m1
//! D = (m2-1)/m2 * D[-1] + K/m2
//! J = 3K - 2D
//!
//! K and D are seeded at 50 on the first bar regardless of data, so every bar
//! is valid. RSV is 50 while the n-bar window is incomplete and whenever the
//! window's high/low range is zero. The recurrence runs over the entire input,
//! so values for a given day depend on how much leading history was supplied.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{rolling_max, rolling_min};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_N: usize = 9;
pub const DEFAULT_M1: usize = 3;
pub const DEFAULT_M2: usize = 3;

/// Neutral value used for the K/D seed and for undefined RSV.
pub const NEUTRAL: f64 = 50.0;

/// Raw stochastic value per bar.
pub fn rsv_values(bars: &[OhlcvBar], n: usize) -> Vec<f64> {
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let llv = rolling_min(&lows, n);
    let hhv = rolling_max(&highs, n);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let range = hhv[i] - llv[i];
            if range.is_nan() || range == 0.0 {
                NEUTRAL
            } else {
                100.0 * (bar.close - llv[i]) / range
            }
        })
        .collect()
}

pub fn calculate_kdj(bars: &[OhlcvBar], n: usize, m1: usize, m2: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Kdj { n, m1, m2 };
    if bars.is_empty() || n == 0 || m1 == 0 || m2 == 0 {
        return IndicatorSeries::empty(indicator_type);
    }

    let rsv = rsv_values(bars, n);
    let (m1, m2) = (m1 as f64, m2 as f64);

    let mut values = Vec::with_capacity(bars.len());
    let mut k = NEUTRAL;
    let mut d = NEUTRAL;

    for (i, bar) in bars.iter().enumerate() {
        if i > 0 {
            k = (m1 - 1.0) / m1 * k + 1.0 / m1 * rsv[i];
            d = (m2 - 1.0) / m2 * d + 1.0 / m2 * k;
        }
        values.push(IndicatorPoint {
            date: bar.date,
            valid: true,
            value: IndicatorValue::Kdj {
                k,
                d,
                j: 3.0 * k - 2.0 * d,
            },
        });
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}
