//! Simple moving averages of close price and of volume.
//!
//! MA(n)[i] = mean(C[i-n+1..=i])
//! Warmup: first (n-1) bars are invalid and carry NAN.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::rolling_mean;
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    build_series(bars, &closes, period, IndicatorType::Sma(period))
}

pub fn calculate_volume_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    build_series(bars, &volumes, period, IndicatorType::VolumeSma(period))
}

fn build_series(
    bars: &[OhlcvBar],
    input: &[f64],
    period: usize,
    indicator_type: IndicatorType,
) -> IndicatorSeries {
    let means = rolling_mean(input, period);
    let values = bars
        .iter()
        .zip(means)
        .map(|(bar, mean)| IndicatorPoint {
            date: bar.date,
            valid: !mean.is_nan(),
            value: IndicatorValue::Simple(mean),
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
