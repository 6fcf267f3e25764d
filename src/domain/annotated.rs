//! Bar series annotated with the configured indicator set.

use crate::domain::bar_series::BarSeries;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::compute_indicators;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::params::IndicatorParams;
use chrono::NaiveDate;
use std::collections::HashMap;

/// KDJ values for one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KdjPoint {
    pub k: f64,
    pub d: f64,
    pub j: f64,
}

/// MACD values for one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub diff: f64,
    pub dea: f64,
    pub histogram: f64,
}

/// A [`BarSeries`] plus one indicator series per configured indicator, all
/// aligned index-for-index with the bars.
#[derive(Debug, Clone)]
pub struct AnnotatedSeries {
    series: BarSeries,
    params: IndicatorParams,
    indicators: HashMap<IndicatorType, IndicatorSeries>,
}

/// Computes every indicator in `params` over the full series.
///
/// The input is left untouched; calling this twice on the same series yields
/// bit-identical values.
pub fn annotate(series: &BarSeries, params: &IndicatorParams) -> AnnotatedSeries {
    let indicators = compute_indicators(series.bars(), &params.indicator_types());
    AnnotatedSeries {
        series: series.clone(),
        params: params.clone(),
        indicators,
    }
}

impl AnnotatedSeries {
    pub fn bars(&self) -> &[OhlcvBar] {
        self.series.bars()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn code(&self) -> &str {
        &self.series.code
    }

    pub fn name(&self) -> &str {
        &self.series.name
    }

    pub fn indicator(&self, indicator_type: &IndicatorType) -> Option<&IndicatorSeries> {
        self.indicators.get(indicator_type)
    }

    pub fn close(&self, index: usize) -> Option<f64> {
        self.bars().get(index).map(|b| b.close)
    }

    /// Price moving average; `None` during warm-up or for an unconfigured period.
    pub fn ma(&self, period: usize, index: usize) -> Option<f64> {
        self.indicator(&IndicatorType::Sma(period))?.simple_at(index)
    }

    pub fn volume_ma(&self, index: usize) -> Option<f64> {
        self.indicator(&self.params.volume_ma_type())?
            .simple_at(index)
    }

    pub fn kdj(&self, index: usize) -> Option<KdjPoint> {
        match self.indicator(&self.params.kdj_type())?.value_at(index)? {
            IndicatorValue::Kdj { k, d, j } => Some(KdjPoint { k, d, j }),
            _ => None,
        }
    }

    pub fn macd(&self, index: usize) -> Option<MacdPoint> {
        match self.indicator(&self.params.macd_type())?.value_at(index)? {
            IndicatorValue::Macd {
                diff,
                dea,
                histogram,
            } => Some(MacdPoint {
                diff,
                dea,
                histogram,
            }),
            _ => None,
        }
    }

    /// Index of the last bar dated on or before `date`.
    pub fn index_on_or_before(&self, date: NaiveDate) -> Option<usize> {
        self.series
            .bars()
            .partition_point(|b| b.date <= date)
            .checked_sub(1)
    }
}
