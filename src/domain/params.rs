//! Typed parameter set for indicators, signals and the backtest.
//!
//! Every recognised option lives here with its default. Values are read from
//! configuration once (see [`crate::domain::config_validation::load_params`])
//! and never looked up by key afterwards.

use crate::domain::indicator::{kdj, macd, IndicatorType};
use std::fmt;
use std::str::FromStr;

/// Which entry predicate the signal evaluator applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyVariant {
    /// Shrinking volume, flat or down day, oversold J, bullish DIFF.
    #[default]
    ShrinkVolumeOversold,
    /// Trend filter and swing-high pullback check ahead of the base predicate.
    TrendPullback,
}

impl FromStr for StrategyVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shrink_volume_oversold" | "oversold" => Ok(StrategyVariant::ShrinkVolumeOversold),
            "trend_pullback" | "pullback" => Ok(StrategyVariant::TrendPullback),
            other => Err(format!("unknown strategy variant '{other}'")),
        }
    }
}

impl fmt::Display for StrategyVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyVariant::ShrinkVolumeOversold => write!(f, "shrink_volume_oversold"),
            StrategyVariant::TrendPullback => write!(f, "trend_pullback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub ma_short: usize,
    pub ma_long: usize,
    pub kdj_n: usize,
    pub kdj_m1: usize,
    pub kdj_m2: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub volume_ma_period: usize,
}

/// The five-day price average is always annotated alongside the configured ones.
pub const BASE_MA_PERIOD: usize = 5;

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            ma_short: 20,
            ma_long: 60,
            kdj_n: kdj::DEFAULT_N,
            kdj_m1: kdj::DEFAULT_M1,
            kdj_m2: kdj::DEFAULT_M2,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            volume_ma_period: 5,
        }
    }
}

impl IndicatorParams {
    /// Price moving-average periods, ascending and deduplicated.
    pub fn ma_periods(&self) -> Vec<usize> {
        let mut periods = vec![BASE_MA_PERIOD, self.ma_short, self.ma_long];
        periods.sort_unstable();
        periods.dedup();
        periods
    }

    pub fn kdj_type(&self) -> IndicatorType {
        IndicatorType::Kdj {
            n: self.kdj_n,
            m1: self.kdj_m1,
            m2: self.kdj_m2,
        }
    }

    pub fn macd_type(&self) -> IndicatorType {
        IndicatorType::Macd {
            fast: self.macd_fast,
            slow: self.macd_slow,
            signal: self.macd_signal,
        }
    }

    pub fn volume_ma_type(&self) -> IndicatorType {
        IndicatorType::VolumeSma(self.volume_ma_period)
    }

    /// Every indicator the annotated series carries.
    pub fn indicator_types(&self) -> Vec<IndicatorType> {
        let mut types: Vec<IndicatorType> = self
            .ma_periods()
            .into_iter()
            .map(IndicatorType::Sma)
            .collect();
        types.push(self.kdj_type());
        types.push(self.macd_type());
        types.push(self.volume_ma_type());
        types
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalParams {
    /// Entry requires `volume / VOL_MA < volume_ratio_threshold`.
    pub volume_ratio_threshold: f64,
    /// Entry requires `pct_change <= change_threshold` (percent units).
    pub change_threshold: f64,
    pub j_threshold: f64,
    pub diff_threshold: f64,
    /// Bars at or above this percent change are never entered.
    pub limit_up_pct: f64,
    /// Minimum history before a symbol is screened at all.
    pub min_bars: usize,
}

impl Default for SignalParams {
    fn default() -> Self {
        SignalParams {
            volume_ratio_threshold: 0.7,
            change_threshold: 1.0,
            j_threshold: 0.0,
            diff_threshold: 0.0,
            limit_up_pct: 9.5,
            min_bars: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendParams {
    pub lookback_days: usize,
    pub swing_half_width: usize,
    /// Close must stay at or above `swing_high * pullback_ratio`.
    pub pullback_ratio: f64,
    pub min_bars: usize,
}

impl Default for TrendParams {
    fn default() -> Self {
        TrendParams {
            lookback_days: 60,
            swing_half_width: 5,
            pullback_ratio: 0.9,
            min_bars: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestParams {
    /// Fractional gain that closes a position (0.10 = +10%).
    pub take_profit: f64,
    /// Fractional loss that closes a position (0.05 = -5%).
    pub stop_loss: f64,
    pub max_holding_days: usize,
    /// Bars required inside the backtest window; entries are scanned from
    /// this in-window index onward.
    pub min_bars: usize,
}

impl Default for BacktestParams {
    fn default() -> Self {
        BacktestParams {
            take_profit: 0.10,
            stop_loss: 0.05,
            max_holding_days: 10,
            min_bars: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params {
    pub variant: StrategyVariant,
    pub indicators: IndicatorParams,
    pub signal: SignalParams,
    pub trend: TrendParams,
    pub backtest: BacktestParams,
}
