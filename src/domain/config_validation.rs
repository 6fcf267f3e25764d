//! Configuration loading and validation.
//!
//! Reads every recognised key once into a typed [`Params`], falling back to
//! the documented defaults, then checks cross-field constraints before any
//! screening or backtest runs.

use crate::domain::backtest::DateRange;
use crate::domain::error::DayscreenError;
use crate::domain::params::{
    BacktestParams, IndicatorParams, Params, SignalParams, StrategyVariant, TrendParams,
};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn load_params(config: &dyn ConfigPort) -> Result<Params, DayscreenError> {
    let defaults = Params::default();

    let variant = match config.get_string("signal", "variant") {
        Some(s) if !s.trim().is_empty() => s
            .parse::<StrategyVariant>()
            .map_err(|reason| DayscreenError::invalid("signal", "variant", reason))?,
        _ => defaults.variant,
    };

    let ind = &defaults.indicators;
    let indicators = IndicatorParams {
        ma_short: read_usize(config, "indicators", "ma_short", ind.ma_short)?,
        ma_long: read_usize(config, "indicators", "ma_long", ind.ma_long)?,
        kdj_n: read_usize(config, "indicators", "kdj_n", ind.kdj_n)?,
        kdj_m1: read_usize(config, "indicators", "kdj_m1", ind.kdj_m1)?,
        kdj_m2: read_usize(config, "indicators", "kdj_m2", ind.kdj_m2)?,
        macd_fast: read_usize(config, "indicators", "macd_fast", ind.macd_fast)?,
        macd_slow: read_usize(config, "indicators", "macd_slow", ind.macd_slow)?,
        macd_signal: read_usize(config, "indicators", "macd_signal", ind.macd_signal)?,
        volume_ma_period: read_usize(
            config,
            "indicators",
            "volume_ma_period",
            ind.volume_ma_period,
        )?,
    };

    let sig = &defaults.signal;
    let signal = SignalParams {
        volume_ratio_threshold: read_f64(
            config,
            "signal",
            "volume_ratio",
            sig.volume_ratio_threshold,
        )?,
        change_threshold: read_f64(config, "signal", "change_threshold", sig.change_threshold)?,
        j_threshold: read_f64(config, "signal", "j_threshold", sig.j_threshold)?,
        diff_threshold: read_f64(config, "signal", "diff_threshold", sig.diff_threshold)?,
        limit_up_pct: read_f64(config, "signal", "limit_up_pct", sig.limit_up_pct)?,
        min_bars: read_usize(config, "signal", "min_bars", sig.min_bars)?,
    };

    let tr = &defaults.trend;
    let trend = TrendParams {
        lookback_days: read_usize(config, "trend", "lookback_days", tr.lookback_days)?,
        swing_half_width: read_usize(config, "trend", "swing_half_width", tr.swing_half_width)?,
        pullback_ratio: read_f64(config, "trend", "pullback_ratio", tr.pullback_ratio)?,
        min_bars: read_usize(config, "trend", "min_bars", tr.min_bars)?,
    };

    let bt = &defaults.backtest;
    let backtest = BacktestParams {
        take_profit: read_f64(config, "backtest", "take_profit", bt.take_profit)?,
        stop_loss: read_f64(config, "backtest", "stop_loss", bt.stop_loss)?,
        max_holding_days: read_usize(config, "backtest", "max_holding_days", bt.max_holding_days)?,
        min_bars: read_usize(config, "backtest", "min_bars", bt.min_bars)?,
    };

    let params = Params {
        variant,
        indicators,
        signal,
        trend,
        backtest,
    };
    validate_params(&params)?;
    Ok(params)
}

pub fn validate_params(params: &Params) -> Result<(), DayscreenError> {
    validate_indicators(&params.indicators)?;
    validate_signal(&params.signal)?;
    validate_trend(&params.trend)?;
    validate_backtest(&params.backtest)?;
    Ok(())
}

fn validate_indicators(p: &IndicatorParams) -> Result<(), DayscreenError> {
    let periods = [
        ("ma_short", p.ma_short),
        ("ma_long", p.ma_long),
        ("kdj_n", p.kdj_n),
        ("kdj_m1", p.kdj_m1),
        ("kdj_m2", p.kdj_m2),
        ("macd_fast", p.macd_fast),
        ("macd_slow", p.macd_slow),
        ("macd_signal", p.macd_signal),
        ("volume_ma_period", p.volume_ma_period),
    ];
    for (key, value) in periods {
        if value == 0 {
            return Err(DayscreenError::invalid(
                "indicators",
                key,
                format!("{key} must be at least 1"),
            ));
        }
    }
    if p.ma_short >= p.ma_long {
        return Err(DayscreenError::invalid(
            "indicators",
            "ma_short",
            "ma_short must be shorter than ma_long",
        ));
    }
    if p.macd_fast >= p.macd_slow {
        return Err(DayscreenError::invalid(
            "indicators",
            "macd_fast",
            "macd_fast must be shorter than macd_slow",
        ));
    }
    Ok(())
}

fn validate_signal(p: &SignalParams) -> Result<(), DayscreenError> {
    if p.volume_ratio_threshold <= 0.0 {
        return Err(DayscreenError::invalid(
            "signal",
            "volume_ratio",
            "volume_ratio must be positive",
        ));
    }
    if p.limit_up_pct <= 0.0 {
        return Err(DayscreenError::invalid(
            "signal",
            "limit_up_pct",
            "limit_up_pct must be positive",
        ));
    }
    Ok(())
}

fn validate_trend(p: &TrendParams) -> Result<(), DayscreenError> {
    if p.pullback_ratio <= 0.0 || p.pullback_ratio > 1.0 {
        return Err(DayscreenError::invalid(
            "trend",
            "pullback_ratio",
            "pullback_ratio must be in (0, 1]",
        ));
    }
    if p.swing_half_width == 0 {
        return Err(DayscreenError::invalid(
            "trend",
            "swing_half_width",
            "swing_half_width must be at least 1",
        ));
    }
    if p.lookback_days < 2 * p.swing_half_width + 1 {
        return Err(DayscreenError::invalid(
            "trend",
            "lookback_days",
            "lookback_days must fit at least one full swing window",
        ));
    }
    Ok(())
}

fn validate_backtest(p: &BacktestParams) -> Result<(), DayscreenError> {
    if p.take_profit <= 0.0 {
        return Err(DayscreenError::invalid(
            "backtest",
            "take_profit",
            "take_profit must be positive",
        ));
    }
    if p.stop_loss <= 0.0 || p.stop_loss >= 1.0 {
        return Err(DayscreenError::invalid(
            "backtest",
            "stop_loss",
            "stop_loss must be in (0, 1)",
        ));
    }
    if p.max_holding_days == 0 {
        return Err(DayscreenError::invalid(
            "backtest",
            "max_holding_days",
            "max_holding_days must be at least 1",
        ));
    }
    Ok(())
}

/// Reads `[backtest] start_date` / `end_date` when both are present.
pub fn load_date_range(config: &dyn ConfigPort) -> Result<Option<DateRange>, DayscreenError> {
    let start_str = config.get_string("backtest", "start_date");
    let end_str = config.get_string("backtest", "end_date");

    match (start_str, end_str) {
        (None, None) => Ok(None),
        (start, end) => {
            let start = parse_date(start.as_deref(), "start_date")?;
            let end = parse_date(end.as_deref(), "end_date")?;
            DateRange::new(start, end).map(Some)
        }
    }
}

pub fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, DayscreenError> {
    match value {
        None => Err(DayscreenError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            DayscreenError::invalid(
                "backtest",
                field,
                format!("invalid {} format, expected YYYY-MM-DD", field),
            )
        }),
    }
}

fn read_f64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, DayscreenError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| DayscreenError::invalid(section, key, format!("'{raw}' is not a number"))),
    }
}

fn read_usize(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, DayscreenError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
            DayscreenError::invalid(
                section,
                key,
                format!("'{raw}' is not a non-negative integer"),
            )
        }),
    }
}
