//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values
//!
//! Points inside an indicator's warm-up window are flagged `valid: false` and
//! carry `f64::NAN` as their value.

pub mod ema;
pub mod kdj;
pub mod macd;
pub mod sma;

pub use ema::ema_values;
pub use kdj::calculate_kdj;
pub use macd::calculate_macd;
pub use sma::{calculate_sma, calculate_volume_sma};

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, Copy)]
pub enum IndicatorValue {
    Simple(f64),
    Kdj { k: f64, d: f64, j: f64 },
    Macd { diff: f64, dea: f64, histogram: f64 },
}

impl IndicatorValue {
    /// Every float carried by the value, in field order.
    pub fn components(&self) -> Vec<f64> {
        match *self {
            IndicatorValue::Simple(v) => vec![v],
            IndicatorValue::Kdj { k, d, j } => vec![k, d, j],
            IndicatorValue::Macd {
                diff,
                dea,
                histogram,
            } => vec![diff, dea, histogram],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    VolumeSma(usize),
    Kdj { n: usize, m1: usize, m2: usize },
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn empty(indicator_type: IndicatorType) -> Self {
        IndicatorSeries {
            indicator_type,
            values: Vec::new(),
        }
    }

    /// Value at `index`, or `None` inside the warm-up window.
    pub fn value_at(&self, index: usize) -> Option<IndicatorValue> {
        self.values
            .get(index)
            .filter(|p| p.valid)
            .map(|p| p.value)
    }

    pub fn simple_at(&self, index: usize) -> Option<f64> {
        match self.value_at(index)? {
            IndicatorValue::Simple(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "MA{}", period),
            IndicatorType::VolumeSma(period) => write!(f, "VOL_MA{}", period),
            IndicatorType::Kdj { n, m1, m2 } => write!(f, "KDJ({},{},{})", n, m1, m2),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}
