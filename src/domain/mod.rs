//! Core domain types and logic.

pub mod annotated;
pub mod backtest;
pub mod bar_series;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod indicator_helpers;
pub mod metrics;
pub mod ohlcv;
pub mod params;
pub mod position;
pub mod screener;
pub mod signal;
pub mod swing;
pub mod universe;
