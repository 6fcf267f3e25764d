//! Symbol universe loading with per-symbol failure isolation.
//!
//! Every code is fetched and validated independently; a failing symbol is
//! recorded with its reason and the rest of the universe carries on.

use crate::domain::bar_series::BarSeries;
use crate::domain::error::DayscreenError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

/// Parses a comma-separated code list, rejecting empty tokens and duplicates.
pub fn parse_codes(input: &str) -> Result<Vec<String>, DayscreenError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(DayscreenError::invalid("data", "codes", "empty token in code list"));
        }
        let code = trimmed.to_uppercase();
        if !seen.insert(code.clone()) {
            return Err(DayscreenError::invalid(
                "data",
                "codes",
                format!("duplicate code: {code}"),
            ));
        }
        codes.push(code);
    }

    Ok(codes)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    FetchFailed(String),
    NoData,
    Malformed { index: usize, reason: String },
    InsufficientBars { bars: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FetchFailed(reason) => write!(f, "fetch failed: {reason}"),
            SkipReason::NoData => write!(f, "no data found"),
            SkipReason::Malformed { index, reason } => {
                write!(f, "malformed bar {index}: {reason}")
            }
            SkipReason::InsufficientBars { bars } => write!(f, "only {bars} bars"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SkippedCode {
    pub code: String,
    pub reason: SkipReason,
}

#[derive(Debug)]
pub struct UniverseLoadResult {
    pub series: Vec<BarSeries>,
    pub skipped: Vec<SkippedCode>,
}

/// Fetches and validates each code. Fails only when no symbol survives and
/// none was skipped merely for having fewer than `min_bars` bars.
pub fn load_universe(
    data_port: &dyn DataPort,
    codes: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
    min_bars: usize,
) -> Result<UniverseLoadResult, DayscreenError> {
    let mut series = Vec::new();
    let mut skipped = Vec::new();

    for code in codes {
        match load_one(data_port, code, start_date, end_date, min_bars) {
            Ok(s) => {
                debug!(code = %code, bars = s.len(), "loaded");
                series.push(s);
            }
            Err(reason) => {
                warn!(code = %code, %reason, "skipping symbol");
                skipped.push(SkippedCode {
                    code: code.clone(),
                    reason,
                });
            }
        }
    }

    // Short history only means "not eligible"; the run fails when every code
    // was unusable for another reason.
    let all_unreadable = skipped
        .iter()
        .all(|s| !matches!(s.reason, SkipReason::InsufficientBars { .. }));
    if series.is_empty() && !codes.is_empty() && all_unreadable {
        return Err(DayscreenError::InsufficientData {
            code: "all".to_string(),
            bars: 0,
            minimum: min_bars,
        });
    }

    if !skipped.is_empty() {
        info!(
            loaded = series.len(),
            total = codes.len(),
            "some symbols were skipped"
        );
    }

    Ok(UniverseLoadResult { series, skipped })
}

fn load_one(
    data_port: &dyn DataPort,
    code: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    min_bars: usize,
) -> Result<BarSeries, SkipReason> {
    let bars = data_port
        .fetch_bars(code, start_date, end_date)
        .map_err(|e| SkipReason::FetchFailed(e.to_string()))?;
    if bars.len() < min_bars && !bars.is_empty() {
        return Err(SkipReason::InsufficientBars { bars: bars.len() });
    }

    let name = data_port
        .display_name(code)
        .unwrap_or_else(|| code.to_string());
    BarSeries::new(code, name, bars).map_err(|e| match e {
        DayscreenError::NoData { .. } => SkipReason::NoData,
        DayscreenError::MalformedSeries { index, reason, .. } => {
            SkipReason::Malformed { index, reason }
        }
        other => SkipReason::FetchFailed(other.to_string()),
    })
}
