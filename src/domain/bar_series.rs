//! Validated per-symbol bar series.

use crate::domain::error::DayscreenError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;
use std::ops::Range;

/// Time-ordered daily bars for one symbol, oldest first.
///
/// Construction rejects the whole series when any bar breaks the OHLC
/// invariants or when dates are not strictly increasing, so downstream
/// indicator code never sees a malformed row.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub code: String,
    pub name: String,
    bars: Vec<OhlcvBar>,
}

impl BarSeries {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        bars: Vec<OhlcvBar>,
    ) -> Result<Self, DayscreenError> {
        let code = code.into();
        if bars.is_empty() {
            return Err(DayscreenError::NoData { code });
        }

        for (i, bar) in bars.iter().enumerate() {
            if let Err(reason) = bar.check_invariants() {
                return Err(DayscreenError::MalformedSeries {
                    code,
                    index: i,
                    reason,
                });
            }
            if i > 0 && bar.date <= bars[i - 1].date {
                return Err(DayscreenError::MalformedSeries {
                    code,
                    index: i,
                    reason: format!(
                        "date {} does not follow {}",
                        bar.date,
                        bars[i - 1].date
                    ),
                });
            }
        }

        Ok(Self {
            code,
            name: name.into(),
            bars,
        })
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Index range of bars whose date falls within `[start, end]`.
    pub fn date_range(&self, start: NaiveDate, end: NaiveDate) -> Range<usize> {
        let lo = self.bars.partition_point(|b| b.date < start);
        let hi = self.bars.partition_point(|b| b.date <= end);
        lo..hi.max(lo)
    }
}
