//! Daily OHLCV bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Turnover in currency units, when the source provides it.
    pub amount: Option<f64>,
    /// Day-over-day change in percent units (`9.5` means +9.5%).
    pub pct_change: f64,
}

impl OhlcvBar {
    /// True when the bar closed at or above the limit-up threshold.
    pub fn is_limit_up(&self, limit_up_pct: f64) -> bool {
        self.pct_change >= limit_up_pct
    }

    /// Checks `low <= {open, close} <= high`, positive prices and
    /// non-negative volume. Returns a description of the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err("prices must be positive and finite".into());
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err("volume must be non-negative".into());
        }
        if !self.pct_change.is_finite() {
            return Err("percent change must be finite".into());
        }
        if self.high < self.low {
            return Err(format!("high {} below low {}", self.high, self.low));
        }
        for (label, value) in [("open", self.open), ("close", self.close)] {
            if value < self.low || value > self.high {
                return Err(format!(
                    "{label} {value} outside [{}, {}]",
                    self.low, self.high
                ));
            }
        }
        Ok(())
    }
}
