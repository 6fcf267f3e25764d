//! Data access port trait.

use crate::domain::error::DayscreenError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `code` dated within `[start_date, end_date]`, oldest first.
    fn fetch_bars(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, DayscreenError>;

    fn list_symbols(&self) -> Result<Vec<String>, DayscreenError>;

    /// Human-readable name, when the source knows one.
    fn display_name(&self, code: &str) -> Option<String>;
}
