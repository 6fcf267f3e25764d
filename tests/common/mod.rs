#![allow(dead_code)]

use chrono::NaiveDate;
use dayscreen::domain::bar_series::BarSeries;
use dayscreen::domain::error::DayscreenError;
pub use dayscreen::domain::ohlcv::OhlcvBar;
use dayscreen::ports::data_port::DataPort;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub names: HashMap<String, String>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            names: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_name(mut self, code: &str, name: &str) -> Self {
        self.names.insert(code.to_string(), name.to_string());
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, DayscreenError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(DayscreenError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(code)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, DayscreenError> {
        let mut codes: Vec<String> = self
            .data
            .keys()
            .chain(self.errors.keys())
            .cloned()
            .collect();
        codes.sort();
        Ok(codes)
    }

    fn display_name(&self, code: &str) -> Option<String> {
        self.names.get(code).cloned()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn day(start: NaiveDate, i: usize) -> NaiveDate {
    start + chrono::Duration::days(i as i64)
}

/// Bar with a 1% band around `close`.
pub fn make_bar(date: NaiveDate, close: f64, volume: f64, pct_change: f64) -> OhlcvBar {
    OhlcvBar {
        date,
        open: close,
        high: close * 1.01,
        low: close * 0.99,
        close,
        volume,
        amount: Some(close * volume),
        pct_change,
    }
}

pub fn generate_flat_bars(start: NaiveDate, count: usize, price: f64) -> Vec<OhlcvBar> {
    (0..count)
        .map(|i| make_bar(day(start, i), price, 10_000.0, 0.0))
        .collect()
}

/// Sixty-bar rally, four -3% days on falling volume, then a thin -2% day
/// that satisfies the shrink-volume oversold predicate on its last bar
/// (index 64). `rebound` further +3% days follow.
pub fn generate_dip_bars(start: NaiveDate, rebound: usize) -> Vec<OhlcvBar> {
    let mut bars: Vec<OhlcvBar> = (0..60)
        .map(|i| make_bar(day(start, i), 10.0 + i as f64 * 0.2, 10_000.0, 2.0))
        .collect();
    let mut close = bars[59].close;
    for i in 60..64 {
        close *= 0.97;
        bars.push(make_bar(day(start, i), close, 5_000.0, -3.0));
    }
    close *= 0.98;
    bars.push(make_bar(day(start, 64), close, 3_000.0, -2.0));
    for i in 65..65 + rebound {
        close *= 1.03;
        bars.push(make_bar(day(start, i), close, 12_000.0, 3.0));
    }
    bars
}

pub fn make_series(code: &str, bars: Vec<OhlcvBar>) -> BarSeries {
    BarSeries::new(code, format!("Name {code}"), bars).unwrap()
}

/// Writes `bars` as `<dir>/<code>.csv` in the on-disk layout.
pub fn write_csv(dir: &Path, code: &str, bars: &[OhlcvBar]) {
    let mut out = String::from("date,open,high,low,close,volume,amount,pct_change\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            b.date,
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume,
            b.amount.map(|a| a.to_string()).unwrap_or_default(),
            b.pct_change
        ));
    }
    fs::write(dir.join(format!("{code}.csv")), out).unwrap();
}

pub fn write_names(dir: &Path, names: &[(&str, &str)]) {
    let mut out = String::from("code,name\n");
    for (code, name) in names {
        out.push_str(&format!("{code},{name}\n"));
    }
    fs::write(dir.join("names.csv"), out).unwrap();
}
