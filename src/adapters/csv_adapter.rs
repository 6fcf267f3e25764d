//! CSV directory data adapter.
//!
//! Each symbol lives in `<dir>/<CODE>.csv` with the header
//! `date,open,high,low,close,volume,amount,pct_change`. An optional
//! `<dir>/names.csv` (`code,name`) supplies display names.

use crate::domain::error::DayscreenError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub const NAMES_FILE: &str = "names.csv";

pub struct CsvAdapter {
    base_path: PathBuf,
    names: HashMap<String, String>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Result<Self, DayscreenError> {
        let names = load_names(&base_path)?;
        Ok(Self { base_path, names })
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }
}

fn load_names(base_path: &std::path::Path) -> Result<HashMap<String, String>, DayscreenError> {
    let path = base_path.join(NAMES_FILE);
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = fs::read_to_string(&path).map_err(|e| DayscreenError::Data {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;

    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let mut names = HashMap::new();
    for result in rdr.records() {
        let record = result.map_err(|e| DayscreenError::Data {
            reason: format!("{}: {}", path.display(), e),
        })?;
        if let (Some(code), Some(name)) = (record.get(0), record.get(1)) {
            names.insert(code.trim().to_string(), name.trim().to_string());
        }
    }
    Ok(names)
}

fn field<'a>(
    record: &'a csv::StringRecord,
    index: usize,
    column: &str,
) -> Result<&'a str, DayscreenError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| DayscreenError::Data {
            reason: format!("missing {} column", column),
        })
}

fn parse_f64(record: &csv::StringRecord, index: usize, column: &str) -> Result<f64, DayscreenError> {
    field(record, index, column)?
        .parse()
        .map_err(|e| DayscreenError::Data {
            reason: format!("invalid {} value: {}", column, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, DayscreenError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| DayscreenError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| DayscreenError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = field(&record, 0, "date")?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                DayscreenError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            let amount = match field(&record, 6, "amount")? {
                "" => None,
                _ => Some(parse_f64(&record, 6, "amount")?),
            };

            bars.push(OhlcvBar {
                date,
                open: parse_f64(&record, 1, "open")?,
                high: parse_f64(&record, 2, "high")?,
                low: parse_f64(&record, 3, "low")?,
                close: parse_f64(&record, 4, "close")?,
                volume: parse_f64(&record, 5, "volume")?,
                amount,
                pct_change: parse_f64(&record, 7, "pct_change")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, DayscreenError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| DayscreenError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| DayscreenError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if name_str == NAMES_FILE {
                continue;
            }
            if let Some(code) = name_str.strip_suffix(".csv") {
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn display_name(&self, code: &str) -> Option<String> {
        self.names.get(code).cloned()
    }
}
