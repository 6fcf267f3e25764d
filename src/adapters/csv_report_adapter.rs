//! CSV report adapter implementing ReportPort.
//!
//! Screening writes one row per matched symbol. A backtest writes the trade
//! list to the requested path and the run statistics to a sibling
//! `<stem>_summary.csv`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::backtest::BacktestResult;
use crate::domain::error::DayscreenError;
use crate::domain::screener::ScreenRow;
use crate::ports::report_port::ReportPort;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn csv_err(e: csv::Error) -> DayscreenError {
    DayscreenError::Io(e.into())
}

fn create_writer(path: &Path) -> Result<csv::Writer<fs::File>, DayscreenError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    csv::Writer::from_path(path).map_err(csv_err)
}

/// `out/trades.csv` -> `out/trades_summary.csv`.
pub fn summary_path(output_path: &Path) -> PathBuf {
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "backtest".to_string());
    output_path.with_file_name(format!("{stem}_summary.csv"))
}

impl ReportPort for CsvReportAdapter {
    fn write_screen(&self, rows: &[ScreenRow], output_path: &str) -> Result<(), DayscreenError> {
        let mut wtr = create_writer(Path::new(output_path))?;
        wtr.write_record([
            "code",
            "name",
            "date",
            "close",
            "pct_change",
            "j",
            "diff",
            "volume_ratio",
            "pullback_pct",
            "reason",
        ])
        .map_err(csv_err)?;

        for row in rows {
            wtr.write_record([
                row.code.clone(),
                row.name.clone(),
                row.date.to_string(),
                format!("{:.2}", row.close),
                format!("{:.2}", row.pct_change),
                format!("{:.1}", row.j),
                format!("{:.2}", row.diff),
                format!("{:.2}", row.volume_ratio),
                row.pullback_pct
                    .map(|p| format!("{:.2}", p * 100.0))
                    .unwrap_or_default(),
                row.reason.clone(),
            ])
            .map_err(csv_err)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_backtest(
        &self,
        result: &BacktestResult,
        output_path: &str,
    ) -> Result<(), DayscreenError> {
        let path = Path::new(output_path);
        let mut wtr = create_writer(path)?;
        wtr.write_record([
            "code",
            "name",
            "entry_date",
            "entry_price",
            "exit_date",
            "exit_price",
            "exit_reason",
            "return_pct",
            "holding_days",
        ])
        .map_err(csv_err)?;

        for t in &result.trades {
            wtr.write_record([
                t.code.clone(),
                t.name.clone(),
                t.entry_date.to_string(),
                format!("{:.2}", t.entry_price),
                t.exit_date.to_string(),
                format!("{:.2}", t.exit_price),
                t.exit_reason.to_string(),
                format!("{:.2}", t.return_pct * 100.0),
                t.holding_days.to_string(),
            ])
            .map_err(csv_err)?;
        }
        wtr.flush()?;

        let s = &result.stats;
        let mut summary = create_writer(&summary_path(path))?;
        let rows = [
            ("start_date", result.range.start.to_string()),
            ("end_date", result.range.end.to_string()),
            ("symbols_tested", result.symbols_tested.to_string()),
            ("total_trades", s.total_trades.to_string()),
            ("trades_won", s.trades_won.to_string()),
            ("trades_lost", s.trades_lost.to_string()),
            ("trades_breakeven", s.trades_breakeven.to_string()),
            ("win_rate_pct", format!("{:.1}", s.win_rate * 100.0)),
            ("avg_return_pct", format!("{:.2}", s.avg_return * 100.0)),
            ("max_return_pct", format!("{:.2}", s.max_return * 100.0)),
            ("min_return_pct", format!("{:.2}", s.min_return * 100.0)),
            ("profit_loss_ratio", format!("{:.2}", s.profit_loss_ratio)),
            ("cumulative_return_pct", format!("{:.2}", s.cumulative_return * 100.0)),
            ("avg_holding_days", format!("{:.1}", s.avg_holding_days)),
            ("take_profit_exits", s.take_profit_exits.to_string()),
            ("stop_loss_exits", s.stop_loss_exits.to_string()),
            ("timeout_exits", s.timeout_exits.to_string()),
        ];
        summary.write_record(["metric", "value"]).map_err(csv_err)?;
        for (metric, value) in rows {
            summary.write_record([metric, value.as_str()]).map_err(csv_err)?;
        }
        summary.flush()?;
        Ok(())
    }
}
