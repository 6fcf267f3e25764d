//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::{CsvReportAdapter, summary_path};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{BacktestResult, DateRange, backtest_all};
use crate::domain::config_validation::{load_date_range, load_params};
use crate::domain::error::DayscreenError;
use crate::domain::params::Params;
use crate::domain::screener::{ScreenRow, screen_all};
use crate::domain::universe::{UniverseLoadResult, load_universe, parse_codes};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "dayscreen",
    about = "Daily equity signal screener and backtester",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screen every symbol's latest bar for an entry signal
    Screen {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory of <CODE>.csv files (overrides [data] dir)
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Screen as of this date instead of the latest bar
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Simulate signal entries with fixed exits over a date range
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Installs the global tracing subscriber. `RUST_LOG` takes precedence over
/// the verbosity flag.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Screen {
            config,
            data,
            date,
            output,
        } => run_screen(&config, data.as_deref(), date, output.as_deref()),
        Command::Backtest {
            config,
            data,
            start,
            end,
            output,
        } => run_backtest(&config, data.as_deref(), start, end, output.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<(FileConfigAdapter, Params), DayscreenError> {
    info!("Loading config from {}", path.display());
    let adapter = FileConfigAdapter::from_file(path)?;
    let params = load_params(&adapter)?;
    Ok((adapter, params))
}

fn open_data(
    config: &dyn ConfigPort,
    data_override: Option<&Path>,
) -> Result<CsvAdapter, DayscreenError> {
    let dir = match data_override {
        Some(d) => d.to_path_buf(),
        None => config
            .get_string("data", "dir")
            .map(PathBuf::from)
            .ok_or_else(|| DayscreenError::ConfigMissing {
                section: "data".into(),
                key: "dir".into(),
            })?,
    };
    CsvAdapter::new(dir)
}

/// `[data] codes` when configured, otherwise every symbol the source lists.
pub fn resolve_codes(
    config: &dyn ConfigPort,
    data_port: &dyn DataPort,
) -> Result<Vec<String>, DayscreenError> {
    match config.get_string("data", "codes") {
        Some(s) if !s.trim().is_empty() => parse_codes(&s),
        _ => data_port.list_symbols(),
    }
}

fn load_symbols(
    config: &dyn ConfigPort,
    data_port: &dyn DataPort,
    end: NaiveDate,
    min_bars: usize,
) -> Result<UniverseLoadResult, DayscreenError> {
    let codes = resolve_codes(config, data_port)?;
    if codes.is_empty() {
        return Err(DayscreenError::Data {
            reason: "no symbols found".into(),
        });
    }
    info!("Loading {} symbols", codes.len());
    load_universe(data_port, &codes, NaiveDate::MIN, end, min_bars)
}

fn run_screen(
    config_path: &Path,
    data_override: Option<&Path>,
    as_of: Option<NaiveDate>,
    output: Option<&Path>,
) -> Result<(), DayscreenError> {
    let (config, params) = load_config(config_path)?;
    let data_port = open_data(&config, data_override)?;
    let universe = load_symbols(
        &config,
        &data_port,
        as_of.unwrap_or(NaiveDate::MAX),
        params.signal.min_bars,
    )?;

    let rows = screen_all(&universe.series, &params, as_of);

    match output {
        Some(path) => {
            CsvReportAdapter::new().write_screen(&rows, &path.to_string_lossy())?;
            info!("Wrote {} rows to {}", rows.len(), path.display());
        }
        None => print_screen(&rows),
    }
    Ok(())
}

fn print_screen(rows: &[ScreenRow]) {
    if rows.is_empty() {
        println!("No symbols matched.");
        return;
    }
    for row in rows {
        println!(
            "{:<8} {:<16} {:>10.2} {:>7.2}% J {:>6.1} DIFF {:>7.2} VR {:.2}  {}",
            row.code, row.name, row.close, row.pct_change, row.j, row.diff, row.volume_ratio, row.reason
        );
    }
}

fn resolve_range(
    config: &dyn ConfigPort,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<DateRange, DayscreenError> {
    let configured = load_date_range(config)?;
    let start = start
        .or(configured.map(|r| r.start))
        .ok_or_else(|| DayscreenError::ConfigMissing {
            section: "backtest".into(),
            key: "start_date".into(),
        })?;
    let end = end
        .or(configured.map(|r| r.end))
        .ok_or_else(|| DayscreenError::ConfigMissing {
            section: "backtest".into(),
            key: "end_date".into(),
        })?;
    DateRange::new(start, end)
}

fn run_backtest(
    config_path: &Path,
    data_override: Option<&Path>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    output: Option<&Path>,
) -> Result<(), DayscreenError> {
    let (config, params) = load_config(config_path)?;
    let range = resolve_range(&config, start, end)?;
    let data_port = open_data(&config, data_override)?;
    // Short histories stay in the run; the simulator treats a window under
    // `min_bars` as zero trades.
    let universe = load_symbols(&config, &data_port, range.end, 0)?;

    let result = backtest_all(&universe.series, &params, &range);

    if let Some(path) = output {
        CsvReportAdapter::new().write_backtest(&result, &path.to_string_lossy())?;
        info!(
            "Wrote {} trades to {} (summary in {})",
            result.total_trades(),
            path.display(),
            summary_path(path).display()
        );
    }
    print_summary(&result, universe.skipped.len());
    Ok(())
}

fn print_summary(result: &BacktestResult, skipped: usize) {
    let s = &result.stats;
    println!("Backtest {} to {}", result.range.start, result.range.end);
    println!(
        "  Symbols:           {} ({} skipped)",
        result.symbols_tested, skipped
    );
    println!("  Trades:            {}", s.total_trades);
    println!("  Win rate:          {:.1}%", s.win_rate * 100.0);
    println!("  Average return:    {:.2}%", s.avg_return * 100.0);
    println!("  Best / worst:      {:.2}% / {:.2}%", s.max_return * 100.0, s.min_return * 100.0);
    println!("  Profit/loss ratio: {:.2}", s.profit_loss_ratio);
    println!("  Cumulative return: {:.2}%", s.cumulative_return * 100.0);
    println!("  Avg holding days:  {:.1}", s.avg_holding_days);
    println!(
        "  Exits:             {} take-profit, {} stop-loss, {} timeout",
        s.take_profit_exits, s.stop_loss_exits, s.timeout_exits
    );
}

fn run_validate(config_path: &Path) -> Result<(), DayscreenError> {
    let (config, params) = load_config(config_path)?;
    let range = load_date_range(&config)?;

    println!("Configuration OK");
    println!("  Variant:     {}", params.variant);
    println!(
        "  Indicators:  {}",
        params
            .indicators
            .indicator_types()
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  Exits:       take-profit {:.1}%, stop-loss {:.1}%, max {} bars",
        params.backtest.take_profit * 100.0,
        params.backtest.stop_loss * 100.0,
        params.backtest.max_holding_days
    );
    if let Some(r) = range {
        println!("  Backtest:    {} to {}", r.start, r.end);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_backtest_dates() {
        let cli = Cli::try_parse_from([
            "dayscreen",
            "backtest",
            "-c",
            "cfg.ini",
            "--start",
            "2024-01-01",
            "--end",
            "2024-06-30",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Backtest { start, end, .. } => {
                assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(end, NaiveDate::from_ymd_opt(2024, 6, 30));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_date() {
        let result = Cli::try_parse_from(["dayscreen", "screen", "-c", "x.ini", "--date", "2024/01/01"]);
        assert!(result.is_err());
    }

    #[test]
    fn range_prefers_flags_over_config() {
        let config = FileConfigAdapter::from_string(
            "[backtest]\nstart_date = 2023-01-01\nend_date = 2023-12-31\n",
        )
        .unwrap();
        let range = resolve_range(&config, NaiveDate::from_ymd_opt(2023, 6, 1), None).unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2023, 6, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn range_missing_everywhere_fails() {
        let config = FileConfigAdapter::from_string("[backtest]\n").unwrap();
        let err = resolve_range(&config, None, None).unwrap_err();
        assert!(matches!(err, DayscreenError::ConfigMissing { key, .. } if key == "start_date"));
    }
}
