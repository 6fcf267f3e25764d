//! Per-symbol trade simulation and run-level aggregation.
//!
//! Indicators are computed over each symbol's full history; only entries and
//! exits are restricted to the requested date window.

use crate::domain::annotated::annotate;
use crate::domain::bar_series::BarSeries;
use crate::domain::error::DayscreenError;
use crate::domain::metrics::TradeStats;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::params::{BacktestParams, Params};
use crate::domain::position::{ExitReason, OpenPosition, TradeRecord};
use crate::domain::signal::evaluate_at;
use chrono::NaiveDate;
use rayon::prelude::*;
use std::ops::Range;
use tracing::{debug, info};

/// Inclusive backtest window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DayscreenError> {
        if start > end {
            return Err(DayscreenError::invalid(
                "backtest",
                "start_date",
                "start_date must be before or equal to end_date",
            ));
        }
        Ok(DateRange { start, end })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub range: DateRange,
    pub symbols_tested: usize,
    pub stats: TradeStats,
    pub trades: Vec<TradeRecord>,
}

impl BacktestResult {
    pub fn from_trades(range: DateRange, symbols_tested: usize, trades: Vec<TradeRecord>) -> Self {
        BacktestResult {
            range,
            symbols_tested,
            stats: TradeStats::compute(&trades),
            trades,
        }
    }

    pub fn total_trades(&self) -> usize {
        self.trades.len()
    }
}

enum SimState {
    Scanning,
    Holding(OpenPosition),
}

/// Simulates one symbol over `range`. Returns no trades when fewer than
/// `min_bars` bars fall inside the window.
pub fn backtest_symbol(series: &BarSeries, params: &Params, range: &DateRange) -> Vec<TradeRecord> {
    let window = series.date_range(range.start, range.end);
    if window.len() < params.backtest.min_bars {
        debug!(
            code = %series.code,
            bars = window.len(),
            minimum = params.backtest.min_bars,
            "not enough bars in backtest window"
        );
        return Vec::new();
    }

    let annotated = annotate(series, &params.indicators);
    let limit_up = params.signal.limit_up_pct;
    simulate(
        &series.code,
        &series.name,
        series.bars(),
        window,
        &params.backtest,
        |i| !series.bars()[i].is_limit_up(limit_up) && evaluate_at(&annotated, i, params).0,
    )
}

/// Runs every symbol in parallel and aggregates the closed trades once.
pub fn backtest_all(all_series: &[BarSeries], params: &Params, range: &DateRange) -> BacktestResult {
    info!(
        symbols = all_series.len(),
        start = %range.start,
        end = %range.end,
        "running backtest"
    );

    let per_symbol: Vec<Vec<TradeRecord>> = all_series
        .par_iter()
        .map(|series| backtest_symbol(series, params, range))
        .collect();
    let trades: Vec<TradeRecord> = per_symbol.into_iter().flatten().collect();

    let result = BacktestResult::from_trades(*range, all_series.len(), trades);
    info!(
        trades = result.stats.total_trades,
        win_rate = result.stats.win_rate,
        cumulative_return = result.stats.cumulative_return,
        "backtest complete"
    );
    result
}

/// Walks `window` with a scanning/holding state machine.
///
/// Scanning starts at `window.start + min_bars` and opens at the close of any
/// bar for which `is_entry` holds, except the window's last bar. Holding
/// checks take-profit, then stop-loss, then timeout on each later close; the
/// last bar of the window always closes an open position. Scanning resumes on
/// the bar after the exit.
fn simulate<F>(
    code: &str,
    name: &str,
    bars: &[OhlcvBar],
    window: Range<usize>,
    p: &BacktestParams,
    mut is_entry: F,
) -> Vec<TradeRecord>
where
    F: FnMut(usize) -> bool,
{
    let mut trades = Vec::new();
    if window.is_empty() {
        return trades;
    }
    let last = window.end - 1;
    let mut state = SimState::Scanning;

    for i in window.start.saturating_add(p.min_bars)..window.end {
        state = match state {
            SimState::Scanning => {
                if i < last && is_entry(i) {
                    let bar = &bars[i];
                    SimState::Holding(OpenPosition::open(
                        i,
                        bar.date,
                        bar.close,
                        p.take_profit,
                        p.stop_loss,
                    ))
                } else {
                    SimState::Scanning
                }
            }
            SimState::Holding(position) => {
                let bar = &bars[i];
                let reason = if position.should_take_profit(bar.close) {
                    Some(ExitReason::TakeProfit)
                } else if position.should_stop_loss(bar.close) {
                    Some(ExitReason::StopLoss)
                } else if i == position.entry_index.saturating_add(p.max_holding_days) || i == last {
                    Some(ExitReason::Timeout)
                } else {
                    None
                };
                match reason {
                    Some(reason) => {
                        trades.push(position.close(code, name, bar.date, bar.close, reason));
                        SimState::Scanning
                    }
                    None => SimState::Holding(position),
                }
            }
        };
    }
    trades
}
