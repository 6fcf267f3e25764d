//! Trade-list statistics for a backtest run.

use crate::domain::position::{ExitReason, TradeRecord};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TradeStats {
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    /// Fraction of trades with a strictly positive return.
    pub win_rate: f64,
    pub avg_return: f64,
    pub max_return: f64,
    pub min_return: f64,
    /// Mean winning return over the absolute mean losing return; 0 without losses.
    pub profit_loss_ratio: f64,
    /// Plain sum of trade returns, not compounded.
    pub cumulative_return: f64,
    pub avg_holding_days: f64,
    pub take_profit_exits: usize,
    pub stop_loss_exits: usize,
    pub timeout_exits: usize,
}

impl TradeStats {
    /// All statistics are 0 for an empty trade list.
    pub fn compute(trades: &[TradeRecord]) -> Self {
        if trades.is_empty() {
            return TradeStats::default();
        }

        let mut stats = TradeStats {
            total_trades: trades.len(),
            max_return: f64::NEG_INFINITY,
            min_return: f64::INFINITY,
            ..TradeStats::default()
        };
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut total_duration_days = 0i64;

        for trade in trades {
            let r = trade.return_pct;
            if r > 0.0 {
                stats.trades_won += 1;
                total_wins += r;
            } else if r < 0.0 {
                stats.trades_lost += 1;
                total_losses += r;
            } else {
                stats.trades_breakeven += 1;
            }
            stats.cumulative_return += r;
            stats.max_return = stats.max_return.max(r);
            stats.min_return = stats.min_return.min(r);
            total_duration_days += trade.holding_days;

            match trade.exit_reason {
                ExitReason::TakeProfit => stats.take_profit_exits += 1,
                ExitReason::StopLoss => stats.stop_loss_exits += 1,
                ExitReason::Timeout => stats.timeout_exits += 1,
            }
        }

        let n = trades.len() as f64;
        stats.win_rate = stats.trades_won as f64 / n;
        stats.avg_return = stats.cumulative_return / n;
        stats.avg_holding_days = total_duration_days as f64 / n;

        stats.profit_loss_ratio = if stats.trades_lost > 0 {
            let avg_win = if stats.trades_won > 0 {
                total_wins / stats.trades_won as f64
            } else {
                0.0
            };
            let avg_loss = (total_losses / stats.trades_lost as f64).abs();
            avg_win / avg_loss
        } else {
            0.0
        };

        stats
    }
}
