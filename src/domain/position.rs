//! Simulated open positions and the trade records they close into.

use chrono::NaiveDate;
use std::fmt;

/// Why a simulated position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitReason {
    TakeProfit,
    StopLoss,
    Timeout,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::TakeProfit => write!(f, "take-profit"),
            ExitReason::StopLoss => write!(f, "stop-loss"),
            ExitReason::Timeout => write!(f, "timeout"),
        }
    }
}

/// Slack on exit comparisons so a close landing exactly on a threshold still
/// triggers it.
const RETURN_EPSILON: f64 = 1e-9;

/// Long position opened at a bar's close. Exit thresholds are return
/// fractions measured from the entry price.
#[derive(Debug, Clone)]
pub struct OpenPosition {
    pub entry_index: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub take_profit_pct: f64,
    pub stop_loss_pct: f64,
}

impl OpenPosition {
    pub fn open(
        entry_index: usize,
        entry_date: NaiveDate,
        entry_price: f64,
        take_profit_pct: f64,
        stop_loss_pct: f64,
    ) -> Self {
        OpenPosition {
            entry_index,
            entry_date,
            entry_price,
            take_profit_pct,
            stop_loss_pct,
        }
    }

    /// `(price - entry) / entry`.
    pub fn return_at(&self, price: f64) -> f64 {
        (price - self.entry_price) / self.entry_price
    }

    pub fn should_take_profit(&self, price: f64) -> bool {
        self.return_at(price) >= self.take_profit_pct - RETURN_EPSILON
    }

    pub fn should_stop_loss(&self, price: f64) -> bool {
        self.return_at(price) <= -self.stop_loss_pct + RETURN_EPSILON
    }

    pub fn close(
        &self,
        code: &str,
        name: &str,
        exit_date: NaiveDate,
        exit_price: f64,
        exit_reason: ExitReason,
    ) -> TradeRecord {
        TradeRecord {
            code: code.to_string(),
            name: name.to_string(),
            entry_date: self.entry_date,
            entry_price: self.entry_price,
            exit_date,
            exit_price,
            exit_reason,
            return_pct: self.return_at(exit_price),
            holding_days: (exit_date - self.entry_date).num_days(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub code: String,
    pub name: String,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub exit_reason: ExitReason,
    /// `(exit - entry) / entry`, a fraction.
    pub return_pct: f64,
    /// Calendar days between entry and exit.
    pub holding_days: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_position() -> OpenPosition {
        OpenPosition::open(
            30,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            100.0,
            0.10,
            0.05,
        )
    }

    #[test]
    fn thresholds_kept_as_fractions() {
        let pos = sample_position();
        assert_eq!(pos.take_profit_pct, 0.10);
        assert_eq!(pos.stop_loss_pct, 0.05);
        assert!((pos.return_at(110.0) - 0.10).abs() < 1e-12);
    }

    #[test]
    fn exact_threshold_closes_trigger_exits() {
        // 100 * 1.1 rounds to 110.00000000000001; a close of 110.0 must still count.
        let pos = sample_position();
        assert!(100.0 * (1.0 + 0.10) > 110.0);
        assert!(pos.should_take_profit(110.0));
        assert!(pos.should_stop_loss(95.0));

        let odd = OpenPosition::open(0, pos.entry_date, 3.3, 0.10, 0.05);
        assert!(odd.should_take_profit(3.63));
        assert!(odd.should_stop_loss(3.135));
    }

    #[test]
    fn should_take_profit_at_or_above_level() {
        let pos = sample_position();
        assert!(pos.should_take_profit(110.0));
        assert!(pos.should_take_profit(115.0));
        assert!(!pos.should_take_profit(109.99));
    }

    #[test]
    fn should_stop_loss_at_or_below_level() {
        let pos = sample_position();
        assert!(pos.should_stop_loss(95.0));
        assert!(pos.should_stop_loss(90.0));
        assert!(!pos.should_stop_loss(95.01));
    }

    #[test]
    fn close_computes_return_and_calendar_days() {
        let pos = sample_position();
        // Friday to the following Monday.
        let exit_date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let trade = pos.close("000001", "Ping An Bank", exit_date, 95.0, ExitReason::StopLoss);
        assert_eq!(trade.code, "000001");
        assert_eq!(trade.holding_days, 3);
        assert!((trade.return_pct - (-0.05)).abs() < 1e-12);
        assert_eq!(trade.exit_reason, ExitReason::StopLoss);
    }

    #[test]
    fn exit_reason_display() {
        assert_eq!(ExitReason::TakeProfit.to_string(), "take-profit");
        assert_eq!(ExitReason::StopLoss.to_string(), "stop-loss");
        assert_eq!(ExitReason::Timeout.to_string(), "timeout");
    }
}
