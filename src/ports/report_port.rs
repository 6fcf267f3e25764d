//! Report output port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::DayscreenError;
use crate::domain::screener::ScreenRow;

pub trait ReportPort {
    fn write_screen(&self, rows: &[ScreenRow], output_path: &str) -> Result<(), DayscreenError>;

    fn write_backtest(
        &self,
        result: &BacktestResult,
        output_path: &str,
    ) -> Result<(), DayscreenError>;
}
