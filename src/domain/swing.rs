//! Local swing high/low detection over a bar window.

use crate::domain::ohlcv::OhlcvBar;

/// Indices of local extremes, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwingPoints {
    pub highs: Vec<usize>,
    pub lows: Vec<usize>,
}

impl SwingPoints {
    pub fn last_high(&self) -> Option<usize> {
        self.highs.last().copied()
    }
}

/// Marks index `i` as a swing high when `bars[i].high` is the maximum of
/// `bars[i-w..=i+w]`, and as a swing low when `bars[i].low` is the minimum.
///
/// Only interior indices with a full window on both sides are eligible.
/// Ties count: a plateau of equal highs marks every bar on it.
pub fn find_swing_points(bars: &[OhlcvBar], half_width: usize) -> SwingPoints {
    let mut points = SwingPoints::default();
    if half_width == 0 || bars.len() < 2 * half_width + 1 {
        return points;
    }

    for i in half_width..bars.len() - half_width {
        let window = &bars[i - half_width..=i + half_width];
        let high = bars[i].high;
        let low = bars[i].low;
        if window.iter().all(|b| high >= b.high) {
            points.highs.push(i);
        }
        if window.iter().all(|b| low <= b.low) {
            points.lows.push(i);
        }
    }
    points
}
