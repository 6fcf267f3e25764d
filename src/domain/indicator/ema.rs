//! Exponential moving average recurrence.
//!
//! k = 2/(n+1), seeded with the first value, then EMA[i] = x[i]*k + EMA[i-1]*(1-k).
//! No warmup: every input yields a value.

/// Raw EMA recurrence over an arbitrary input, seeded with `values[0]`.
pub fn ema_values(values: &[f64], span: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if span == 0 {
        return out;
    }
    let k = 2.0 / (span as f64 + 1.0);
    let mut ema = 0.0;
    for (i, &x) in values.iter().enumerate() {
        ema = if i == 0 { x } else { x * k + ema * (1.0 - k) };
        out.push(ema);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_seed_is_first_value() {
        let out = ema_values(&[10.0, 20.0, 30.0], 3);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], 10.0);
    }

    #[test]
    fn ema_recursive_calculation() {
        let out = ema_values(&[10.0, 20.0, 30.0], 3);

        let k = 2.0 / 4.0;
        let e1 = 20.0 * k + 10.0 * (1.0 - k);
        let e2 = 30.0 * k + e1 * (1.0 - k);
        assert!((out[1] - e1).abs() < f64::EPSILON);
        assert!((out[2] - e2).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_period_1_tracks_input() {
        let out = ema_values(&[10.0, 20.0, 30.0], 1);
        assert_eq!(out, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn ema_equal_prices() {
        let out = ema_values(&[100.0; 6], 12);
        assert!(out.iter().all(|v| (v - 100.0).abs() < 1e-9));
    }

    #[test]
    fn ema_empty_and_zero_period() {
        assert!(ema_values(&[], 3).is_empty());
        assert!(ema_values(&[1.0, 2.0], 0).is_empty());
    }
}
