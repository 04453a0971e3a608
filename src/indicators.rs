//! Indicator calculations consumed by the structural detectors
//!
//! Both indicators are tail-aligned with their input: the first output value
//! belongs to the first series index with a full warm-up window, so callers
//! correlating an output back to a price index must add the offset.
//!
//! - [`moving_average`]: value `k` belongs to series index `k + period - 1`
//! - [`rsi`]: value `k` belongs to series index `k + period` (use [`rsi_at`])

/// Simple moving average over a trailing window of `period` values.
///
/// Returns an empty vector when `period` is zero or longer than the series.
/// A non-finite input only poisons the windows that contain it.
pub fn moving_average(series: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || period > series.len() {
        return Vec::new();
    }

    series
        .windows(period)
        .map(|window| window.iter().sum::<f64>() / period as f64)
        .collect()
}

/// Relative Strength Index over a rolling window of `period` price differences.
///
/// Running sums of gains and losses are kept over the trailing `period`
/// differences; once the window is full the oldest difference is dropped
/// before each new value is emitted. The output has `len - period` entries
/// (empty when the series has no more than `period` values).
///
/// `None` marks a window with neither gains nor losses, where the ratio is
/// undefined. A window with gains but no losses yields 100.
pub fn rsi(series: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || series.len() <= period {
        return Vec::new();
    }

    let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
    let mut values = Vec::with_capacity(diffs.len() + 1 - period);
    let mut sum_gain = 0.0;
    let mut sum_loss = 0.0;

    for (i, &diff) in diffs.iter().enumerate() {
        sum_gain += gain(diff);
        sum_loss += loss(diff);

        if i >= period {
            let oldest = diffs[i - period];
            sum_gain -= gain(oldest);
            sum_loss -= loss(oldest);
        }

        if i + 1 >= period {
            values.push(rsi_value(sum_gain / period as f64, sum_loss / period as f64));
        }
    }

    values
}

/// RSI value aligned to series index `index`, if one exists.
#[inline]
pub fn rsi_at(values: &[Option<f64>], period: usize, index: usize) -> Option<f64> {
    index
        .checked_sub(period)
        .and_then(|k| values.get(k).copied().flatten())
}

#[inline]
fn gain(diff: f64) -> f64 {
    diff.max(0.0)
}

#[inline]
fn loss(diff: f64) -> f64 {
    (-diff).max(0.0)
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    // rolling subtraction can leave tiny negative residue
    let avg_gain = avg_gain.max(0.0);
    let avg_loss = avg_loss.max(0.0);

    if avg_loss == 0.0 {
        return (avg_gain > 0.0).then_some(100.0);
    }

    let value = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
    value.is_finite().then(|| value.clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average() {
        let ma = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(ma, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_moving_average_invalid_period() {
        assert!(moving_average(&[1.0, 2.0], 0).is_empty());
        assert!(moving_average(&[1.0, 2.0], 3).is_empty());
        assert_eq!(moving_average(&[1.0, 2.0], 2), vec![1.5]);
    }

    #[test]
    fn test_moving_average_isolates_nan() {
        let ma = moving_average(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);
        assert!(ma[0].is_nan());
        assert!(ma[1].is_nan());
        assert_eq!(ma[2], 3.5);
        assert_eq!(ma[3], 4.5);
    }

    #[test]
    fn test_rsi_length_and_alignment() {
        let series: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let values = rsi(&series, 14);
        assert_eq!(values.len(), 6);
        assert_eq!(rsi_at(&values, 14, 13), None);
        assert_eq!(rsi_at(&values, 14, 14), Some(100.0));
        assert_eq!(rsi_at(&values, 14, 19), Some(100.0));
        assert_eq!(rsi_at(&values, 14, 20), None);
    }

    #[test]
    fn test_rsi_short_series() {
        assert!(rsi(&[1.0, 2.0, 3.0], 3).is_empty());
        assert!(rsi(&[1.0, 2.0, 3.0], 0).is_empty());
        assert_eq!(rsi(&[1.0, 2.0, 3.0, 4.0], 3).len(), 1);
    }

    #[test]
    fn test_rsi_all_losses_is_zero() {
        let series: Vec<f64> = (0..10).map(|i| 50.0 - i as f64).collect();
        assert!(rsi(&series, 5).iter().all(|v| *v == Some(0.0)));
    }

    #[test]
    fn test_rsi_flat_series_has_no_value() {
        let values = rsi(&[5.0; 10], 3);
        assert_eq!(values.len(), 7);
        assert!(values.iter().all(Option::is_none));
    }

    #[test]
    fn test_rsi_balanced_window() {
        // gains 2 + 2, losses 1 + 1 over period 4 -> rs = 2 -> 66.67
        let values = rsi(&[10.0, 12.0, 11.0, 13.0, 12.0], 4);
        assert_eq!(values.len(), 1);
        let v = values[0].unwrap();
        assert!((v - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_window_drops_oldest_difference() {
        // first window: +1 +1 -> 100; second window: +1 -1 -> 50
        let values = rsi(&[1.0, 2.0, 3.0, 2.0], 2);
        assert_eq!(values, vec![Some(100.0), Some(50.0)]);
    }
}
