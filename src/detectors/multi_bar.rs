//! Five-bar candlestick predicates
//!
//! Rising and Falling Three Methods: a trend bar, three bars held inside its
//! range, then a bar resuming the trend past the first close.

use crate::{OHLCVExt, OHLCV};

/// Bars `inner` stay within the high/low range of `outer`.
fn contained<T: OHLCV>(outer: &T, inner: &[T]) -> bool {
    inner
        .iter()
        .all(|b| b.high() <= outer.high() && b.low() >= outer.low())
}

pub fn rising_three_methods<T: OHLCV>(window: &[T]) -> bool {
    let [first, inner @ .., last] = window else {
        return false;
    };
    inner.len() == 3
        && first.is_bullish()
        && contained(first, inner)
        && last.is_bullish()
        && last.close() > first.close()
}

pub fn falling_three_methods<T: OHLCV>(window: &[T]) -> bool {
    let [first, inner @ .., last] = window else {
        return false;
    };
    inner.len() == 3
        && first.is_bearish()
        && contained(first, inner)
        && last.is_bearish()
        && last.close() < first.close()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bar;

    fn bar(o: f64, h: f64, l: f64, c: f64) -> Bar {
        Bar::new(0, o, h, l, c, 1000.0, 0)
    }

    fn rising() -> [Bar; 5] {
        [
            bar(100.0, 110.5, 99.5, 110.0),
            bar(108.0, 109.0, 104.0, 105.0),
            bar(105.0, 107.0, 103.0, 104.0),
            bar(104.0, 106.0, 102.0, 103.0),
            bar(103.0, 113.0, 102.5, 112.0),
        ]
    }

    #[test]
    fn test_rising_three_methods() {
        assert!(rising_three_methods(&rising()));
        assert!(!falling_three_methods(&rising()));
    }

    #[test]
    fn test_rising_three_methods_breakout_inside_range() {
        let mut window = rising();
        window[2].high = 111.0;
        assert!(!rising_three_methods(&window));
    }

    #[test]
    fn test_falling_three_methods() {
        let window = [
            bar(110.0, 110.5, 99.5, 100.0),
            bar(102.0, 106.0, 101.0, 105.0),
            bar(105.0, 107.0, 103.0, 106.0),
            bar(106.0, 108.0, 104.0, 107.0),
            bar(107.0, 107.5, 97.0, 98.0),
        ];
        assert!(falling_three_methods(&window));
        assert!(!rising_three_methods(&window));
    }

    #[test]
    fn test_short_window() {
        assert!(!rising_three_methods(&rising()[..4]));
    }
}
