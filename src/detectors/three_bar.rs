//! Three-bar candlestick predicates
//!
//! Stars, soldiers/crows, the inside/outside confirmation formations, Two Crows
//! and Abandoned Baby. Every predicate receives `[first, second, third]` with
//! `third` at the anchor index.

use super::{
    helpers::{exceeds, is_doji, STAR_GAP_RATIO},
    two_bar,
};
use crate::{OHLCVExt, OHLCV};

// ============================================================
// STARS
// ============================================================

/// Bearish bar, a doji closing below it, then a bullish close back above the
/// first close.
pub fn morning_star<T: OHLCV>(window: &[T]) -> bool {
    let [first, star, last] = window else {
        return false;
    };
    first.is_bearish()
        && is_doji(star)
        && last.is_bullish()
        && star.close() < first.close()
        && last.close() > first.close()
}

pub fn evening_star<T: OHLCV>(window: &[T]) -> bool {
    let [first, star, last] = window else {
        return false;
    };
    first.is_bullish()
        && is_doji(star)
        && last.is_bearish()
        && star.close() > first.close()
        && last.close() < first.close()
}

/// Doji isolated between two non-doji bars, opening more than 1% away from
/// both neighbouring closes.
pub fn abandoned_baby<T: OHLCV>(window: &[T]) -> bool {
    let [first, star, last] = window else {
        return false;
    };
    !is_doji(first)
        && is_doji(star)
        && !is_doji(last)
        && exceeds(star.open(), first.close(), first.close(), STAR_GAP_RATIO)
        && exceeds(star.open(), last.close(), last.close(), STAR_GAP_RATIO)
}

// ============================================================
// SOLDIERS / CROWS
// ============================================================

/// Three bullish bars, each opening above the previous close.
pub fn three_white_soldiers<T: OHLCV>(window: &[T]) -> bool {
    let [a, b, c] = window else {
        return false;
    };
    a.is_bullish()
        && b.is_bullish()
        && c.is_bullish()
        && a.close() < b.open()
        && b.close() < c.open()
}

/// Three bearish bars, each opening below the previous close.
pub fn three_black_crows<T: OHLCV>(window: &[T]) -> bool {
    let [a, b, c] = window else {
        return false;
    };
    a.is_bearish()
        && b.is_bearish()
        && c.is_bearish()
        && a.close() > b.open()
        && b.close() > c.open()
}

/// Two bullish bars opening above the previous close, then a bearish bar
/// that still closes above the first close.
pub fn two_crows<T: OHLCV>(window: &[T]) -> bool {
    let [a, b, c] = window else {
        return false;
    };
    a.is_bullish()
        && b.is_bullish()
        && c.is_bearish()
        && a.close() < b.open()
        && b.close() < c.open()
        && c.close() > a.close()
}

// ============================================================
// INSIDE / OUTSIDE CONFIRMATION
// ============================================================

/// Bullish harami confirmed by a bullish close above the first open.
pub fn three_inside_up<T: OHLCV>(window: &[T]) -> bool {
    let [a, _, c] = window else {
        return false;
    };
    two_bar::bullish_harami(&window[..2]) && c.is_bullish() && c.close() > a.open()
}

pub fn three_inside_down<T: OHLCV>(window: &[T]) -> bool {
    let [a, _, c] = window else {
        return false;
    };
    two_bar::bearish_harami(&window[..2]) && c.is_bearish() && c.close() < a.open()
}

/// Bullish engulfing confirmed by a bullish close above the engulfing close.
pub fn three_outside_up<T: OHLCV>(window: &[T]) -> bool {
    let [_, b, c] = window else {
        return false;
    };
    two_bar::bullish_engulfing(&window[..2]) && c.is_bullish() && c.close() > b.close()
}

pub fn three_outside_down<T: OHLCV>(window: &[T]) -> bool {
    let [_, b, c] = window else {
        return false;
    };
    two_bar::bearish_engulfing(&window[..2]) && c.is_bearish() && c.close() < b.close()
}
