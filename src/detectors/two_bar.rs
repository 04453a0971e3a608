//! Two-bar candlestick predicates
//!
//! Engulfing, Harami, PiercingLine, DarkCloudCover, Tweezer tops/bottoms and
//! Kicker. Every predicate receives `[prev, curr]` ending at the anchor index.

use crate::{OHLCVExt, OHLCV};

// ============================================================
// ENGULFING / HARAMI
// ============================================================

/// Bullish body whose open/close swallow the previous bearish body.
pub fn bullish_engulfing<T: OHLCV>(window: &[T]) -> bool {
    let [prev, curr] = window else {
        return false;
    };
    prev.is_bearish()
        && curr.is_bullish()
        && curr.close() >= prev.open()
        && curr.open() <= prev.close()
}

pub fn bearish_engulfing<T: OHLCV>(window: &[T]) -> bool {
    let [prev, curr] = window else {
        return false;
    };
    prev.is_bullish()
        && curr.is_bearish()
        && curr.open() >= prev.close()
        && curr.close() <= prev.open()
}

/// Bullish body strictly inside the previous bearish body.
pub fn bullish_harami<T: OHLCV>(window: &[T]) -> bool {
    let [prev, curr] = window else {
        return false;
    };
    prev.is_bearish()
        && curr.is_bullish()
        && curr.open() > prev.close()
        && curr.close() < prev.open()
}

pub fn bearish_harami<T: OHLCV>(window: &[T]) -> bool {
    let [prev, curr] = window else {
        return false;
    };
    prev.is_bullish()
        && curr.is_bearish()
        && curr.open() < prev.close()
        && curr.close() > prev.open()
}

// ============================================================
// PENETRATION PATTERNS
// ============================================================

/// Opens below the previous low, closes above the previous body midpoint.
pub fn piercing_line<T: OHLCV>(window: &[T]) -> bool {
    let [prev, curr] = window else {
        return false;
    };
    prev.is_bearish()
        && curr.is_bullish()
        && curr.open() < prev.low()
        && curr.close() > prev.body_midpoint()
}

/// Opens above the previous high, closes below the previous body midpoint.
pub fn dark_cloud_cover<T: OHLCV>(window: &[T]) -> bool {
    let [prev, curr] = window else {
        return false;
    };
    prev.is_bullish()
        && curr.is_bearish()
        && curr.open() > prev.high()
        && curr.close() < prev.body_midpoint()
}

// ============================================================
// TWEEZERS / KICKER
// ============================================================

// Tweezers compare extremes exactly; quoted prices repeat to the tick.
#[allow(clippy::float_cmp)]
pub fn tweezer_top<T: OHLCV>(window: &[T]) -> bool {
    let [prev, curr] = window else {
        return false;
    };
    prev.is_bullish() && curr.is_bearish() && prev.high() == curr.high()
}

#[allow(clippy::float_cmp)]
pub fn tweezer_bottom<T: OHLCV>(window: &[T]) -> bool {
    let [prev, curr] = window else {
        return false;
    };
    prev.is_bearish() && curr.is_bullish() && prev.low() == curr.low()
}

/// Colour flip with the whole new body on the far side of the previous open.
pub fn kicker<T: OHLCV>(window: &[T]) -> bool {
    let [prev, curr] = window else {
        return false;
    };
    let bearish_kick = prev.is_bullish()
        && curr.is_bearish()
        && curr.open() <= prev.open()
        && curr.close() <= prev.open();
    let bullish_kick = prev.is_bearish()
        && curr.is_bullish()
        && curr.open() >= prev.open()
        && curr.close() >= prev.open();
    bearish_kick || bullish_kick
}
