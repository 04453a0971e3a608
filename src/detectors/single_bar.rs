//! Single-bar candlestick predicates
//!
//! Doji, Marubozu, Hammer, HangingMan, InvertedHammer, ShootingStar.
//!
//! The shape of each formation is read from one bar. Hammer, HangingMan and
//! ShootingStar also look at the preceding bar to tell the trend context
//! apart, so they receive a two-bar window.

use super::helpers::{
    is_doji, is_hammer_shape, is_inverted_hammer_shape, is_marubozu, LONG_SHADOW_FACTOR,
    SHOOTING_STAR_SHADOW_RATIO,
};
use crate::{OHLCVExt, OHLCV};

// ============================================================
// BODY SHAPES
// ============================================================

pub fn doji<T: OHLCV>(window: &[T]) -> bool {
    let [bar] = window else {
        return false;
    };
    is_doji(bar)
}

pub fn marubozu<T: OHLCV>(window: &[T]) -> bool {
    let [bar] = window else {
        return false;
    };
    is_marubozu(bar)
}

// ============================================================
// SHADOW SHAPES
// ============================================================

/// Hammer silhouette after a lower close: the previous close sits above the
/// current one.
pub fn hammer<T: OHLCV>(window: &[T]) -> bool {
    let [prev, curr] = window else {
        return false;
    };
    is_hammer_shape(curr) && prev.close() > curr.close()
}

/// Hammer silhouette that did not follow a lower close.
pub fn hanging_man<T: OHLCV>(window: &[T]) -> bool {
    let [prev, curr] = window else {
        return false;
    };
    is_hammer_shape(curr) && prev.close() <= curr.close()
}

pub fn inverted_hammer<T: OHLCV>(window: &[T]) -> bool {
    let [bar] = window else {
        return false;
    };
    is_inverted_hammer_shape(bar)
}

/// Bearish bar with a long upper shadow after a bullish bar.
pub fn shooting_star<T: OHLCV>(window: &[T]) -> bool {
    let [prev, curr] = window else {
        return false;
    };
    let body = curr.body();
    prev.is_bullish()
        && curr.is_bearish()
        && curr.upper_shadow() >= body * LONG_SHADOW_FACTOR
        && curr.lower_shadow() <= body * SHOOTING_STAR_SHADOW_RATIO
}
