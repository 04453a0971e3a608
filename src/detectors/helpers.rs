//! Common helper functions for pattern detection
//!
//! Thresholds and comparison functions shared across the structural and
//! candlestick detector modules.

use crate::OHLCVExt;

// ============================================================
// CANDLE THRESHOLDS
// ============================================================

/// Body is doji-like: body <= range * DOJI_BODY_RATIO
pub const DOJI_BODY_RATIO: f64 = 0.01;
/// Marubozu: each shadow <= body * MARUBOZU_SHADOW_RATIO
pub const MARUBOZU_SHADOW_RATIO: f64 = 0.01;
/// Hammer family: long shadow >= body * LONG_SHADOW_FACTOR
pub const LONG_SHADOW_FACTOR: f64 = 2.0;
/// Hammer family: opposite shadow <= body * SHORT_SHADOW_RATIO
pub const SHORT_SHADOW_RATIO: f64 = 0.5;
/// Shooting star: lower shadow <= body * SHOOTING_STAR_SHADOW_RATIO
pub const SHOOTING_STAR_SHADOW_RATIO: f64 = 0.25;
/// Abandoned baby: star must open this far (relative) from both neighbours
pub const STAR_GAP_RATIO: f64 = 0.01;

// ============================================================
// PRICE COMPARISONS
// ============================================================

/// `|a - b| / base <= threshold`.
///
/// Comparisons involving NaN (including `0 / 0`) are false, so malformed
/// values never produce a match.
#[inline]
pub fn within(a: f64, b: f64, base: f64, threshold: f64) -> bool {
    (a - b).abs() / base <= threshold
}

/// `|a - b| / base > threshold`, false for NaN.
#[inline]
pub fn exceeds(a: f64, b: f64, base: f64, threshold: f64) -> bool {
    (a - b).abs() / base > threshold
}

// ============================================================
// CANDLE SHAPES
// ============================================================

/// Body no larger than 1% of the bar's range. A zero body is always a doji.
#[inline]
pub fn is_doji<T: OHLCVExt>(bar: &T) -> bool {
    bar.body() <= bar.range() * DOJI_BODY_RATIO
}

/// Both shadows no larger than 1% of the body. A flat bar qualifies.
#[inline]
pub fn is_marubozu<T: OHLCVExt>(bar: &T) -> bool {
    let limit = bar.body() * MARUBOZU_SHADOW_RATIO;
    bar.upper_shadow() <= limit && bar.lower_shadow() <= limit
}

/// Long lower shadow, short upper shadow (hammer / hanging man silhouette).
#[inline]
pub fn is_hammer_shape<T: OHLCVExt>(bar: &T) -> bool {
    let body = bar.body();
    bar.range() > 0.0
        && bar.lower_shadow() >= body * LONG_SHADOW_FACTOR
        && bar.upper_shadow() <= body * SHORT_SHADOW_RATIO
}

/// Long upper shadow, short lower shadow (inverted hammer silhouette).
#[inline]
pub fn is_inverted_hammer_shape<T: OHLCVExt>(bar: &T) -> bool {
    let body = bar.body();
    bar.range() > 0.0
        && bar.upper_shadow() >= body * LONG_SHADOW_FACTOR
        && bar.lower_shadow() <= body * SHORT_SHADOW_RATIO
}
