//! Support and resistance levels
//!
//! Levels are built in three steps:
//!
//! 1. [`find_pivots`]: bars whose high (resistance) or low (support) strictly
//!    dominates `window_size` bars on each side. Resistance is checked first
//!    and a bar yields at most one pivot.
//! 2. [`count_reactions`]: bars across the whole series whose matching
//!    extreme lies within `reaction_threshold` price units of the pivot.
//! 3. [`group_levels`]: a single greedy pass over the pivots sorted by price,
//!    merging each into the previous cluster when it lies within `tolerance`
//!    of that cluster's running average. Clusters that never met in that
//!    order may end up closer than `tolerance`.
//!
//! [`analyze_reactions`] and [`first_tests`] then describe how price behaved
//! when it came back to each level.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    check_range,
    detectors::helpers::within,
    params::{get_period, get_ratio, get_value, ParamMeta, Parameterized},
    OHLCVExt, PatternError, Period, Ratio, Result, OHLCV,
};

/// Default relative clustering tolerance (1%)
pub const DEFAULT_TOLERANCE: Ratio = Ratio::new_const(0.01);

// ============================================================
// TYPES
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LevelKind {
    Support,
    Resistance,
}

impl LevelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LevelKind::Support => "support",
            LevelKind::Resistance => "resistance",
        }
    }

    /// The bar extreme compared against a level of this kind
    #[inline]
    fn extreme<T: OHLCV>(self, bar: &T) -> f64 {
        match self {
            LevelKind::Support => bar.low(),
            LevelKind::Resistance => bar.high(),
        }
    }

    /// A bar closing away from the level: bullish at support, bearish at resistance
    #[inline]
    fn holds<T: OHLCV>(self, bar: &T) -> bool {
        match self {
            LevelKind::Support => bar.is_bullish(),
            LevelKind::Resistance => bar.is_bearish(),
        }
    }
}

impl fmt::Display for LevelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A support or resistance price level.
///
/// A raw pivot has `count == 1`. After clustering, `price` is the average of
/// the merged pivots, `index` and `kind` come from the first pivot of the
/// cluster, and `reactions` is the largest reaction count among them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub price: f64,
    pub kind: LevelKind,
    pub index: usize,
    pub reactions: usize,
    /// Number of pivots merged into this level
    pub count: usize,
}

impl Level {
    pub fn pivot(kind: LevelKind, price: f64, index: usize, reactions: usize) -> Self {
        Self {
            price,
            kind,
            index,
            reactions,
            count: 1,
        }
    }
}

// ============================================================
// OPTIONS
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelOptions {
    /// Bars on each side a pivot must strictly dominate
    pub window_size: Period,
    /// Absolute price distance that counts as a touch
    pub reaction_threshold: f64,
    /// Relative distance for merging pivots into one level
    pub tolerance: Ratio,
}

impl Default for LevelOptions {
    fn default() -> Self {
        Self {
            window_size: Period::new_const(5),
            reaction_threshold: 2.0,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl LevelOptions {
    pub fn validate(&self) -> Result<()> {
        if self.window_size.get() == 0 {
            return Err(PatternError::InvalidValue("window_size must be > 0"));
        }
        check_range("reaction_threshold", self.reaction_threshold, 0.0, f64::MAX)?;
        check_range("tolerance", self.tolerance.get(), 0.0, 1.0)
    }
}

const LEVEL_PARAMS: &[ParamMeta] = &[
    ParamMeta::period("window_size", 5.0, (2.0, 20.0, 1.0), "Pivot window on each side"),
    ParamMeta::absolute(
        "reaction_threshold",
        2.0,
        (0.5, 10.0, 0.5),
        "Price distance that counts as touching a level",
    ),
    ParamMeta::ratio(
        "tolerance",
        0.01,
        (0.005, 0.05, 0.005),
        "Relative distance for merging pivots",
    ),
];

impl Parameterized for LevelOptions {
    fn param_meta() -> &'static [ParamMeta] {
        LEVEL_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let defaults = Self::default();
        let options = Self {
            window_size: get_period(params, "window_size", defaults.window_size.get())?,
            reaction_threshold: get_value(
                params,
                "reaction_threshold",
                defaults.reaction_threshold,
            ),
            tolerance: get_ratio(params, "tolerance", defaults.tolerance.get())?,
        };
        options.validate()?;
        Ok(options)
    }
}

// ============================================================
// PIVOTS
// ============================================================

/// Unclustered pivots in ascending index order, each with its reaction count.
pub fn find_pivots<T: OHLCV>(bars: &[T], options: &LevelOptions) -> Result<Vec<Level>> {
    options.validate()?;
    let w = options.window_size.get();
    let mut pivots = Vec::new();

    for i in w..bars.len().saturating_sub(w) {
        let mut neighbours = bars[i - w..i].iter().chain(&bars[i + 1..=i + w]);
        let (high, low) = (bars[i].high(), bars[i].low());

        let kind = if neighbours.clone().all(|b| b.high() < high) {
            LevelKind::Resistance
        } else if neighbours.all(|b| b.low() > low) {
            LevelKind::Support
        } else {
            continue;
        };

        let price = kind.extreme(&bars[i]);
        let reactions = count_reactions(bars, kind, price, options.reaction_threshold);
        pivots.push(Level::pivot(kind, price, i, reactions));
    }

    Ok(pivots)
}

#[inline]
fn touches<T: OHLCV>(bar: &T, kind: LevelKind, price: f64, threshold: f64) -> bool {
    (kind.extreme(bar) - price).abs() < threshold
}

/// Bars whose low (support) or high (resistance) lies strictly within
/// `threshold` price units of `price`.
pub fn count_reactions<T: OHLCV>(bars: &[T], kind: LevelKind, price: f64, threshold: f64) -> usize {
    bars.iter()
        .filter(|b| touches(*b, kind, price, threshold))
        .count()
}

// ============================================================
// CLUSTERING
// ============================================================

/// Merge pivots into levels with one greedy pass in ascending price order.
///
/// Pivots with equal prices keep their input order.
pub fn group_levels(pivots: &[Level], tolerance: Ratio) -> Vec<Level> {
    let mut sorted = pivots.to_vec();
    sorted.sort_by(|a, b| a.price.total_cmp(&b.price));

    let mut levels: Vec<Level> = Vec::new();
    for pivot in sorted {
        match levels.last_mut() {
            Some(level) if within(pivot.price, level.price, level.price, tolerance.get()) => {
                let (n, m) = (level.count as f64, pivot.count as f64);
                level.price = (level.price * n + pivot.price * m) / (n + m);
                level.count += pivot.count;
                level.reactions = level.reactions.max(pivot.reactions);
            }
            _ => levels.push(pivot),
        }
    }
    levels
}

/// Find clustered support/resistance levels.
pub fn find_levels<T: OHLCV>(bars: &[T], options: &LevelOptions) -> Result<Vec<Level>> {
    let pivots = find_pivots(bars, options)?;
    let levels = group_levels(&pivots, options.tolerance);

    debug!(
        bars = bars.len(),
        pivots = pivots.len(),
        levels = levels.len(),
        "level search complete"
    );
    Ok(levels)
}

// ============================================================
// REACTIONS
// ============================================================

/// How price behaved at one level across the series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelReaction {
    pub level: Level,
    /// Bars touching the level
    pub total: usize,
    /// Touching bars that closed away from the level
    pub positive: usize,
    pub negative: usize,
    /// `positive / total`, `None` when nothing touched the level
    pub success_rate: Option<f64>,
}

/// Tally touches of each level and how many of them held.
pub fn analyze_reactions<T: OHLCV>(
    bars: &[T],
    levels: &[Level],
    reaction_threshold: f64,
) -> Vec<LevelReaction> {
    levels
        .iter()
        .map(|level| {
            let (total, positive) = bars
                .iter()
                .filter(|b| touches(*b, level.kind, level.price, reaction_threshold))
                .fold((0usize, 0usize), |(total, positive), b| {
                    (total + 1, positive + usize::from(level.kind.holds(b)))
                });

            LevelReaction {
                level: *level,
                total,
                positive,
                negative: total - positive,
                success_rate: (total > 0).then(|| positive as f64 / total as f64),
            }
        })
        .collect()
}

/// First bar to touch a level after a bar that did not
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirstTest {
    pub level: Level,
    pub index: usize,
    /// The touching bar closed away from the level
    pub positive: bool,
}

/// Find the first test of each level.
///
/// Bar 0 never counts as a test. Levels that are never approached from
/// outside the threshold are omitted.
pub fn first_tests<T: OHLCV>(
    bars: &[T],
    levels: &[Level],
    reaction_threshold: f64,
) -> Vec<FirstTest> {
    levels
        .iter()
        .filter_map(|level| {
            let touched = |b: &T| touches(b, level.kind, level.price, reaction_threshold);
            bars.windows(2)
                .position(|w| touched(&w[1]) && !touched(&w[0]))
                .map(|p| {
                    let index = p + 1;
                    FirstTest {
                        level: *level,
                        index,
                        positive: level.kind.holds(&bars[index]),
                    }
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bar;

    fn hl(high: f64, low: f64) -> Bar {
        let mid = (high + low) / 2.0;
        Bar::new(0, mid, high, low, mid, 1000.0, 0)
    }

    fn ohlc(o: f64, h: f64, l: f64, c: f64) -> Bar {
        Bar::new(0, o, h, l, c, 1000.0, 0)
    }

    fn options(window: usize) -> LevelOptions {
        LevelOptions {
            window_size: Period::new(window).unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn test_group_levels_merges_close_pivots() {
        let pivots = [
            Level::pivot(LevelKind::Support, 100.0, 3, 1),
            Level::pivot(LevelKind::Support, 101.0, 9, 4),
            Level::pivot(LevelKind::Resistance, 200.0, 6, 2),
        ];
        let levels = group_levels(&pivots, DEFAULT_TOLERANCE);

        assert_eq!(levels.len(), 2);
        assert!((levels[0].price - 100.5).abs() < 1e-9);
        assert_eq!(levels[0].kind, LevelKind::Support);
        assert_eq!(levels[0].count, 2);
        assert_eq!(levels[0].index, 3);
        assert_eq!(levels[0].reactions, 4);
        assert_eq!(levels[1].price, 200.0);
        assert_eq!(levels[1].kind, LevelKind::Resistance);
    }

    #[test]
    fn test_group_levels_sorts_by_price() {
        let pivots = [
            Level::pivot(LevelKind::Resistance, 150.0, 1, 0),
            Level::pivot(LevelKind::Support, 50.0, 2, 0),
        ];
        let levels = group_levels(&pivots, DEFAULT_TOLERANCE);
        assert_eq!(levels[0].price, 50.0);
        assert_eq!(levels[1].price, 150.0);
    }

    #[test]
    fn test_group_levels_running_average() {
        // 100 -> 100.5 after 101; 101.4 is within 1% of 100.5 but not of 100
        let pivots = [
            Level::pivot(LevelKind::Support, 100.0, 0, 0),
            Level::pivot(LevelKind::Support, 101.0, 1, 0),
            Level::pivot(LevelKind::Support, 101.4, 2, 0),
        ];
        let levels = group_levels(&pivots, DEFAULT_TOLERANCE);
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].count, 3);
        assert!((levels[0].price - 302.4 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_group_levels_empty() {
        assert!(group_levels(&[], DEFAULT_TOLERANCE).is_empty());
    }

    #[test]
    fn test_find_pivots_peak_and_trough() {
        let bars = vec![
            hl(10.0, 9.0),
            hl(11.0, 10.0),
            hl(15.0, 12.0),
            hl(11.0, 10.0),
            hl(10.0, 9.0),
            hl(9.0, 5.0),
            hl(10.0, 9.0),
            hl(11.0, 10.0),
        ];
        let pivots = find_pivots(&bars, &options(2)).unwrap();

        assert_eq!(pivots.len(), 2);
        assert_eq!((pivots[0].index, pivots[0].kind), (2, LevelKind::Resistance));
        assert_eq!(pivots[0].price, 15.0);
        assert_eq!((pivots[1].index, pivots[1].kind), (5, LevelKind::Support));
        assert_eq!(pivots[1].price, 5.0);
    }

    #[test]
    fn test_outside_bar_is_resistance_only() {
        let bars = vec![
            hl(10.0, 9.0),
            hl(10.0, 9.0),
            hl(12.0, 7.0),
            hl(10.0, 9.0),
            hl(10.0, 9.0),
        ];
        let pivots = find_pivots(&bars, &options(2)).unwrap();
        assert_eq!(pivots.len(), 1);
        assert_eq!(pivots[0].kind, LevelKind::Resistance);
    }

    #[test]
    fn test_pivots_require_strict_dominance() {
        let bars = vec![
            hl(10.0, 9.0),
            hl(12.0, 9.5),
            hl(12.0, 9.5),
            hl(10.0, 9.0),
            hl(10.0, 9.0),
        ];
        assert!(find_pivots(&bars, &options(1)).unwrap().is_empty());
    }

    #[test]
    fn test_short_series_has_no_pivots() {
        let bars = vec![hl(10.0, 9.0); 10];
        assert!(find_pivots(&bars, &LevelOptions::default()).unwrap().is_empty());
        assert!(find_levels::<Bar>(&[], &LevelOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn test_count_reactions_is_strict() {
        let bars = vec![hl(12.0, 100.0), hl(12.0, 101.9), hl(12.0, 102.0), hl(12.0, 98.5)];
        assert_eq!(count_reactions(&bars, LevelKind::Support, 100.0, 2.0), 3);
    }

    #[test]
    fn test_find_levels_rejects_bad_options() {
        let bars = vec![hl(10.0, 9.0); 20];
        let bad = LevelOptions {
            reaction_threshold: -1.0,
            ..Default::default()
        };
        assert!(find_levels(&bars, &bad).is_err());

        let bad = LevelOptions {
            tolerance: Ratio::new_const(1.5),
            ..Default::default()
        };
        assert!(matches!(
            find_levels(&bars, &bad),
            Err(PatternError::OutOfRange { field: "tolerance", .. })
        ));
    }

    #[test]
    fn test_analyze_reactions() {
        let level = Level::pivot(LevelKind::Support, 100.0, 0, 0);
        let bars = vec![
            ohlc(101.0, 103.0, 100.5, 102.0), // touch, bullish
            ohlc(102.0, 102.5, 99.5, 100.0),  // touch, bearish
            ohlc(110.0, 112.0, 108.0, 111.0), // away
        ];
        let reactions = analyze_reactions(&bars, &[level], 2.0);
        assert_eq!(reactions.len(), 1);
        assert_eq!(reactions[0].total, 2);
        assert_eq!(reactions[0].positive, 1);
        assert_eq!(reactions[0].negative, 1);
        assert_eq!(reactions[0].success_rate, Some(0.5));
    }

    #[test]
    fn test_analyze_reactions_untouched_level() {
        let level = Level::pivot(LevelKind::Resistance, 500.0, 0, 0);
        let bars = vec![ohlc(100.0, 101.0, 99.0, 100.5)];
        let reactions = analyze_reactions(&bars, &[level], 2.0);
        assert_eq!(reactions[0].total, 0);
        assert_eq!(reactions[0].success_rate, None);
    }

    #[test]
    fn test_first_tests() {
        let resistance = Level::pivot(LevelKind::Resistance, 120.0, 0, 0);
        let untouched = Level::pivot(LevelKind::Resistance, 500.0, 0, 0);
        let bars = vec![
            ohlc(110.0, 112.0, 109.0, 111.0),
            ohlc(111.0, 113.0, 110.0, 112.0),
            ohlc(118.0, 119.5, 115.0, 116.0), // first touch, bearish
            ohlc(116.0, 120.5, 115.0, 120.0),
        ];
        let tests = first_tests(&bars, &[resistance, untouched], 2.0);
        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].index, 2);
        assert!(tests[0].positive);
    }

    #[test]
    fn test_first_bar_touch_is_not_a_test() {
        let level = Level::pivot(LevelKind::Support, 100.0, 0, 0);
        let bars = vec![ohlc(101.0, 103.0, 100.5, 102.0), ohlc(102.0, 104.0, 101.0, 103.0)];
        assert!(first_tests(&bars, &[level], 2.0).is_empty());
    }

    #[test]
    fn test_level_options_with_params() {
        let mut params = HashMap::new();
        params.insert("window_size", 3.0);
        params.insert("tolerance", 0.02);
        let options = LevelOptions::with_params(&params).unwrap();
        assert_eq!(options.window_size.get(), 3);
        assert_eq!(options.tolerance.get(), 0.02);
        assert_eq!(options.reaction_threshold, 2.0);
    }
}
