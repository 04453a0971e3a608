//! Structural (chart) pattern detection over a close-price series
//!
//! A single forward scan evaluates every [`StructuralKind`] predicate at each
//! index from 1 to `len - 3`. Predicates are independent; several kinds may
//! match at the same index and each produces its own [`PatternMatch`].
//!
//! Predicates needing more history than an index offers simply do not match.
//! Non-finite prices make the relative comparisons false instead of raising.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::helpers::{exceeds, within};
use crate::{
    check_range, closes, indicators,
    params::{get_period, get_value, ParamMeta, Parameterized},
    volumes, Direction, Occurrence, PatternError, Period, Result, OHLCV,
};

// ============================================================
// PATTERN KINDS
// ============================================================

/// Structural pattern kinds, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StructuralKind {
    DoubleBottom,
    DoubleTop,
    SymmetricalTriangle,
    AscendingTriangle,
    DescendingTriangle,
    Flag,
    RectangleTriangle,
    HeadAndShoulders,
    InverseHeadAndShoulders,
}

impl StructuralKind {
    pub const ALL: [StructuralKind; 9] = [
        StructuralKind::DoubleBottom,
        StructuralKind::DoubleTop,
        StructuralKind::SymmetricalTriangle,
        StructuralKind::AscendingTriangle,
        StructuralKind::DescendingTriangle,
        StructuralKind::Flag,
        StructuralKind::RectangleTriangle,
        StructuralKind::HeadAndShoulders,
        StructuralKind::InverseHeadAndShoulders,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StructuralKind::DoubleBottom => "DoubleBottom",
            StructuralKind::DoubleTop => "DoubleTop",
            StructuralKind::SymmetricalTriangle => "SymmetricalTriangle",
            StructuralKind::AscendingTriangle => "AscendingTriangle",
            StructuralKind::DescendingTriangle => "DescendingTriangle",
            StructuralKind::Flag => "Flag",
            StructuralKind::RectangleTriangle => "RectangleTriangle",
            StructuralKind::HeadAndShoulders => "HeadAndShoulders",
            StructuralKind::InverseHeadAndShoulders => "InverseHeadAndShoulders",
        }
    }

    /// Returns the typical/expected direction of this pattern.
    ///
    /// `None` means the pattern is a continuation/consolidation whose
    /// direction depends on the preceding move.
    pub fn typical_direction(self) -> Option<Direction> {
        match self {
            StructuralKind::DoubleBottom
            | StructuralKind::AscendingTriangle
            | StructuralKind::InverseHeadAndShoulders => Some(Direction::Bullish),
            StructuralKind::DoubleTop
            | StructuralKind::DescendingTriangle
            | StructuralKind::HeadAndShoulders => Some(Direction::Bearish),
            StructuralKind::SymmetricalTriangle | StructuralKind::RectangleTriangle => {
                Some(Direction::Neutral)
            }
            StructuralKind::Flag => None,
        }
    }
}

impl fmt::Display for StructuralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structural pattern confirmed at `index`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub index: usize,
    pub kind: StructuralKind,
    /// Bars since the previously emitted match of any kind (since index 0
    /// for the first match). Matches sharing an index share a length.
    pub length: usize,
}

impl Occurrence for PatternMatch {
    type Kind = StructuralKind;

    fn index(&self) -> usize {
        self.index
    }

    fn kind(&self) -> StructuralKind {
        self.kind
    }
}

// ============================================================
// OPTIONS
// ============================================================

/// Structural detector configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralOptions {
    /// Relative price tolerance
    pub threshold: f64,
    /// Relative volume change that qualifies as a flag-pole spike
    pub volume_threshold: f64,
    pub rsi_period: Period,
    /// Flag requires RSI strictly inside (rsi_threshold, 100 - rsi_threshold)
    pub rsi_threshold: f64,
}

impl Default for StructuralOptions {
    fn default() -> Self {
        Self {
            threshold: 0.03,
            volume_threshold: 0.05,
            rsi_period: Period::new_const(14),
            rsi_threshold: 30.0,
        }
    }
}

impl StructuralOptions {
    pub fn validate(&self) -> Result<()> {
        check_range("threshold", self.threshold, 0.0, f64::MAX)?;
        check_range("volume_threshold", self.volume_threshold, 0.0, f64::MAX)?;
        check_range("rsi_threshold", self.rsi_threshold, 0.0, 50.0)?;
        if self.rsi_period.get() == 0 {
            return Err(PatternError::InvalidValue("rsi_period must be > 0"));
        }
        Ok(())
    }
}

const STRUCTURAL_PARAMS: &[ParamMeta] = &[
    ParamMeta::ratio(
        "threshold",
        0.03,
        (0.01, 0.10, 0.01),
        "Relative price tolerance for structural comparisons",
    ),
    ParamMeta::ratio(
        "volume_threshold",
        0.05,
        (0.01, 0.50, 0.01),
        "Relative volume change required for a flag pole",
    ),
    ParamMeta::period("rsi_period", 14.0, (5.0, 30.0, 1.0), "RSI lookback for the flag filter"),
    ParamMeta::absolute(
        "rsi_threshold",
        30.0,
        (10.0, 45.0, 5.0),
        "Flag RSI must lie strictly inside (t, 100 - t)",
    ),
];

impl Parameterized for StructuralOptions {
    fn param_meta() -> &'static [ParamMeta] {
        STRUCTURAL_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let defaults = Self::default();
        let options = Self {
            threshold: get_value(params, "threshold", defaults.threshold),
            volume_threshold: get_value(params, "volume_threshold", defaults.volume_threshold),
            rsi_period: get_period(params, "rsi_period", defaults.rsi_period.get())?,
            rsi_threshold: get_value(params, "rsi_threshold", defaults.rsi_threshold),
        };
        options.validate()?;
        Ok(options)
    }
}

// ============================================================
// SCAN
// ============================================================

/// Detect structural patterns in a close-price series.
///
/// `volumes` must be index-aligned with `prices`. Matches are returned in
/// ascending index order; within one index they follow [`StructuralKind::ALL`].
pub fn detect(
    prices: &[f64],
    volumes: &[f64],
    options: &StructuralOptions,
) -> Result<Vec<PatternMatch>> {
    options.validate()?;
    if volumes.len() != prices.len() {
        return Err(PatternError::LengthMismatch {
            field: "volumes",
            expected: prices.len(),
            got: volumes.len(),
        });
    }

    let scan = Scan {
        prices,
        volumes,
        rsi: indicators::rsi(prices, options.rsi_period.get()),
        options,
    };

    let mut matches: Vec<PatternMatch> = Vec::new();
    for i in 1..prices.len().saturating_sub(2) {
        let length = i - matches.last().map_or(0, |m| m.index);

        for kind in StructuralKind::ALL {
            if scan.matches(kind, i) {
                trace!(index = i, kind = kind.as_str(), length, "structural match");
                matches.push(PatternMatch {
                    index: i,
                    kind,
                    length,
                });
            }
        }
    }

    debug!(
        prices = prices.len(),
        matches = matches.len(),
        "structural scan complete"
    );
    Ok(matches)
}

/// Detect structural patterns using bar closes and volumes.
pub fn detect_bars<T: OHLCV>(bars: &[T], options: &StructuralOptions) -> Result<Vec<PatternMatch>> {
    detect(&closes(bars), &volumes(bars), options)
}

/// Inputs shared by every predicate during one scan
struct Scan<'a> {
    prices: &'a [f64],
    volumes: &'a [f64],
    rsi: Vec<Option<f64>>,
    options: &'a StructuralOptions,
}

impl Scan<'_> {
    fn matches(&self, kind: StructuralKind, i: usize) -> bool {
        match kind {
            StructuralKind::DoubleBottom => self.double_bottom(i),
            StructuralKind::DoubleTop => self.double_top(i),
            StructuralKind::SymmetricalTriangle => self.symmetrical_triangle(i),
            StructuralKind::AscendingTriangle => self.ascending_triangle(i),
            StructuralKind::DescendingTriangle => self.descending_triangle(i),
            StructuralKind::Flag => self.flag(i),
            StructuralKind::RectangleTriangle => self.rectangle_triangle(i),
            StructuralKind::HeadAndShoulders => self.head_and_shoulders(i),
            StructuralKind::InverseHeadAndShoulders => self.inverse_head_and_shoulders(i),
        }
    }

    /// `(prev, current, next)` around `i`
    #[inline]
    fn neighbours(&self, i: usize) -> Option<(f64, f64, f64)> {
        let p = self.prices;
        (i >= 1 && i + 1 < p.len()).then(|| (p[i - 1], p[i], p[i + 1]))
    }

    /// Current and next price both within tolerance of their predecessor.
    fn flat_neighbours(&self, prev: f64, cur: f64, next: f64) -> bool {
        let t = self.options.threshold;
        within(cur, prev, prev, t) && within(cur, next, cur, t)
    }

    fn double_bottom(&self, i: usize) -> bool {
        let Some((prev, cur, next)) = self.neighbours(i) else {
            return false;
        };
        self.flat_neighbours(prev, cur, next) && cur < prev && cur < next
    }

    fn double_top(&self, i: usize) -> bool {
        let Some((prev, cur, next)) = self.neighbours(i) else {
            return false;
        };
        self.flat_neighbours(prev, cur, next) && cur > prev && cur > next
    }

    fn symmetrical_triangle(&self, i: usize) -> bool {
        let Some((prev, cur, next)) = self.neighbours(i) else {
            return false;
        };
        within(prev, next, prev, self.options.threshold) && cur != prev && cur != next
    }

    fn ascending_triangle(&self, i: usize) -> bool {
        let Some((prev, cur, next)) = self.neighbours(i) else {
            return false;
        };
        self.symmetrical_triangle(i) && prev < cur && cur < next
    }

    fn descending_triangle(&self, i: usize) -> bool {
        let Some((prev, cur, next)) = self.neighbours(i) else {
            return false;
        };
        self.symmetrical_triangle(i) && prev > cur && cur > next
    }

    fn flag(&self, i: usize) -> bool {
        if i < 3 {
            return false;
        }
        let Some((prev, cur, next)) = self.neighbours(i) else {
            return false;
        };
        let t = self.options.threshold;
        let pole_start = self.prices[i - 2];
        let (v_start, v_end) = (self.volumes[i - 2], self.volumes[i - 1]);

        let pole = exceeds(prev, pole_start, pole_start, t)
            && exceeds(v_end, v_start, v_start, self.options.volume_threshold);
        let body = self.flat_neighbours(prev, cur, next);
        if !(pole && body) {
            return false;
        }

        let lower = self.options.rsi_threshold;
        let upper = 100.0 - lower;
        indicators::rsi_at(&self.rsi, self.options.rsi_period.get(), i - 1)
            .is_some_and(|rsi| rsi > lower && rsi < upper)
    }

    /// Alternating high/low samples three bars back, each pair within tolerance
    fn rectangle_triangle(&self, i: usize) -> bool {
        let p = self.prices;
        if i < 3 || i + 3 >= p.len() {
            return false;
        }
        let t = self.options.threshold;
        let (high1, low1, high2, low2) = (p[i - 3], p[i - 2], p[i - 1], p[i]);
        within(high1, high2, high2, t) && within(low1, low2, low2, t)
    }

    /// `(outer_left, left_shoulder, head, right_shoulder, outer_right)` around `i`
    fn shoulders(&self, i: usize) -> Option<[f64; 5]> {
        let p = self.prices;
        (i >= 3 && i + 1 < p.len()).then(|| [p[i - 3], p[i - 2], p[i - 1], p[i], p[i + 1]])
    }

    fn head_and_shoulders(&self, i: usize) -> bool {
        let Some([left_trough, left, head, right, right_trough]) = self.shoulders(i) else {
            return false;
        };
        let t = self.options.threshold;
        head > left
            && head > right
            && within(left, right, right, t)
            && within(left_trough, right_trough, right_trough, t)
    }

    fn inverse_head_and_shoulders(&self, i: usize) -> bool {
        let Some([left_peak, left, head, right, right_peak]) = self.shoulders(i) else {
            return false;
        };
        let t = self.options.threshold;
        head < left
            && head < right
            && within(left, right, right, t)
            && within(left_peak, right_peak, right_peak, t)
    }
}
