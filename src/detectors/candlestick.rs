//! Candlestick formation detection over OHLC bars
//!
//! Every [`CandlestickKind`] declares how many bars it inspects. At each index
//! `i >= 2` the detector hands each kind the window of `min_bars` bars ending
//! at `i`; kinds needing more history than `i` offers are skipped. Several
//! kinds may fire at the same index.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{multi_bar, single_bar, three_bar, two_bar};
use crate::{Direction, Occurrence, OHLCV};

/// First index the candlestick scan evaluates.
pub const FIRST_INDEX: usize = 2;

macro_rules! define_candlestick_kinds {
    (
        $(
            $variant:ident($min_bars:literal, $direction:expr) => $predicate:path
        ),* $(,)?
    ) => {
        /// Candlestick formation kinds, in evaluation order
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum CandlestickKind {
            $($variant),*
        }

        impl CandlestickKind {
            pub const ALL: &'static [CandlestickKind] = &[$(CandlestickKind::$variant),*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            /// Number of bars the formation spans, ending at the anchor index
            pub fn min_bars(self) -> usize {
                match self {
                    $(Self::$variant => $min_bars),*
                }
            }

            /// `None` for formations that signal either way.
            pub fn typical_direction(self) -> Option<Direction> {
                match self {
                    $(Self::$variant => $direction),*
                }
            }

            /// Evaluate this formation with its window ending at `index`.
            ///
            /// Returns false when `index` has too little history or lies past the end.
            #[inline]
            pub fn matches<T: OHLCV>(self, bars: &[T], index: usize) -> bool {
                let Some(start) = (index + 1).checked_sub(self.min_bars()) else {
                    return false;
                };
                let Some(window) = bars.get(start..=index) else {
                    return false;
                };
                match self {
                    $(Self::$variant => $predicate(window)),*
                }
            }
        }
    };
}

const BULLISH: Option<Direction> = Some(Direction::Bullish);
const BEARISH: Option<Direction> = Some(Direction::Bearish);
const NEUTRAL: Option<Direction> = Some(Direction::Neutral);
const EITHER: Option<Direction> = None;

define_candlestick_kinds! {
    // Single bar
    Doji(1, NEUTRAL) => single_bar::doji,
    Marubozu(1, EITHER) => single_bar::marubozu,
    Hammer(2, BULLISH) => single_bar::hammer,
    HangingMan(2, BEARISH) => single_bar::hanging_man,
    InvertedHammer(1, BULLISH) => single_bar::inverted_hammer,
    ShootingStar(2, BEARISH) => single_bar::shooting_star,

    // Two bar
    BullishEngulfing(2, BULLISH) => two_bar::bullish_engulfing,
    BearishEngulfing(2, BEARISH) => two_bar::bearish_engulfing,
    BullishHarami(2, BULLISH) => two_bar::bullish_harami,
    BearishHarami(2, BEARISH) => two_bar::bearish_harami,
    PiercingLine(2, BULLISH) => two_bar::piercing_line,
    DarkCloudCover(2, BEARISH) => two_bar::dark_cloud_cover,
    TweezerTop(2, BEARISH) => two_bar::tweezer_top,
    TweezerBottom(2, BULLISH) => two_bar::tweezer_bottom,
    Kicker(2, EITHER) => two_bar::kicker,

    // Three bar
    MorningStar(3, BULLISH) => three_bar::morning_star,
    EveningStar(3, BEARISH) => three_bar::evening_star,
    ThreeWhiteSoldiers(3, BULLISH) => three_bar::three_white_soldiers,
    ThreeBlackCrows(3, BEARISH) => three_bar::three_black_crows,
    ThreeInsideUp(3, BULLISH) => three_bar::three_inside_up,
    ThreeInsideDown(3, BEARISH) => three_bar::three_inside_down,
    ThreeOutsideUp(3, BULLISH) => three_bar::three_outside_up,
    ThreeOutsideDown(3, BEARISH) => three_bar::three_outside_down,
    TwoCrows(3, BEARISH) => three_bar::two_crows,
    AbandonedBaby(3, EITHER) => three_bar::abandoned_baby,

    // Five bar
    RisingThreeMethods(5, BULLISH) => multi_bar::rising_three_methods,
    FallingThreeMethods(5, BEARISH) => multi_bar::falling_three_methods,
}

impl fmt::Display for CandlestickKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candlestick formation completed at `index`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandlestickMatch {
    pub index: usize,
    pub kind: CandlestickKind,
}

impl Occurrence for CandlestickMatch {
    type Kind = CandlestickKind;

    fn index(&self) -> usize {
        self.index
    }

    fn kind(&self) -> CandlestickKind {
        self.kind
    }
}

/// Detect candlestick formations.
///
/// Matches are returned in ascending index order; within one index they
/// follow [`CandlestickKind::ALL`].
pub fn detect<T: OHLCV>(bars: &[T]) -> Vec<CandlestickMatch> {
    let mut matches = Vec::new();

    for index in FIRST_INDEX..bars.len() {
        for &kind in CandlestickKind::ALL {
            if kind.matches(bars, index) {
                trace!(index, kind = kind.as_str(), "candlestick match");
                matches.push(CandlestickMatch { index, kind });
            }
        }
    }

    debug!(
        bars = bars.len(),
        matches = matches.len(),
        "candlestick scan complete"
    );
    matches
}

/// Detect candlestick formations keyed by anchor index.
///
/// Indices without any formation are absent.
pub fn detect_grouped<T: OHLCV>(bars: &[T]) -> BTreeMap<usize, Vec<CandlestickKind>> {
    let mut grouped: BTreeMap<usize, Vec<CandlestickKind>> = BTreeMap::new();
    for m in detect(bars) {
        grouped.entry(m.index).or_default().push(m.kind);
    }
    grouped
}
