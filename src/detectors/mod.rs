//! Pattern detectors
//!
//! # Detector Families
//!
//! - **Structural**: double tops/bottoms, triangles, flag, rectangle,
//!   head-and-shoulders over a close-price series
//! - **Candlestick**: single, two, three and five-bar OHLC formations
//!
//! Candlestick predicates are grouped by how many bars they inspect. Each
//! predicate receives exactly the window of bars it needs, ending at the
//! anchor index.

pub mod helpers;

pub mod candlestick;
pub mod multi_bar;
pub mod single_bar;
pub mod structural;
pub mod three_bar;
pub mod two_bar;

// Re-export the public surface for convenience
pub use candlestick::{CandlestickKind, CandlestickMatch};
pub use helpers::*;
pub use structural::{PatternMatch, StructuralKind, StructuralOptions};
