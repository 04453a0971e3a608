//! Forward performance of detected patterns
//!
//! For every occurrence with `index + lookahead` inside the series, the
//! relative change from the anchor close to the close `lookahead` bars later
//! is classified as positive, negative, or neither (exactly zero or
//! undefined). Occurrences too close to the end are dropped without error.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    params::{get_period, ParamMeta, Parameterized},
    Occurrence, PatternError, Period, Result,
};

pub const DEFAULT_LOOKAHEAD: Period = Period::new_const(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceOptions {
    /// Bars between the anchor and the close it is compared with
    pub lookahead: Period,
}

impl Default for PerformanceOptions {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }
}

impl PerformanceOptions {
    pub fn validate(&self) -> Result<()> {
        if self.lookahead.get() == 0 {
            return Err(PatternError::InvalidValue("lookahead must be > 0"));
        }
        Ok(())
    }
}

const PERFORMANCE_PARAMS: &[ParamMeta] = &[ParamMeta::period(
    "lookahead",
    5.0,
    (1.0, 20.0, 1.0),
    "Bars forward used to measure the outcome",
)];

impl Parameterized for PerformanceOptions {
    fn param_meta() -> &'static [ParamMeta] {
        PERFORMANCE_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let options = Self {
            lookahead: get_period(params, "lookahead", DEFAULT_LOOKAHEAD.get())?,
        };
        options.validate()?;
        Ok(options)
    }
}

/// Outcome tally for one pattern type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    /// Occurrences with enough forward data
    pub occurrences: usize,
    pub positive: usize,
    pub negative: usize,
    pub positive_rate: f64,
    pub negative_rate: f64,
}

/// Evaluate forward price movement per pattern type.
///
/// Types without any in-range occurrence are absent from the result, so
/// every returned record has `occurrences > 0`.
pub fn evaluate<O: Occurrence>(
    prices: &[f64],
    occurrences: &[O],
    lookahead: Period,
) -> BTreeMap<O::Kind, PerformanceRecord> {
    let step = lookahead.get();
    let mut tallies: BTreeMap<O::Kind, (usize, usize, usize)> = BTreeMap::new();
    let mut dropped = 0usize;

    for occurrence in occurrences {
        let index = occurrence.index();
        let end = index.checked_add(step).and_then(|j| prices.get(j));
        let (Some(&start), Some(&end)) = (prices.get(index), end) else {
            dropped += 1;
            continue;
        };

        let change = (end - start) / start;
        let tally = tallies.entry(occurrence.kind()).or_default();
        tally.0 += 1;
        if change > 0.0 {
            tally.1 += 1;
        } else if change < 0.0 {
            tally.2 += 1;
        }
    }

    debug!(
        occurrences = occurrences.len(),
        dropped,
        types = tallies.len(),
        "performance evaluation complete"
    );

    tallies
        .into_iter()
        .map(|(kind, (occurrences, positive, negative))| {
            let n = occurrences as f64;
            let record = PerformanceRecord {
                occurrences,
                positive,
                negative,
                positive_rate: positive as f64 / n,
                negative_rate: negative as f64 / n,
            };
            (kind, record)
        })
        .collect()
}
