//! Grouping and descriptive statistics over detected patterns

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{detectors::PatternMatch, Occurrence};

/// Anchor indices per pattern type, in input order within each type.
pub fn group_by_type<O: Occurrence>(occurrences: &[O]) -> BTreeMap<O::Kind, Vec<usize>> {
    let mut groups: BTreeMap<O::Kind, Vec<usize>> = BTreeMap::new();
    for o in occurrences {
        groups.entry(o.kind()).or_default().push(o.index());
    }
    groups
}

// ============================================================
// SUMMARY STATISTICS
// ============================================================

/// Mean, median and population standard deviation.
///
/// Every field is `None` when no finite value was supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub standard_deviation: Option<f64>,
}

/// Summarize the finite values of `values`; NaN and infinities are ignored.
pub fn describe(values: &[f64]) -> Summary {
    let finite = finite_values(values);
    Summary {
        mean: mean_of(&finite),
        median: median_of(finite.clone()),
        standard_deviation: std_dev_of(&finite),
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    mean_of(&finite_values(values))
}

/// Middle value, or the average of the two middle values for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    median_of(finite_values(values))
}

/// Population standard deviation (divides by N).
pub fn standard_deviation(values: &[f64]) -> Option<f64> {
    std_dev_of(&finite_values(values))
}

fn finite_values(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

fn mean_of(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

fn median_of(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

fn std_dev_of(values: &[f64]) -> Option<f64> {
    let mean = mean_of(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

// ============================================================
// PATTERN STATISTICS
// ============================================================

/// Summary of the gaps between consecutive structural matches.
pub fn length_statistics(matches: &[PatternMatch]) -> Summary {
    let lengths: Vec<f64> = matches.iter().map(|m| m.length as f64).collect();
    describe(&lengths)
}

/// Occurrence count and anchor-price summary for one pattern type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeStatistics {
    pub count: usize,
    /// Summary of the closes at each anchor index
    pub prices: Summary,
}

/// Per-type statistics of the prices at which each pattern occurred.
///
/// Occurrences whose index lies outside `prices` still count but contribute
/// no price.
pub fn price_statistics<O: Occurrence>(
    occurrences: &[O],
    prices: &[f64],
) -> BTreeMap<O::Kind, TypeStatistics> {
    group_by_type(occurrences)
        .into_iter()
        .map(|(kind, indices)| {
            let anchored: Vec<f64> = indices.iter().filter_map(|&i| prices.get(i).copied()).collect();
            let stats = TypeStatistics {
                count: indices.len(),
                prices: describe(&anchored),
            };
            (kind, stats)
        })
        .collect()
}
