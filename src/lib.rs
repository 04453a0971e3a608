//! # chartscan - chart pattern and support/resistance analysis
//!
//! Detects structural price patterns, candlestick formations and
//! support/resistance levels in an OHLCV series, then measures how price
//! behaved after each detected pattern.
//!
//! ## Quick Start
//!
//! ```rust
//! use chartscan::prelude::*;
//!
//! let bars: Vec<Bar> = (0..40)
//!     .map(|i| {
//!         let base = 100.0 + (i as f64 * 0.7).sin() * 5.0;
//!         Bar::new(i, base, base + 1.0, base - 1.0, base + 0.2, 1_000.0, i + 1)
//!     })
//!     .collect();
//!
//! let analyzer = AnalyzerBuilder::new()
//!     .threshold(0.03)
//!     .lookahead(5)
//!     .build()
//!     .unwrap();
//!
//! let report = analyzer.analyze(&bars).unwrap();
//! assert!(report.patterns.iter().all(|m| m.index >= 1));
//! ```
//!
//! Every component is also usable on its own: see [`indicators`],
//! [`detectors::structural`], [`detectors::candlestick`], [`levels`],
//! [`performance`] and [`statistics`].

use std::collections::BTreeMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub mod detectors;
pub mod indicators;
pub mod levels;
pub mod params;
pub mod performance;
pub mod statistics;

pub mod prelude {
    pub use crate::{
        // Analyzer
        analyze_parallel,
        // Detectors
        detectors::candlestick::{self, CandlestickKind, CandlestickMatch},
        detectors::structural::{self, PatternMatch, StructuralKind, StructuralOptions},
        // Components
        indicators,
        levels::{self, FirstTest, Level, LevelKind, LevelOptions, LevelReaction},
        // Parameters
        params::{ParamMeta, ParamType, Parameterized},
        performance::{self, PerformanceOptions, PerformanceRecord},
        statistics::{self, Summary, TypeStatistics},
        AnalysisReport,
        Analyzer,
        AnalyzerBuilder,
        AnalyzerConfig,
        // Types
        Bar,
        Direction,
        // Core traits
        OHLCVExt,
        Occurrence,
        // Errors
        PatternError,
        Period,
        Ratio,
        Result,
        ScanError,
        ScanResult,
        OHLCV,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, PatternError>;

/// Errors raised at the public entry points for malformed input or configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Length mismatch for {field}: expected {expected}, got {got}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Invalid OHLCV at index {index}: {reason}")]
    InvalidOHLCV { index: usize, reason: &'static str },
}

/// Check that `value` is finite and inside `[min, max]`.
pub(crate) fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(PatternError::InvalidConfig(format!(
            "{field} must be finite, got {value}"
        )));
    }
    if value < min || value > max {
        return Err(PatternError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Normalized value in range 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Ratio(f64);

impl Ratio {
    /// Create a new Ratio, validating the value is in [0.0, 1.0]
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(PatternError::InvalidValue(
                "Ratio cannot be NaN or infinite",
            ));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(PatternError::OutOfRange {
                field: "Ratio",
                value,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self(value))
    }

    /// Create a Ratio from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Serialize for Ratio {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Ratio::new(value).map_err(serde::de::Error::custom)
    }
}

/// Period (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(PatternError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLCV TRAITS
// ============================================================

/// Core OHLCV data trait
pub trait OHLCV {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;

    fn timestamp(&self) -> Option<i64> {
        None
    }
}

/// Extension trait with computed properties for OHLCV data
pub trait OHLCVExt: OHLCV {
    #[inline]
    fn body(&self) -> f64 {
        (self.close() - self.open()).abs()
    }

    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    #[inline]
    fn upper_shadow(&self) -> f64 {
        self.high() - self.open().max(self.close())
    }

    #[inline]
    fn lower_shadow(&self) -> f64 {
        self.open().min(self.close()) - self.low()
    }

    /// Midpoint of the real body
    #[inline]
    fn body_midpoint(&self) -> f64 {
        (self.open() + self.close()) / 2.0
    }

    #[inline]
    fn is_bullish(&self) -> bool {
        self.close() > self.open()
    }

    #[inline]
    fn is_bearish(&self) -> bool {
        self.close() < self.open()
    }

    /// Validate OHLCV data consistency
    fn validate(&self) -> Result<()> {
        let values = [
            self.open(),
            self.high(),
            self.low(),
            self.close(),
            self.volume(),
        ];
        if values.iter().any(|v| v.is_nan()) {
            return Err(PatternError::InvalidOHLCV {
                index: 0,
                reason: "NaN in OHLCV",
            });
        }
        if values.iter().any(|v| v.is_infinite()) {
            return Err(PatternError::InvalidOHLCV {
                index: 0,
                reason: "Infinite value in OHLCV",
            });
        }
        if self.high() < self.low() {
            return Err(PatternError::InvalidOHLCV {
                index: 0,
                reason: "high < low",
            });
        }
        Ok(())
    }
}

impl<T: OHLCV> OHLCVExt for T {}

/// One OHLCV observation for a fixed interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: i64,
}

impl Bar {
    pub fn new(
        open_time: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        close_time: i64,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
            close_time,
        }
    }
}

impl OHLCV for Bar {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn timestamp(&self) -> Option<i64> {
        Some(self.open_time)
    }
}

/// Close prices of a bar series, index-aligned with the bars.
pub fn closes<T: OHLCV>(bars: &[T]) -> Vec<f64> {
    bars.iter().map(|b| b.close()).collect()
}

/// Volumes of a bar series, index-aligned with the bars.
pub fn volumes<T: OHLCV>(bars: &[T]) -> Vec<f64> {
    bars.iter().map(|b| b.volume()).collect()
}

// ============================================================
// PATTERN OCCURRENCES
// ============================================================

/// Direction/bias of a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Bullish,
    Neutral,
    Bearish,
}

impl Direction {
    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, Direction::Bullish)
    }

    #[inline]
    pub fn is_bearish(self) -> bool {
        matches!(self, Direction::Bearish)
    }
}

/// A detected pattern anchored at one bar index.
///
/// Implemented by both structural and candlestick matches so that grouping,
/// statistics and performance evaluation work over either.
pub trait Occurrence {
    type Kind: Copy + Ord + Hash;

    fn index(&self) -> usize;
    fn kind(&self) -> Self::Kind;
}

// ============================================================
// ANALYZER
// ============================================================

use detectors::{
    candlestick::{self, CandlestickKind, CandlestickMatch},
    structural::{self, PatternMatch, StructuralKind, StructuralOptions},
};
use levels::{FirstTest, Level, LevelOptions, LevelReaction};
use performance::{PerformanceOptions, PerformanceRecord};
use statistics::{Summary, TypeStatistics};

/// Analyzer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub structural: StructuralOptions,
    pub levels: LevelOptions,
    pub performance: PerformanceOptions,
    /// Reject series containing non-finite values, inverted bars or
    /// non-ascending timestamps before any detector runs.
    pub validate_data: bool,
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<()> {
        self.structural.validate()?;
        self.levels.validate()?;
        self.performance.validate()
    }
}

/// Everything the analyzer derives from one bar series
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub patterns: Vec<PatternMatch>,
    pub candlesticks: Vec<CandlestickMatch>,
    pub levels: Vec<Level>,
    pub level_reactions: Vec<LevelReaction>,
    pub first_tests: Vec<FirstTest>,
    pub pattern_performance: BTreeMap<StructuralKind, PerformanceRecord>,
    pub candlestick_performance: BTreeMap<CandlestickKind, PerformanceRecord>,
    pub pattern_groups: BTreeMap<StructuralKind, Vec<usize>>,
    pub pattern_statistics: BTreeMap<StructuralKind, TypeStatistics>,
    pub length_statistics: Summary,
}

/// Runs every component over one series with a single validated configuration
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one bar series.
    pub fn analyze<T: OHLCV>(&self, bars: &[T]) -> Result<AnalysisReport> {
        if self.config.validate_data {
            validate_bars(bars).inspect_err(|err| warn!(%err, "rejecting bar series"))?;
        }

        let prices = closes(bars);
        let patterns = structural::detect(&prices, &volumes(bars), &self.config.structural)?;
        let candlesticks = candlestick::detect(bars);
        let levels = levels::find_levels(bars, &self.config.levels)?;

        let threshold = self.config.levels.reaction_threshold;
        let lookahead = self.config.performance.lookahead;
        let report = AnalysisReport {
            level_reactions: levels::analyze_reactions(bars, &levels, threshold),
            first_tests: levels::first_tests(bars, &levels, threshold),
            pattern_performance: performance::evaluate(&prices, &patterns, lookahead),
            candlestick_performance: performance::evaluate(&prices, &candlesticks, lookahead),
            pattern_groups: statistics::group_by_type(&patterns),
            pattern_statistics: statistics::price_statistics(&patterns, &prices),
            length_statistics: statistics::length_statistics(&patterns),
            patterns,
            candlesticks,
            levels,
        };

        debug!(
            bars = bars.len(),
            patterns = report.patterns.len(),
            candlesticks = report.candlesticks.len(),
            levels = report.levels.len(),
            "analysis complete"
        );
        Ok(report)
    }
}

/// Validate every bar and the ordering of timestamps, reporting the first offending index.
pub fn validate_bars<T: OHLCV>(bars: &[T]) -> Result<()> {
    let mut previous: Option<i64> = None;
    for (i, bar) in bars.iter().enumerate() {
        bar.validate().map_err(|e| match e {
            PatternError::InvalidOHLCV { reason, .. } => {
                PatternError::InvalidOHLCV { index: i, reason }
            }
            other => other,
        })?;
        if let Some(ts) = bar.timestamp() {
            if previous.is_some_and(|prev| ts <= prev) {
                return Err(PatternError::InvalidOHLCV {
                    index: i,
                    reason: "timestamps not strictly ascending",
                });
            }
            previous = Some(ts);
        }
    }
    Ok(())
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating Analyzer instances
#[derive(Debug, Clone, Default)]
pub struct AnalyzerBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a complete configuration (e.g. one deserialized from a file)
    pub fn config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    /// Relative price tolerance for structural patterns
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.structural.threshold = threshold;
        self
    }

    /// Relative volume change required for a flag pole
    pub fn volume_threshold(mut self, threshold: f64) -> Self {
        self.config.structural.volume_threshold = threshold;
        self
    }

    pub fn rsi_period(mut self, period: usize) -> Self {
        self.config.structural.rsi_period = Period::new_const(period);
        self
    }

    pub fn rsi_threshold(mut self, threshold: f64) -> Self {
        self.config.structural.rsi_threshold = threshold;
        self
    }

    /// Bars on each side a pivot must dominate
    pub fn window_size(mut self, window: usize) -> Self {
        self.config.levels.window_size = Period::new_const(window);
        self
    }

    pub fn reaction_threshold(mut self, threshold: f64) -> Self {
        self.config.levels.reaction_threshold = threshold;
        self
    }

    /// Relative tolerance for merging pivots into one level
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.config.levels.tolerance = Ratio::new_const(tolerance);
        self
    }

    pub fn lookahead(mut self, lookahead: usize) -> Self {
        self.config.performance.lookahead = Period::new_const(lookahead);
        self
    }

    /// Enable/disable data validation
    pub fn validate_data(mut self, enable: bool) -> Self {
        self.config.validate_data = enable;
        self
    }

    /// Build the analyzer
    pub fn build(self) -> Result<Analyzer> {
        Analyzer::new(self.config)
    }
}

// ============================================================
// BATCH ANALYSIS
// ============================================================

use rayon::prelude::*;

/// Result of analyzing a single instrument
#[derive(Debug)]
pub struct ScanResult {
    pub symbol: String,
    pub report: AnalysisReport,
}

/// Error from analyzing a single instrument
#[derive(Debug)]
pub struct ScanError {
    pub symbol: String,
    pub error: PatternError,
}

/// Analyze several independent series in parallel.
///
/// Each series is analyzed on its own; nothing is aggregated across them.
pub fn analyze_parallel<'a, T, I>(
    analyzer: &Analyzer,
    instruments: I,
) -> (Vec<ScanResult>, Vec<ScanError>)
where
    T: OHLCV + Sync + 'a,
    I: IntoParallelIterator<Item = (&'a str, &'a [T])>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, bars)| {
            analyzer
                .analyze(bars)
                .map(|report| ScanResult {
                    symbol: symbol.to_string(),
                    report,
                })
                .map_err(|error| ScanError {
                    symbol: symbol.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(i: i64, o: f64, h: f64, l: f64, c: f64) -> Bar {
        Bar::new(i * 60, o, h, l, c, 1000.0, i * 60 + 59)
    }

    fn make_wave_bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.5).sin() * 8.0;
                bar(i as i64, base, base + 1.5, base - 1.5, base + 0.4)
            })
            .collect()
    }

    fn make_uptrend_bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let base = 100.0 + i as f64 * 2.0;
                bar(i as i64, base, base + 1.0, base - 1.0, base + 0.5)
            })
            .collect()
    }

    #[test]
    fn test_ratio_validation() {
        assert!(Ratio::new(0.0).is_ok());
        assert!(Ratio::new(1.0).is_ok());
        assert!(Ratio::new(0.5).is_ok());
        assert!(Ratio::new(-0.1).is_err());
        assert!(Ratio::new(1.1).is_err());
        assert!(Ratio::new(f64::NAN).is_err());
        assert!(Ratio::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_period_validation() {
        assert!(Period::new(1).is_ok());
        assert!(Period::new(100).is_ok());
        assert!(Period::new(0).is_err());
    }

    #[test]
    fn test_ohlcv_ext() {
        let b = bar(0, 100.0, 110.0, 90.0, 105.0);
        assert_eq!(b.body(), 5.0);
        assert_eq!(b.range(), 20.0);
        assert_eq!(b.upper_shadow(), 5.0);
        assert_eq!(b.lower_shadow(), 10.0);
        assert_eq!(b.body_midpoint(), 102.5);
        assert!(b.is_bullish());
        assert!(!b.is_bearish());
    }

    #[test]
    fn test_bar_validation() {
        assert!(bar(0, 100.0, 110.0, 90.0, 105.0).validate().is_ok());
        assert!(bar(0, 100.0, 90.0, 110.0, 105.0).validate().is_err());
        assert!(bar(0, f64::NAN, 110.0, 90.0, 105.0).validate().is_err());
        assert!(bar(0, 100.0, f64::INFINITY, 90.0, 105.0).validate().is_err());
    }

    #[test]
    fn test_validate_bars_reports_index() {
        let mut bars = make_uptrend_bars(5);
        bars[3].close = f64::NAN;
        assert_eq!(
            validate_bars(&bars),
            Err(PatternError::InvalidOHLCV {
                index: 3,
                reason: "NaN in OHLCV"
            })
        );
    }

    #[test]
    fn test_validate_bars_rejects_duplicate_timestamps() {
        let mut bars = make_uptrend_bars(5);
        bars[2].open_time = bars[1].open_time;
        assert!(matches!(
            validate_bars(&bars),
            Err(PatternError::InvalidOHLCV { index: 2, .. })
        ));
    }

    #[test]
    fn test_analyzer_builder_defaults() {
        let analyzer = AnalyzerBuilder::new().build().unwrap();
        assert_eq!(analyzer.config(), &AnalyzerConfig::default());
        assert_eq!(analyzer.config().structural.threshold, 0.03);
        assert_eq!(analyzer.config().levels.window_size.get(), 5);
        assert_eq!(analyzer.config().performance.lookahead.get(), 5);
    }

    #[test]
    fn test_analyzer_builder_rejects_bad_config() {
        assert!(AnalyzerBuilder::new().threshold(-0.1).build().is_err());
        assert!(AnalyzerBuilder::new().rsi_period(0).build().is_err());
        assert!(AnalyzerBuilder::new().rsi_threshold(60.0).build().is_err());
        assert!(AnalyzerBuilder::new().tolerance(1.5).build().is_err());
        assert!(AnalyzerBuilder::new().lookahead(0).build().is_err());
        assert!(AnalyzerBuilder::new().window_size(0).build().is_err());
    }

    #[test]
    fn test_empty_analysis() {
        let analyzer = AnalyzerBuilder::new().build().unwrap();
        let bars: Vec<Bar> = vec![];
        let report = analyzer.analyze(&bars).unwrap();
        assert!(report.patterns.is_empty());
        assert!(report.candlesticks.is_empty());
        assert!(report.levels.is_empty());
        assert!(report.pattern_performance.is_empty());
        assert_eq!(report.length_statistics, Summary::default());
    }

    #[test]
    fn test_analysis_is_consistent_with_components() {
        let analyzer = AnalyzerBuilder::new().build().unwrap();
        let bars = make_wave_bars(80);
        let report = analyzer.analyze(&bars).unwrap();

        let prices = closes(&bars);
        let direct = structural::detect(&prices, &volumes(&bars), &StructuralOptions::default())
            .unwrap();
        assert_eq!(report.patterns, direct);
        assert_eq!(report.candlesticks, candlestick::detect(&bars));

        let grouped: usize = report.pattern_groups.values().map(Vec::len).sum();
        assert_eq!(grouped, report.patterns.len());
    }

    #[test]
    fn test_validate_data_flag() {
        let mut bars = make_uptrend_bars(10);
        bars[4].high = f64::NAN;

        let lenient = AnalyzerBuilder::new().build().unwrap();
        assert!(lenient.analyze(&bars).is_ok());

        let strict = AnalyzerBuilder::new().validate_data(true).build().unwrap();
        assert!(matches!(
            strict.analyze(&bars),
            Err(PatternError::InvalidOHLCV { index: 4, .. })
        ));
    }

    #[test]
    fn test_parallel_analysis() {
        let analyzer = AnalyzerBuilder::new().validate_data(true).build().unwrap();

        let bars1 = make_wave_bars(60);
        let bars2 = make_uptrend_bars(60);
        let mut bars3 = make_uptrend_bars(10);
        bars3[0].low = 1_000.0;

        let instruments: Vec<(&str, &[Bar])> =
            vec![
            ("AAPL", bars1.as_slice()),
            ("GOOGL", bars2.as_slice()),
            ("BROKEN", bars3.as_slice()),
        ];

        let (results, errors) = analyze_parallel(&analyzer, instruments);
        assert_eq!(results.len(), 2);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].symbol, "BROKEN");
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: AnalyzerConfig =
            serde_json::from_str(r#"{"structural": {"threshold": 0.05}, "validate_data": true}"#)
                .unwrap();
        assert_eq!(config.structural.threshold, 0.05);
        assert_eq!(config.structural.rsi_period.get(), 14);
        assert!(config.validate_data);
        assert_eq!(config.levels, LevelOptions::default());
    }

    #[test]
    fn test_config_rejects_zero_period() {
        let parsed: std::result::Result<AnalyzerConfig, _> =
            serde_json::from_str(r#"{"performance": {"lookahead": 0}}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_report_serializes() {
        let analyzer = AnalyzerBuilder::new().build().unwrap();
        let report = analyzer.analyze(&make_wave_bars(60)).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("patterns").is_some());
        assert!(json.get("levels").is_some());
        assert!(json["length_statistics"].get("mean").is_some());
    }

    #[test]
    fn test_bar_serde_uses_camel_case() {
        let b = bar(1, 1.0, 2.0, 0.5, 1.5);
        let json = serde_json::to_value(b).unwrap();
        assert_eq!(json["openTime"], 60);
        assert_eq!(json["closeTime"], 119);
    }
}
