//! Parameter metadata for analysis options
//!
//! This module provides metadata about tunable option parameters, enabling:
//! - Parameter sweeps over thresholds and windows
//! - Parameter documentation
//! - Building options from loosely-typed key/value input
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use chartscan::params::Parameterized;
//! use chartscan::prelude::*;
//!
//! for param in StructuralOptions::param_meta() {
//!   println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//!
//! let mut params = HashMap::new();
//! params.insert("threshold", 0.05);
//! let options = StructuralOptions::with_params(&params).unwrap();
//! assert_eq!(options.threshold, 0.05);
//! ```

use std::collections::HashMap;

use crate::{PatternError, Period, Ratio, Result};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Relative value (non-negative, may exceed 1.0 for volume changes)
  Ratio,
  /// Period value (positive integer)
  Period,
  /// Absolute value in the units of the input (RSI points, price units)
  Absolute,
}

/// Metadata for a single option parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g., "threshold")
  pub name: &'static str,
  /// Parameter type
  pub param_type: ParamType,
  /// Default value
  pub default: f64,
  /// Range for sweeps: (min, max, step)
  pub range: (f64, f64, f64),
  /// Human-readable description
  pub description: &'static str,
}

impl ParamMeta {
  /// Create a new ParamMeta for a Ratio parameter
  pub const fn ratio(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Ratio, default, range, description }
  }

  /// Create a new ParamMeta for a Period parameter
  pub const fn period(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Period, default, range, description }
  }

  /// Create a new ParamMeta for an Absolute parameter
  pub const fn absolute(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Absolute, default, range, description }
  }

  /// Generate all values for a sweep
  pub fn generate_grid(&self) -> Vec<f64> {
    let (min, max, step) = self.range;
    let mut values = Vec::new();
    if step <= 0.0 {
      return values;
    }
    let mut n = 0usize;
    loop {
      // multiply instead of accumulating to keep grid points exact
      let v = min + step * n as f64;
      if v > max + step * 1e-9 {
        break;
      }
      values.push(v);
      n += 1;
    }
    values
  }

  /// Validate a value for this parameter
  pub fn validate(&self, value: f64) -> Result<()> {
    let (min, max, _) = self.range;
    if value.is_nan() {
      return Err(PatternError::InvalidValue("parameter cannot be NaN"));
    }
    if value < min || value > max {
      return Err(PatternError::OutOfRange { field: self.name, value, min, max });
    }
    match self.param_type {
      ParamType::Ratio | ParamType::Absolute => Ok(()),
      ParamType::Period => {
        if value < 1.0 || value.fract() != 0.0 {
          return Err(PatternError::InvalidValue("Period must be a positive integer"));
        }
        Ok(())
      },
    }
  }
}

// ============================================================
// PARAMETERIZED OPTIONS TRAIT
// ============================================================

/// Trait for option structs that support parameterization
///
/// Implementing this trait enables:
/// - Discovery of available parameters
/// - Creation of options with custom parameter values
/// - Parameter sweeps
pub trait Parameterized: Sized {
  /// Returns metadata for all configurable parameters
  fn param_meta() -> &'static [ParamMeta];

  /// Creates options with parameters from a HashMap
  ///
  /// Missing parameters use their default values. The result is validated.
  fn with_params(params: &HashMap<&str, f64>) -> Result<Self>;
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

/// Helper to get a raw value from params with default fallback
pub fn get_value(params: &HashMap<&str, f64>, key: &str, default: f64) -> f64 {
  params.get(key).copied().unwrap_or(default)
}

/// Helper to get a Ratio from params with default fallback
pub fn get_ratio(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Ratio> {
  Ratio::new(get_value(params, key, default))
}

/// Helper to get a Period from params with default fallback
pub fn get_period(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<Period> {
  let value = get_value(params, key, default as f64);
  if value < 1.0 || value.fract() != 0.0 || !value.is_finite() {
    return Err(PatternError::InvalidValue("Period must be a positive integer"));
  }
  Period::new(value as usize)
}

// ============================================================
// TESTS
// ============================================================
