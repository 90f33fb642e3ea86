//! Reporter Values
//!
//! The scalar produced by a single reporter for one row.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single reported value.
///
/// Serializes untagged, so `3` and `0.25` appear as plain JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReporterValue {
    Int(i64),
    Float(f64),
}

impl ReporterValue {
    /// Returns the value widened to `f64`.
    pub fn as_f64(&self) -> f64 {
        match *self {
            ReporterValue::Int(v) => v as f64,
            ReporterValue::Float(v) => v,
        }
    }

    /// Returns the integer value, or `None` for floats.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            ReporterValue::Int(v) => Some(v),
            ReporterValue::Float(_) => None,
        }
    }
}

impl From<i64> for ReporterValue {
    fn from(value: i64) -> Self {
        ReporterValue::Int(value)
    }
}

impl From<u64> for ReporterValue {
    fn from(value: u64) -> Self {
        ReporterValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<usize> for ReporterValue {
    fn from(value: usize) -> Self {
        ReporterValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for ReporterValue {
    fn from(value: f64) -> Self {
        ReporterValue::Float(value)
    }
}

impl fmt::Display for ReporterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReporterValue::Int(v) => write!(f, "{}", v),
            ReporterValue::Float(v) => write!(f, "{}", v),
        }
    }
}
