//! A single bounded design parameter

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw parameter data, normalized on deserialization
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ParameterData {
    min: f64,
    max: f64,
    value: f64,
}

/// A numeric quantity with an inclusive range and a current value
///
/// `min <= value <= max` holds at all times. Writes never fail: bounds given
/// in the wrong order are swapped, and values outside the range are clamped
/// to the nearest bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ParameterData", into = "ParameterData")]
pub struct Parameter {
    min: f64,
    max: f64,
    value: f64,
}

impl From<ParameterData> for Parameter {
    fn from(data: ParameterData) -> Self {
        Self::new(data.min, data.max, data.value)
    }
}

impl From<Parameter> for ParameterData {
    fn from(parameter: Parameter) -> Self {
        Self {
            min: parameter.min,
            max: parameter.max,
            value: parameter.value,
        }
    }
}

impl Parameter {
    /// Create a new parameter, swapping `min` and `max` if they are reversed
    /// and clamping `value` into the range
    pub fn new(min: f64, max: f64, value: f64) -> Self {
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        let mut parameter = Self {
            min,
            max,
            value: min,
        };
        parameter.set_value(value);
        parameter
    }

    /// Lower bound (fixed after construction)
    pub fn min_value(&self) -> f64 {
        self.min
    }

    /// Upper bound
    pub fn max_value(&self) -> f64 {
        self.max
    }

    /// Set the upper bound; anything below the lower bound becomes the lower bound.
    /// The current value is left untouched.
    pub fn set_max_value(&mut self, max: f64) {
        self.max = max.max(self.min);
    }

    /// Current value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set the current value, clamped into `[min, max]`
    pub fn set_value(&mut self, value: f64) {
        self.value = self.min.max(value.min(self.max));
    }

    /// Whether `value` lies within the inclusive range
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Pull the current value back into range after a bound change.
    /// Returns true if the value moved.
    pub fn reclamp(&mut self) -> bool {
        let before = self.value;
        self.set_value(before);
        self.value != before
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (min: {} | max: {})", self.value, self.min, self.max)
    }
}
