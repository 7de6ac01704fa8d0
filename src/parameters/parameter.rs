//! Parameter definition and implementation
//!
//! A parameter carries a name, a value, optional min/max bounds, and a
//! varying flag; after a fit it additionally carries a standard error.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpecFitError};

/// A named fit parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Name of the parameter
    name: String,

    /// Current value of the parameter
    value: f64,

    /// Initial value when created (for reset operations)
    init_value: f64,

    /// Lower bound (negative infinity when unbounded)
    min: f64,

    /// Upper bound (positive infinity when unbounded)
    max: f64,

    /// Whether this parameter can be varied during optimization
    vary: bool,

    /// Standard error of the parameter (set after fitting)
    stderr: Option<f64>,
}

impl Parameter {
    /// Create a new unbounded, varying parameter.
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            init_value: value,
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            vary: true,
            stderr: None,
        }
    }

    /// Create a new parameter with bounds; the value is clamped into the
    /// bounds.
    pub fn with_bounds(name: &str, value: f64, min: f64, max: f64) -> Result<Self> {
        if !(min <= max) {
            return Err(SpecFitError::BoundsError(format!(
                "invalid bounds [{}, {}] for parameter '{}'",
                min, max, name
            )));
        }
        let value = value.clamp(min, max);
        Ok(Self {
            name: name.to_string(),
            value,
            init_value: value,
            min,
            max,
            vary: true,
            stderr: None,
        })
    }

    /// Create a fixed (non-varying) parameter.
    pub fn fixed(name: &str, value: f64) -> Self {
        let mut p = Self::new(name, value);
        p.vary = false;
        p
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set the value, rejecting values outside the bounds.
    pub fn set_value(&mut self, value: f64) -> Result<()> {
        if value < self.min || value > self.max {
            return Err(SpecFitError::BoundsError(format!(
                "value {} outside bounds [{}, {}] for parameter '{}'",
                value, self.min, self.max, self.name
            )));
        }
        self.value = value;
        Ok(())
    }

    pub fn init_value(&self) -> f64 {
        self.init_value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn vary(&self) -> bool {
        self.vary
    }

    pub fn set_vary(&mut self, vary: bool) {
        self.vary = vary;
    }

    pub fn stderr(&self) -> Option<f64> {
        self.stderr
    }

    pub fn set_stderr(&mut self, stderr: Option<f64>) {
        self.stderr = stderr;
    }

    /// Reset the value to what it was at construction.
    pub fn reset(&mut self) {
        self.value = self.init_value;
        self.stderr = None;
    }
}
