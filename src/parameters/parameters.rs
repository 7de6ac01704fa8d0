//! An ordered collection of named parameters.
//!
//! Preserves insertion order, since the order doubles as the parameter
//! slice layout seen by model functions and external minimizers.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpecFitError};
use crate::parameters::parameter::Parameter;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    params: Vec<Parameter>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, rejecting duplicate names.
    pub fn add(&mut self, param: Parameter) -> Result<()> {
        if self.get(param.name()).is_some() {
            return Err(SpecFitError::InvalidInput(format!(
                "duplicate parameter name '{}'",
                param.name()
            )));
        }
        self.params.push(param);
        Ok(())
    }

    pub fn add_param(&mut self, name: &str, value: f64) -> Result<()> {
        self.add(Parameter::new(name, value))
    }

    pub fn add_param_with_bounds(
        &mut self,
        name: &str,
        value: f64,
        min: f64,
        max: f64,
    ) -> Result<()> {
        self.add(Parameter::with_bounds(name, value, min, max)?)
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.params.iter_mut().find(|p| p.name() == name)
    }

    /// Value of a named parameter, as an error when missing.
    pub fn value_of(&self, name: &str) -> Result<f64> {
        self.get(name)
            .map(Parameter::value)
            .ok_or_else(|| SpecFitError::ParameterNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.params.iter().map(Parameter::name).collect()
    }

    /// All parameter values in insertion order.
    pub fn values(&self) -> Vec<f64> {
        self.params.iter().map(Parameter::value).collect()
    }

    /// All parameter values as an array, in insertion order.
    pub fn to_array(&self) -> Array1<f64> {
        Array1::from_vec(self.values())
    }

    /// Update all values from a flat slice in insertion order, enforcing
    /// bounds.
    pub fn update_from_slice(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.params.len() {
            return Err(SpecFitError::DimensionMismatch(format!(
                "expected {} parameter values, got {}",
                self.params.len(),
                values.len()
            )));
        }
        for (p, &v) in self.params.iter_mut().zip(values) {
            p.set_value(v)?;
        }
        Ok(())
    }

    /// Number of varying (non-fixed) parameters.
    pub fn varying_count(&self) -> usize {
        self.params.iter().filter(|p| p.vary()).count()
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}
