//! Labeled array collections.

use std::collections::{BTreeMap, BTreeSet};

use super::Variable;
use crate::error::{MosaicError, Result};

/// A mapping from variable name to labeled array, plus integer index
/// coordinates per dimension.
///
/// A dimension without an explicit coordinate is indexed `0..len`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    variables: BTreeMap<String, Variable>,
    coords: BTreeMap<String, Vec<i64>>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a variable.
    pub fn insert(&mut self, name: impl Into<String>, var: Variable) {
        self.variables.insert(name.into(), var);
    }

    /// Insert a variable, builder style.
    pub fn with_variable(mut self, name: impl Into<String>, var: Variable) -> Self {
        self.insert(name, var);
        self
    }

    /// Remove a variable.
    pub fn remove(&mut self, name: &str) -> Option<Variable> {
        self.variables.remove(name)
    }

    /// Get a variable by name.
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Get a mutable variable by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables.get_mut(name)
    }

    /// Get a variable by name or fail.
    pub fn variable(&self, name: &str) -> Result<&Variable> {
        self.get(name)
            .ok_or_else(|| MosaicError::variable_not_found(name))
    }

    /// Check whether a variable exists.
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Iterate over (name, variable) pairs in name order.
    pub fn variables(&self) -> impl Iterator<Item = (&String, &Variable)> {
        self.variables.iter()
    }

    /// Iterate mutably over (name, variable) pairs.
    pub fn variables_mut(&mut self) -> impl Iterator<Item = (&String, &mut Variable)> {
        self.variables.iter_mut()
    }

    /// Names of all variables.
    pub fn names(&self) -> Vec<String> {
        self.variables.keys().cloned().collect()
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// True when the dataset holds no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Set an explicit index coordinate for a dimension.
    pub fn set_coord(&mut self, dim: impl Into<String>, values: Vec<i64>) {
        self.coords.insert(dim.into(), values);
    }

    /// Remove an explicit coordinate.
    pub fn remove_coord(&mut self, dim: &str) -> Option<Vec<i64>> {
        self.coords.remove(dim)
    }

    /// Check whether a dimension has an explicit coordinate.
    pub fn has_coord(&self, dim: &str) -> bool {
        self.coords.contains_key(dim)
    }

    /// Index coordinate of a dimension; implicit `0..len` when not set.
    pub fn coord(&self, dim: &str) -> Vec<i64> {
        match self.coords.get(dim) {
            Some(values) => values.clone(),
            None => (0..self.dim_len(dim).unwrap_or(0) as i64).collect(),
        }
    }

    /// Iterate over explicit coordinates.
    pub fn coords(&self) -> impl Iterator<Item = (&String, &Vec<i64>)> {
        self.coords.iter()
    }

    /// Length of a dimension, from its coordinate or any variable spanning it.
    pub fn dim_len(&self, dim: &str) -> Option<usize> {
        if let Some(values) = self.coords.get(dim) {
            return Some(values.len());
        }
        self.variables.values().find_map(|v| v.dim_len(dim))
    }

    /// Length of a dimension or fail.
    pub fn require_dim_len(&self, dim: &str) -> Result<usize> {
        self.dim_len(dim)
            .ok_or_else(|| MosaicError::missing_dimension(dim))
    }

    /// All dimension names used by variables or coordinates.
    pub fn dims(&self) -> BTreeSet<String> {
        let mut dims: BTreeSet<String> = self.coords.keys().cloned().collect();
        for var in self.variables.values() {
            dims.extend(var.dims.iter().cloned());
        }
        dims
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    fn sample() -> Dataset {
        let theta = Variable::new(vec!["Y", "X"], ArrayD::zeros(IxDyn(&[2, 3]))).unwrap();
        let mut ds = Dataset::new().with_variable("Theta", theta);
        ds.set_coord("X", vec![10, 11, 12]);
        ds
    }

    #[test]
    fn test_coord_defaults_to_index() {
        let ds = sample();
        assert_eq!(ds.coord("X"), vec![10, 11, 12]);
        assert_eq!(ds.coord("Y"), vec![0, 1]);
        assert!(ds.coord("Z").is_empty());
    }

    #[test]
    fn test_dim_len_lookup() {
        let ds = sample();
        assert_eq!(ds.dim_len("Y"), Some(2));
        assert_eq!(ds.dim_len("X"), Some(3));
        assert!(matches!(
            ds.require_dim_len("Z"),
            Err(MosaicError::MissingDimension { .. })
        ));
        assert!(ds.variable("Salt").is_err());
    }
}
