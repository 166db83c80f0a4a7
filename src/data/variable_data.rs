//! Variable data and its statistics.

use std::collections::BTreeMap;

use ndarray::{ArrayD, Axis, IxDyn};

use crate::error::{MosaicError, Result};

/// A labeled multi-dimensional array.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Dimension names, in storage order.
    pub dims: Vec<String>,
    /// The data; missing values are NaN.
    pub data: ArrayD<f64>,
    /// Variable attributes.
    pub attributes: BTreeMap<String, String>,
}

impl Variable {
    /// Create a variable, checking that every axis has a name.
    pub fn new<S: Into<String>>(dims: Vec<S>, data: ArrayD<f64>) -> Result<Self> {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if dims.len() != data.ndim() {
            return Err(MosaicError::ShapeMismatch {
                variable: dims.join(","),
                block: data.shape().to_vec(),
                destination: vec![dims.len()],
            });
        }
        Ok(Self {
            dims,
            data,
            attributes: BTreeMap::new(),
        })
    }

    /// Create a variable filled with NaN.
    pub fn missing<S: Into<String>>(dims: Vec<S>, shape: &[usize]) -> Result<Self> {
        Self::new(dims, ArrayD::from_elem(IxDyn(shape), f64::NAN))
    }

    /// Add an attribute, builder style.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get the number of dimensions.
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Get the shape of the data.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Position of a dimension in storage order.
    pub fn axis_of(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    /// Check whether the variable spans a dimension.
    pub fn has_dim(&self, dim: &str) -> bool {
        self.axis_of(dim).is_some()
    }

    /// Length along a named dimension.
    pub fn dim_len(&self, dim: &str) -> Option<usize> {
        self.axis_of(dim).map(|ax| self.data.len_of(Axis(ax)))
    }

    /// Count of valid (non-NaN) values.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }

    /// Count of missing (NaN) values.
    pub fn missing_count(&self) -> usize {
        self.data.len() - self.valid_count()
    }

    /// Minimum and maximum over finite values.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut count = 0usize;
        for &v in self.data.iter() {
            if v.is_finite() {
                if v < min {
                    min = v;
                }
                if v > max {
                    max = v;
                }
                count += 1;
            }
        }
        if count > 0 {
            Some((min, max))
        } else {
            None
        }
    }

    /// Get value at given multi-dimensional indices.
    pub fn get_value(&self, indices: &[usize]) -> Option<f64> {
        self.data.get(IxDyn(indices)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::ArrayD;

    #[test]
    fn test_dims_must_match_ndim() {
        let data = ArrayD::zeros(IxDyn(&[2, 3]));
        assert!(Variable::new(vec!["Y"], data.clone()).is_err());
        assert!(Variable::new(vec!["Y", "X"], data).is_ok());
    }

    #[test]
    fn test_statistics_skip_missing() {
        let mut var = Variable::missing(vec!["Y", "X"], &[2, 2]).unwrap();
        var.data[IxDyn(&[0, 0])] = -1.0;
        var.data[IxDyn(&[1, 1])] = 4.0;
        assert_eq!(var.valid_count(), 2);
        assert_eq!(var.missing_count(), 2);
        assert_eq!(var.min_max(), Some((-1.0, 4.0)));
        assert_eq!(var.dim_len("X"), Some(2));
        assert_eq!(var.axis_of("Y"), Some(0));
    }
}
