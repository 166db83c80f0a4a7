//! Error types for llc-mosaic.
//!
//! This module provides a unified error handling approach using `thiserror`.

use thiserror::Error;

/// Result type alias for mosaic operations.
pub type Result<T> = std::result::Result<T, MosaicError>;

/// Errors that can occur while rearranging LLC faces.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// Centering outside the set an entry point accepts.
    #[error("Centering '{value}' not supported. Options are: {options}")]
    UnsupportedCentering { value: String, options: String },

    /// No variables were requested.
    #[error("Empty list of variables")]
    EmptyVariableList,

    /// Face index outside 0..=12.
    #[error("Face index {0} not in LLC grid")]
    InvalidFaceIndex(usize),

    /// Requested faces leave a hole inside a facet.
    #[error("Faces {faces:?} do not connect. Not possible to create a single mosaic without gaps")]
    DisconnectedFaces { faces: Vec<usize> },

    /// Facets A and B of one rotation group do not line up.
    #[error("Facets do not connect equally ({facet_a:?} vs {facet_b:?}): ragged arrays are not supported")]
    RaggedFacets {
        facet_a: Vec<usize>,
        facet_b: Vec<usize>,
    },

    /// An axis role has no corresponding dimension.
    #[error("No {role} axis in dimensions {dims:?}")]
    MissingAxis { role: char, dims: Vec<String> },

    /// A variable was requested that the dataset does not hold.
    #[error("Variable not found: {name}")]
    VariableNotFound { name: String },

    /// A dimension required for sizing is absent.
    #[error("Dimension not found: {name}")]
    MissingDimension { name: String },

    /// A face block does not fit its destination.
    #[error("Shape mismatch for '{variable}': block {block:?} does not fit destination {destination:?}")]
    ShapeMismatch {
        variable: String,
        block: Vec<usize>,
        destination: Vec<usize>,
    },

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MosaicError {
    /// Create an UnsupportedCentering error.
    pub fn unsupported_centering(value: impl Into<String>, options: &[&str]) -> Self {
        Self::UnsupportedCentering {
            value: value.into(),
            options: options.join(", "),
        }
    }

    /// Create a VariableNotFound error.
    pub fn variable_not_found(name: impl Into<String>) -> Self {
        Self::VariableNotFound { name: name.into() }
    }

    /// Create a MissingDimension error.
    pub fn missing_dimension(name: impl Into<String>) -> Self {
        Self::MissingDimension { name: name.into() }
    }
}
