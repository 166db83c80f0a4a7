//! Data representation.
//!
//! This module holds the labeled arrays that every rearrangement reads and
//! writes: variables with named dimensions and attributes, collected into a
//! dataset with integer index coordinates.

mod dataset;
mod variable_data;

pub use dataset::Dataset;
pub use variable_data::Variable;
