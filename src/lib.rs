//! llc-mosaic - Stitches the faces of an LLC ocean-model grid into one mosaic.
//!
//! LLC output is stored as 13 faces: six faces sharing one orientation, the
//! polar cap, and six faces whose axes are transposed. This crate
//! reassembles any connected subset of faces into a single 2-D array with
//! one consistent orientation, turning, mirroring and sign-flipping vector
//! components as their axes change meaning.
//!
//! # Features
//!
//! - Arctic crown mosaic of any connected face subset, cap wedges included
//! - Arctic-centered 3x3 mosaic around the pole
//! - Vector mate pairing with a single orientation and sign rule
//! - Shift, reverse, rotate, roll and merge primitives on labeled datasets
//!
//! # Example
//!
//! ```
//! use llc_mosaic::assemble::{Centering, FaceSelection, LlcTransformation, VariableSelection};
//! use llc_mosaic::config::RearrangeConfig;
//! use llc_mosaic::synthetic::llc_dataset;
//!
//! let ds = llc_dataset(4);
//! let transform = LlcTransformation::new(RearrangeConfig::default())?;
//! let mosaic = transform.arctic_crown(
//!     &ds,
//!     &VariableSelection::All,
//!     Centering::Atlantic,
//!     &FaceSelection::All,
//!     true,
//! )?;
//! assert_eq!(mosaic.variable("XC")?.shape(), &[14, 16]);
//! # Ok::<(), llc_mosaic::MosaicError>(())
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod arctic;
pub mod assemble;
pub mod config;
pub mod data;
pub mod dims;
pub mod error;
pub mod layout;
pub mod mates;
pub mod remap;
pub mod synthetic;
pub mod topology;
pub mod util;

pub use error::{MosaicError, Result};
