//! Synthetic LLC datasets with known values.
//!
//! Every field is labeled so a value in an assembled mosaic tells where it
//! came from:
//!
//! | Variable | Dims | Value |
//! |----------|------|-------|
//! | `XC` | face, Y, X | `1e8 * face + n * y + x` |
//! | `XG` | face, Yp1, Xp1 | `XC + 0.5` |
//! | `U` | face, Y, Xp1 | `face` |
//! | `V` | face, Yp1, X | `-face` |
//! | `dxC` | face, Y, Xp1 | `10 + face` |
//! | `dyC` | face, Yp1, X | `20 + face` |
//! | `Theta` | Z, face, Y, X | `100 * z + face` |
//! | `Z` | Z | depth of each level |
//! | `face_size` | face | `n` |

use std::collections::BTreeMap;

use ndarray::{ArrayD, IxDyn};

use crate::data::{Dataset, Variable};
use crate::topology::N_FACES;

/// Number of vertical levels in the synthetic dataset.
pub const N_LEVELS: usize = 3;

/// Label of cell `(x, y)` on face `k` of an `n`-sized grid.
pub fn cell_label(k: usize, y: usize, x: usize, n: usize) -> f64 {
    1e8 * k as f64 + (n * y + x) as f64
}

fn per_face(dims: &[&str], n: usize, value: impl Fn(usize, usize, usize) -> f64) -> Variable {
    let data = ArrayD::from_shape_fn(IxDyn(&[N_FACES, n, n]), |idx| value(idx[0], idx[1], idx[2]));
    Variable {
        dims: dims.iter().map(|d| d.to_string()).collect(),
        data,
        attributes: BTreeMap::new(),
    }
}

/// Build a 13-face dataset with `n x n` faces.
pub fn llc_dataset(n: usize) -> Dataset {
    let mut ds = Dataset::new();

    ds.insert(
        "XC",
        per_face(&["face", "Y", "X"], n, |k, y, x| cell_label(k, y, x, n))
            .with_attr("long_name", "cell center label"),
    );
    ds.insert(
        "XG",
        per_face(&["face", "Yp1", "Xp1"], n, |k, y, x| cell_label(k, y, x, n) + 0.5)
            .with_attr("long_name", "cell corner label"),
    );
    ds.insert(
        "U",
        per_face(&["face", "Y", "Xp1"], n, |k, _, _| k as f64).with_attr("units", "m s-1"),
    );
    ds.insert(
        "V",
        per_face(&["face", "Yp1", "X"], n, |k, _, _| -(k as f64)).with_attr("units", "m s-1"),
    );
    ds.insert(
        "dxC",
        per_face(&["face", "Y", "Xp1"], n, |k, _, _| 10.0 + k as f64).with_attr("units", "m"),
    );
    ds.insert(
        "dyC",
        per_face(&["face", "Yp1", "X"], n, |k, _, _| 20.0 + k as f64).with_attr("units", "m"),
    );

    let theta = ArrayD::from_shape_fn(IxDyn(&[N_LEVELS, N_FACES, n, n]), |idx| {
        (100 * idx[0] + idx[1]) as f64
    });
    ds.insert(
        "Theta",
        Variable {
            dims: ["Z", "face", "Y", "X"].iter().map(|d| d.to_string()).collect(),
            data: theta,
            attributes: BTreeMap::new(),
        },
    );

    let depths = ArrayD::from_shape_fn(IxDyn(&[N_LEVELS]), |idx| -5.0 - 10.0 * idx[0] as f64);
    ds.insert(
        "Z",
        Variable {
            dims: vec!["Z".to_string()],
            data: depths,
            attributes: BTreeMap::new(),
        }
        .with_attr("units", "m"),
    );

    ds.insert(
        "face_size",
        Variable {
            dims: vec!["face".to_string()],
            data: ArrayD::from_elem(IxDyn(&[N_FACES]), n as f64),
            attributes: BTreeMap::new(),
        },
    );

    ds.set_coord("face", (0..N_FACES as i64).collect());
    ds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_shapes() {
        let ds = llc_dataset(4);
        assert_eq!(ds.variable("XC").unwrap().shape(), &[13, 4, 4]);
        assert_eq!(ds.variable("Theta").unwrap().shape(), &[3, 13, 4, 4]);
        assert_eq!(ds.dim_len("face"), Some(13));
        assert_eq!(ds.variable("V").unwrap().get_value(&[7, 0, 0]), Some(-7.0));
        assert_eq!(
            ds.variable("XC").unwrap().get_value(&[2, 1, 3]),
            Some(cell_label(2, 1, 3, 4))
        );
        assert_eq!(
            ds.variable("U").unwrap().attributes.get("units").map(String::as_str),
            Some("m s-1")
        );
    }
}
