//! Triangular partition of the polar cap.
//!
//! The cap touches four faces: its west, south, east and north edges meet
//! faces 2, 5, 7 and 10. Each cap cell goes to the wedge of the nearest
//! edge, ties resolved in a pinwheel so every cell of an even-sized cap
//! lands in exactly one wedge.

use std::ops::Range;

use ndarray::{Axis, Slice};
use tracing::debug;

use crate::config::RearrangeConfig;
use crate::data::Dataset;
use crate::error::Result;
use crate::mates::VectorPairing;
use crate::remap::{face_slice, horizontal_positions, turn_block, without_face, Block, QuarterTurn};
use crate::topology::CAP_FACE;

/// One triangular quarter of the cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wedge {
    /// Along the edge shared with face 2.
    West,
    /// Along the edge shared with face 5.
    South,
    /// Along the edge shared with face 7.
    East,
    /// Along the edge shared with face 10.
    North,
}

/// Wedges in placement order.
pub const WEDGES: [Wedge; 4] = [Wedge::West, Wedge::South, Wedge::East, Wedge::North];

impl Wedge {
    /// Face across the wedge's edge.
    pub fn neighbor(self) -> usize {
        match self {
            Wedge::West => 2,
            Wedge::South => 5,
            Wedge::East => 7,
            Wedge::North => 10,
        }
    }

    /// Wedge bordering a face, if the face touches the cap.
    pub fn for_neighbor(face: usize) -> Option<Self> {
        WEDGES.iter().copied().find(|w| w.neighbor() == face)
    }

    /// Orientation of the wedge when stacked on its neighbor in the crown.
    pub fn crown_turn(self) -> QuarterTurn {
        match self {
            Wedge::West => QuarterTurn::Ccw,
            Wedge::South => QuarterTurn::Identity,
            Wedge::East => QuarterTurn::Cw,
            Wedge::North => QuarterTurn::Half,
        }
    }

    /// (x range, y range) of the cap holding the wedge.
    pub fn slice(self, nx: usize, ny: usize) -> (Range<usize>, Range<usize>) {
        match self {
            Wedge::West => (0..nx / 2, 0..ny),
            Wedge::South => (0..nx, 0..ny / 2),
            Wedge::East => (nx - nx / 2..nx, 0..ny),
            Wedge::North => (0..nx, ny - ny / 2..ny),
        }
    }
}

/// Wedge owning cap cell `(x, y)`.
///
/// Uses doubled coordinates relative to the cap center. The center cell of
/// an odd-sized cap belongs to no wedge.
pub fn wedge_of(x: usize, y: usize, nx: usize, ny: usize) -> Option<Wedge> {
    let u = 2 * x as i64 + 1 - nx as i64;
    let v = 2 * y as i64 + 1 - ny as i64;
    if v <= u && u < -v {
        Some(Wedge::South)
    } else if -u <= v && v < u {
        Some(Wedge::East)
    } else if -v < u && u <= v {
        Some(Wedge::North)
    } else if u < v && v <= -u {
        Some(Wedge::West)
    } else {
        None
    }
}

/// A cap wedge turned into the frame of its neighbor.
#[derive(Debug, Clone)]
pub struct CapWedge {
    /// Face the wedge is stacked on.
    pub neighbor: usize,
    /// Which wedge it is.
    pub wedge: Wedge,
    /// Turned, masked and sign-adjusted data.
    pub block: Block,
}

/// Split one variable's cap into wedges for the neighbors in `faces`.
///
/// Empty unless the cap itself is requested. Cells outside each wedge are
/// missing in its block.
pub fn cap_wedges(
    ds: &Dataset,
    name: &str,
    faces: &[usize],
    config: &RearrangeConfig,
    pairing: &VectorPairing,
) -> Result<Vec<CapWedge>> {
    if !faces.contains(&CAP_FACE) {
        return Ok(Vec::new());
    }
    let target = ds.variable(name)?;
    let target_dims = without_face(&target.dims, &config.face_dim);

    let mut out = Vec::new();
    for wedge in WEDGES {
        if !faces.contains(&wedge.neighbor()) {
            continue;
        }
        let turn = wedge.crown_turn();
        let source_name = pairing.source_for(ds, name, turn)?;
        let source = ds.variable(&source_name)?;
        let (cap, source_dims) = face_slice(source, CAP_FACE, &config.face_dim)?;

        let (px, py) = horizontal_positions(&source_dims, &config.face_dim)?;
        let nx = cap.len_of(Axis(px));
        let ny = cap.len_of(Axis(py));
        let (xs, ys) = wedge.slice(nx, ny);

        let mut region = cap;
        region.slice_axis_inplace(Axis(px), Slice::from(xs.clone()));
        region.slice_axis_inplace(Axis(py), Slice::from(ys.clone()));
        let mut region = region.to_owned();
        for (index, value) in region.indexed_iter_mut() {
            let x = xs.start + index[px];
            let y = ys.start + index[py];
            if wedge_of(x, y, nx, ny) != Some(wedge) {
                *value = f64::NAN;
            }
        }

        let mut block = turn_block(region.view(), &source_dims, &target_dims, turn, config)?;
        block.scale(pairing.sign_of(name, &target.dims, turn, config)?);
        debug!(variable = name, source = %source_name, ?wedge, "cap wedge extracted");
        out.push(CapWedge {
            neighbor: wedge.neighbor(),
            wedge,
            block,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Variable;
    use ndarray::{ArrayD, IxDyn};

    #[test]
    fn test_small_partition() {
        // N = 4, rows printed north to south.
        let expected = [
            "WNNN", //
            "WWNE", //
            "WSEE", //
            "SSSE",
        ];
        for (i, line) in expected.iter().enumerate() {
            let y = 3 - i;
            for (x, c) in line.chars().enumerate() {
                let w = match c {
                    'W' => Wedge::West,
                    'S' => Wedge::South,
                    'E' => Wedge::East,
                    _ => Wedge::North,
                };
                assert_eq!(wedge_of(x, y, 4, 4), Some(w), "cell ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_odd_center_unassigned() {
        assert_eq!(wedge_of(2, 2, 5, 5), None);
        assert_eq!(wedge_of(0, 2, 5, 5), Some(Wedge::West));
    }

    #[test]
    fn test_wedge_within_slice() {
        for n in [2usize, 6, 9] {
            for y in 0..n {
                for x in 0..n {
                    if let Some(w) = wedge_of(x, y, n, n) {
                        let (xs, ys) = w.slice(n, n);
                        assert!(xs.contains(&x) && ys.contains(&y));
                    }
                }
            }
        }
    }

    fn cap_dataset(n: usize) -> Dataset {
        let mut data = ArrayD::zeros(IxDyn(&[13, n, n]));
        for ((k, y, x), v) in data
            .view_mut()
            .into_dimensionality::<ndarray::Ix3>()
            .unwrap()
            .indexed_iter_mut()
        {
            *v = (100 * k + 10 * y + x) as f64;
        }
        Dataset::new().with_variable(
            "T",
            Variable::new(vec!["face", "Y", "X"], data).unwrap(),
        )
    }

    #[test]
    fn test_cap_wedges_only_with_cap() {
        let config = RearrangeConfig::default();
        let pairing = VectorPairing::new(&config);
        let ds = cap_dataset(4);
        assert!(cap_wedges(&ds, "T", &[2, 5], &config, &pairing).unwrap().is_empty());

        let wedges = cap_wedges(&ds, "T", &[6, 5, 10], &config, &pairing).unwrap();
        let neighbors: Vec<usize> = wedges.iter().map(|w| w.neighbor).collect();
        assert_eq!(neighbors, vec![5, 10]);
    }

    #[test]
    fn test_west_wedge_turned() {
        let config = RearrangeConfig::default();
        let pairing = VectorPairing::new(&config);
        let ds = cap_dataset(4);
        let wedges = cap_wedges(&ds, "T", &[2, 6], &config, &pairing).unwrap();
        let block = &wedges[0].block;
        assert_eq!(block.data.shape(), &[2, 4]);
        // Ccw: out[r][c] = cap[y = 3 - c][x = r]; cell (0, 3) is west.
        assert_eq!(block.data[IxDyn(&[0, 0])], 630.0);
        // Cell (1, 3) is north.
        assert!(block.data[IxDyn(&[1, 0])].is_nan());
        let valid = block.data.iter().filter(|v| !v.is_nan()).count();
        assert_eq!(valid, 4);
    }
}
