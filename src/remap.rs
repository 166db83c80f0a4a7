//! Elementary re-indexing of arrays and datasets.
//!
//! Array level: turning a face (or wedge) into the mosaic frame and writing
//! it into place. Dataset level: shifting, reversing, rotating, rolling and
//! merging coordinate-indexed datasets.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn, Slice};

use crate::config::{AxisNames, RearrangeConfig};
use crate::data::{Dataset, Variable};
use crate::dims::Dims;
use crate::error::{MosaicError, Result};
use crate::mates::VectorPairing;

/// Orientation of a face relative to the mosaic frame.
///
/// Named by where native +x and +y end up: `Identity` (E, N), `Ccw`
/// (N, W), `Half` (W, S), `Cw` (S, E).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuarterTurn {
    /// No change.
    Identity,
    /// Quarter turn counter-clockwise: reverse Y, then swap axes.
    Ccw,
    /// Half turn: reverse both axes.
    Half,
    /// Quarter turn clockwise: reverse X, then swap axes.
    Cw,
}

impl QuarterTurn {
    fn quarters(self) -> u8 {
        match self {
            QuarterTurn::Identity => 0,
            QuarterTurn::Ccw => 1,
            QuarterTurn::Half => 2,
            QuarterTurn::Cw => 3,
        }
    }

    fn from_quarters(q: u8) -> Self {
        match q % 4 {
            0 => QuarterTurn::Identity,
            1 => QuarterTurn::Ccw,
            2 => QuarterTurn::Half,
            _ => QuarterTurn::Cw,
        }
    }

    /// Whether native X is reversed.
    pub fn reverses_x(self) -> bool {
        matches!(self, QuarterTurn::Half | QuarterTurn::Cw)
    }

    /// Whether native Y is reversed.
    pub fn reverses_y(self) -> bool {
        matches!(self, QuarterTurn::Ccw | QuarterTurn::Half)
    }

    /// Whether native X and Y trade places.
    pub fn swaps_axes(self) -> bool {
        matches!(self, QuarterTurn::Ccw | QuarterTurn::Cw)
    }

    /// Turn that undoes this one.
    pub fn inverse(self) -> Self {
        Self::from_quarters(4 - self.quarters())
    }

    /// This turn followed by `next`.
    pub fn then(self, next: Self) -> Self {
        Self::from_quarters(self.quarters() + next.quarters())
    }
}

/// A face (or wedge) already turned into the mosaic frame.
#[derive(Debug, Clone)]
pub struct Block {
    /// Data in the target variable's axis order.
    pub data: ArrayD<f64>,
    /// Extra row offset from a reversed corner axis.
    pub row_shift: usize,
    /// Extra column offset from a reversed corner axis.
    pub col_shift: usize,
}

impl Block {
    /// Multiply every value by `sign`.
    pub fn scale(&mut self, sign: f64) {
        if sign != 1.0 {
            self.data.mapv_inplace(|v| v * sign);
        }
    }
}

/// Storage positions of the X and Y axes.
pub(crate) fn horizontal_positions(dims: &[String], face_dim: &str) -> Result<(usize, usize)> {
    let roles = Dims::from_storage(dims, face_dim);
    let x = roles.x()?;
    let y = roles.y()?;
    let pos = |name: &str| dims.iter().position(|d| d == name);
    match (pos(x), pos(y)) {
        (Some(px), Some(py)) => Ok((px, py)),
        _ => Err(MosaicError::MissingAxis {
            role: 'X',
            dims: dims.to_vec(),
        }),
    }
}

/// Dimension names of a variable with the face axis removed.
pub fn without_face(dims: &[String], face_dim: &str) -> Vec<String> {
    dims.iter().filter(|d| *d != face_dim).cloned().collect()
}

/// View of one face of a per-face variable, with the dims it keeps.
pub fn face_slice<'a>(
    var: &'a Variable,
    face: usize,
    face_dim: &str,
) -> Result<(ArrayViewD<'a, f64>, Vec<String>)> {
    let axis = var
        .axis_of(face_dim)
        .ok_or_else(|| MosaicError::missing_dimension(face_dim))?;
    if face >= var.data.len_of(Axis(axis)) {
        return Err(MosaicError::InvalidFaceIndex(face));
    }
    Ok((
        var.data.index_axis(Axis(axis), face),
        without_face(&var.dims, face_dim),
    ))
}

/// Turn a single-face array into the mosaic frame of `target_dims`.
///
/// `source_dims`/`target_dims` exclude the face axis. Non-horizontal axes
/// are matched by name. A reversed axis landing on a corner target axis
/// is shifted by one.
pub fn turn_block(
    source: ArrayViewD<'_, f64>,
    source_dims: &[String],
    target_dims: &[String],
    turn: QuarterTurn,
    config: &RearrangeConfig,
) -> Result<Block> {
    let (sx, sy) = horizontal_positions(source_dims, &config.face_dim)?;
    let (tx, ty) = horizontal_positions(target_dims, &config.face_dim)?;

    let mut view = source;
    if turn.reverses_x() {
        view.invert_axis(Axis(sx));
    }
    if turn.reverses_y() {
        view.invert_axis(Axis(sy));
    }

    // Source axes feeding the mosaic rows and columns.
    let (row_src, col_src) = if turn.swaps_axes() { (sx, sy) } else { (sy, sx) };

    let mut perm = Vec::with_capacity(target_dims.len());
    for (p, name) in target_dims.iter().enumerate() {
        let src = if p == ty {
            row_src
        } else if p == tx {
            col_src
        } else {
            source_dims
                .iter()
                .position(|d| d == name)
                .ok_or_else(|| MosaicError::ShapeMismatch {
                    variable: name.clone(),
                    block: view.shape().to_vec(),
                    destination: vec![],
                })?
        };
        perm.push(src);
    }
    if perm.len() != view.ndim() {
        return Err(MosaicError::ShapeMismatch {
            variable: target_dims.join(","),
            block: view.shape().to_vec(),
            destination: perm,
        });
    }

    let row_reversed = if row_src == sx { turn.reverses_x() } else { turn.reverses_y() };
    let col_reversed = if col_src == sx { turn.reverses_x() } else { turn.reverses_y() };
    let axes = &config.axes;

    Ok(Block {
        data: view.permuted_axes(IxDyn(&perm)).to_owned(),
        row_shift: usize::from(row_reversed && axes.is_corner(&target_dims[ty])),
        col_shift: usize::from(col_reversed && axes.is_corner(&target_dims[tx])),
    })
}

/// Write a block into its destination rectangle, skipping missing values.
pub fn place_block(
    dest: &mut Variable,
    name: &str,
    block: &Block,
    rows: Range<usize>,
    cols: Range<usize>,
    face_dim: &str,
) -> Result<()> {
    let (tx, ty) = horizontal_positions(&dest.dims, face_dim)?;
    let r0 = rows.start + block.row_shift;
    let c0 = cols.start + block.col_shift;
    let r1 = r0 + block.data.len_of(Axis(ty));
    let c1 = c0 + block.data.len_of(Axis(tx));

    if r1 > dest.data.len_of(Axis(ty)) || c1 > dest.data.len_of(Axis(tx)) {
        return Err(MosaicError::ShapeMismatch {
            variable: name.to_string(),
            block: block.data.shape().to_vec(),
            destination: dest.shape().to_vec(),
        });
    }

    let mut target = dest.data.view_mut();
    target.slice_axis_inplace(Axis(ty), Slice::from(r0..r1));
    target.slice_axis_inplace(Axis(tx), Slice::from(c0..c1));
    if target.shape() != block.data.shape() {
        return Err(MosaicError::ShapeMismatch {
            variable: name.to_string(),
            block: block.data.shape().to_vec(),
            destination: target.shape().to_vec(),
        });
    }
    target.zip_mut_with(&block.data, |d, &s| {
        if !s.is_nan() {
            *d = s;
        }
    });
    Ok(())
}

/// Add `delta` to the coordinates of a center/corner axis pair.
fn offset_axes(ds: &Dataset, center: &str, corner: &str, delta: i64) -> Dataset {
    let mut out = ds.clone();
    for dim in [center, corner] {
        if ds.dim_len(dim).is_some() {
            let values = ds.coord(dim).into_iter().map(|v| v + delta).collect();
            out.set_coord(dim, values);
        }
    }
    out
}

/// Re-index an axis pair so the first center index becomes 0, then retag
/// vector mates.
pub fn shift(ds: &Dataset, center: &str, corner: &str, pairing: &VectorPairing) -> Dataset {
    let first = ds
        .coord(center)
        .first()
        .copied()
        .or_else(|| ds.coord(corner).first().copied())
        .unwrap_or(0);
    pairing.pair_attributes(&offset_axes(ds, center, corner, -first))
}

/// Flip the index order of an axis pair: new index = max - old index.
///
/// With `transpose`, every variable's axis order is reversed afterwards.
pub fn reverse(ds: &Dataset, center: &str, corner: &str, transpose: bool) -> Dataset {
    let mut out = ds.clone();
    for dim in [center, corner] {
        if ds.dim_len(dim).is_none() {
            continue;
        }
        let old = ds.coord(dim);
        let max = old.iter().copied().max().unwrap_or(0);
        let new = old.iter().rev().map(|v| max - v).collect();
        out.set_coord(dim, new);
        for (_, var) in out.variables_mut() {
            if let Some(ax) = var.axis_of(dim) {
                var.data.invert_axis(Axis(ax));
                var.data = var.data.as_standard_layout().to_owned();
            }
        }
    }
    if transpose {
        for (_, var) in out.variables_mut() {
            var.dims.reverse();
            var.data = var.data.view().reversed_axes().to_owned();
        }
    }
    out
}

/// Swap the X and Y roles of a dataset after optional reflections.
///
/// Dimension names are exchanged (`x` <-> `y`, `xp1` <-> `yp1`). With
/// `transpose`, each variable's data is transposed so the storage order of
/// the renamed axes matches the original.
pub fn rotate(
    ds: &Dataset,
    axes: &AxisNames,
    reverse_x: bool,
    reverse_y: bool,
    transpose: bool,
) -> Dataset {
    let mut out = ds.clone();
    if reverse_x {
        out = reverse(&out, &axes.x, &axes.xp1, false);
    }
    if reverse_y {
        out = reverse(&out, &axes.y, &axes.yp1, false);
    }

    let swap = |name: &str| -> String {
        if name == axes.x {
            axes.y.clone()
        } else if name == axes.y {
            axes.x.clone()
        } else if name == axes.xp1 {
            axes.yp1.clone()
        } else if name == axes.yp1 {
            axes.xp1.clone()
        } else {
            name.to_string()
        }
    };

    let mut rotated = Dataset::new();
    for (dim, values) in out.coords() {
        rotated.set_coord(swap(dim.as_str()), values.clone());
    }
    for (name, var) in out.variables() {
        let mut var = var.clone();
        var.dims = var.dims.iter().map(|d| swap(d.as_str())).collect();
        if transpose {
            let horizontal: Vec<usize> = (0..var.dims.len())
                .filter(|&i| axes.is_horizontal(&var.dims[i]))
                .collect();
            if let [a, b] = horizontal[..] {
                var.data.swap_axes(a, b);
                var.data = var.data.as_standard_layout().to_owned();
                var.dims.swap(a, b);
            }
        }
        rotated.insert(name.clone(), var);
    }
    rotated
}

/// Shift each dataset so it follows its predecessor along an axis pair.
///
/// The first starts at index 0; each next one starts right after the last
/// center index of the previous. Merge the result with [`combine_list`].
pub fn concatenate_shifted(list: &[Dataset], center: &str, corner: &str) -> Vec<Dataset> {
    let mut next_start = 0i64;
    let mut out = Vec::with_capacity(list.len());
    for ds in list {
        let coord = ds.coord(center);
        let delta = coord.first().map_or(0, |first| next_start - first);
        if let Some(last) = coord.last() {
            next_start = last + delta + 1;
        }
        out.push(offset_axes(ds, center, corner, delta));
    }
    out
}

fn union_coords(a: &Dataset, b: &Dataset) -> BTreeMap<String, Vec<i64>> {
    let mut dims = a.dims();
    dims.extend(b.dims());
    dims.into_iter()
        .map(|dim| {
            let mut values: BTreeSet<i64> = BTreeSet::new();
            if a.dim_len(&dim).is_some() {
                values.extend(a.coord(&dim));
            }
            if b.dim_len(&dim).is_some() {
                values.extend(b.coord(&dim));
            }
            (dim, values.into_iter().collect())
        })
        .collect()
}

/// Lay a variable out on the union coordinates, NaN where it has no data.
fn reindex(
    var: &Variable,
    ds: &Dataset,
    coords: &BTreeMap<String, Vec<i64>>,
) -> Variable {
    let maps: Vec<Vec<usize>> = var
        .dims
        .iter()
        .map(|dim| {
            let target = &coords[dim];
            ds.coord(dim)
                .iter()
                .map(|v| target.binary_search(v).unwrap_or(0))
                .collect()
        })
        .collect();
    let shape: Vec<usize> = var.dims.iter().map(|d| coords[d].len()).collect();
    let mut data = ArrayD::from_elem(IxDyn(&shape), f64::NAN);
    let mut index = vec![0usize; shape.len()];
    for (src, &value) in var.data.indexed_iter() {
        for (axis, slot) in index.iter_mut().enumerate() {
            *slot = maps[axis][src[axis]];
        }
        data[IxDyn(&index)] = value;
    }
    Variable {
        dims: var.dims.clone(),
        data,
        attributes: var.attributes.clone(),
    }
}

/// Merge two datasets on the union of their coordinates; where both hold a
/// value, `primary` wins unless it is missing.
pub fn combine_first(primary: &Dataset, secondary: &Dataset) -> Result<Dataset> {
    let coords = union_coords(primary, secondary);
    let mut out = Dataset::new();
    for (dim, values) in &coords {
        out.set_coord(dim.clone(), values.clone());
    }

    let mut names: BTreeSet<String> = primary.names().into_iter().collect();
    names.extend(secondary.names());

    for name in names {
        let merged = match (primary.get(&name), secondary.get(&name)) {
            (Some(p), Some(s)) => {
                if p.dims != s.dims {
                    return Err(MosaicError::ShapeMismatch {
                        variable: name,
                        block: s.shape().to_vec(),
                        destination: p.shape().to_vec(),
                    });
                }
                let mut merged = reindex(p, primary, &coords);
                let fallback = reindex(s, secondary, &coords);
                merged.data.zip_mut_with(&fallback.data, |d, &f| {
                    if d.is_nan() {
                        *d = f;
                    }
                });
                merged
            }
            (Some(p), None) => reindex(p, primary, &coords),
            (None, Some(s)) => reindex(s, secondary, &coords),
            (None, None) => continue,
        };
        out.insert(name, merged);
    }
    Ok(out)
}

/// Fold [`combine_first`] over a list, earlier entries taking priority.
pub fn combine_list(list: &[Dataset]) -> Result<Dataset> {
    let mut iter = list.iter();
    let mut acc = match iter.next() {
        Some(first) => first.clone(),
        None => return Ok(Dataset::new()),
    };
    for ds in iter {
        acc = combine_first(&acc, ds)?;
    }
    Ok(acc)
}

/// Cyclically shift data by half the center extent along an axis pair.
///
/// Both axes roll over the first `width` entries, so corner `i` stays the
/// west corner of cell `i`. Corner entries past `width` close the period
/// with the corners they duplicate. Coordinates are left as they were.
pub fn roll_half(ds: &Dataset, center: &str, corner: &str) -> Dataset {
    let width = ds.dim_len(center).unwrap_or(0);
    let half = width / 2;
    let mut out = ds.clone();
    if half == 0 {
        return out;
    }
    for (_, var) in out.variables_mut() {
        for dim in [center, corner] {
            let Some(ax) = var.axis_of(dim) else {
                continue;
            };
            let len = var.data.len_of(Axis(ax));
            if len < width {
                continue;
            }
            let src = var.data.slice_axis(Axis(ax), Slice::from(..width)).to_owned();
            var.data
                .slice_axis_mut(Axis(ax), Slice::from(..width - half))
                .assign(&src.slice_axis(Axis(ax), Slice::from(half..)));
            var.data
                .slice_axis_mut(Axis(ax), Slice::from(width - half..width))
                .assign(&src.slice_axis(Axis(ax), Slice::from(..half)));
            if len > width {
                let wrap = var
                    .data
                    .slice_axis(Axis(ax), Slice::from(..len - width))
                    .to_owned();
                var.data
                    .slice_axis_mut(Axis(ax), Slice::from(width..))
                    .assign(&wrap);
            }
        }
    }
    out
}
