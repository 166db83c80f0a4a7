//! Assembly of LLC faces into a single mosaic.
//!
//! Two entry points:
//!
//! - [`LlcTransformation::arctic_crown`] stitches any connected subset of
//!   faces into two half-mosaics (non-rotated and rotated faces), stacks the
//!   cap wedges on top, and merges the halves side by side.
//! - [`LlcTransformation::arctic_centered`] places the cap and its four
//!   neighbors on a 3x3 grid of faces centered on the pole.
//!
//! Both are single-pass: validate, lay out, fill each variable face by face,
//! merge, then optionally drop per-face bookkeeping.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use tracing::{debug, info};

use crate::arctic::{cap_wedges, CapWedge, WEDGES};
use crate::config::RearrangeConfig;
use crate::data::{Dataset, Variable};
use crate::error::{MosaicError, Result};
use crate::layout::{half_layout, MosaicLayout};
use crate::mates::VectorPairing;
use crate::remap::{
    combine_list, concatenate_shifted, face_slice, horizontal_positions, place_block, shift,
    turn_block, without_face, QuarterTurn,
};
use crate::topology::{classify, FaceGroup, N_FACES};

/// Where the assembled mosaic is centered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Centering {
    /// Atlantic in the middle; rotated faces to the west.
    Atlantic,
    /// Pacific in the middle; rotated faces to the east.
    Pacific,
    /// The pole in the middle. Arctic-centered mosaics only.
    Arctic,
}

impl Centering {
    /// All accepted names.
    pub const NAMES: [&'static str; 3] = ["Atlantic", "Pacific", "Arctic"];

    fn as_str(self) -> &'static str {
        match self {
            Centering::Atlantic => "Atlantic",
            Centering::Pacific => "Pacific",
            Centering::Arctic => "Arctic",
        }
    }
}

impl fmt::Display for Centering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Centering {
    type Err = MosaicError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atlantic" => Ok(Centering::Atlantic),
            "pacific" => Ok(Centering::Pacific),
            "arctic" => Ok(Centering::Arctic),
            _ => Err(MosaicError::unsupported_centering(s, &Self::NAMES)),
        }
    }
}

/// Faces to assemble.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FaceSelection {
    /// Every face, 0 to 12.
    #[default]
    All,
    /// An explicit list; duplicates are ignored.
    Only(Vec<usize>),
}

impl FaceSelection {
    /// Concrete face list, de-duplicated in input order.
    pub fn resolve(&self) -> Result<Vec<usize>> {
        match self {
            FaceSelection::All => Ok((0..N_FACES).collect()),
            FaceSelection::Only(list) => {
                let mut seen = BTreeSet::new();
                let mut out = Vec::with_capacity(list.len());
                for &face in list {
                    if face >= N_FACES {
                        return Err(MosaicError::InvalidFaceIndex(face));
                    }
                    if seen.insert(face) {
                        out.push(face);
                    }
                }
                Ok(out)
            }
        }
    }
}

impl FromStr for FaceSelection {
    type Err = MosaicError;

    /// `all` or a comma-separated list of indices.
    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(FaceSelection::All);
        }
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.parse::<usize>()
                    .map_err(|_| MosaicError::InvalidConfig(format!("not a face index: '{}'", p)))
            })
            .collect::<Result<Vec<_>>>()
            .map(FaceSelection::Only)
    }
}

/// Variables to assemble.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VariableSelection {
    /// Every variable in the dataset.
    #[default]
    All,
    /// An explicit list; duplicates are ignored.
    Only(Vec<String>),
}

impl VariableSelection {
    /// Concrete variable names, checked against the dataset.
    pub fn resolve(&self, ds: &Dataset) -> Result<Vec<String>> {
        let names = match self {
            VariableSelection::All => ds.names(),
            VariableSelection::Only(list) => {
                let mut seen = BTreeSet::new();
                let mut out = Vec::with_capacity(list.len());
                for name in list {
                    if !ds.contains(name) {
                        return Err(MosaicError::variable_not_found(name.as_str()));
                    }
                    if seen.insert(name.as_str()) {
                        out.push(name.clone());
                    }
                }
                out
            }
        };
        if names.is_empty() {
            return Err(MosaicError::EmptyVariableList);
        }
        Ok(names)
    }
}

impl FromStr for VariableSelection {
    type Err = MosaicError;

    /// `all` or a comma-separated list of names.
    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(VariableSelection::All);
        }
        Ok(VariableSelection::Only(
            s.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        ))
    }
}

/// One face of the Arctic-centered mosaic: (face, turn, column, row).
type Slot = (usize, QuarterTurn, usize, usize);

/// Faces used by the Arctic-centered mosaic.
pub const ARCTIC_FACES: [usize; 5] = [2, 5, 6, 7, 10];

const ATLANTIC_SLOTS: [Slot; 5] = [
    (2, QuarterTurn::Identity, 1, 0),
    (5, QuarterTurn::Ccw, 2, 1),
    (6, QuarterTurn::Ccw, 1, 1),
    (7, QuarterTurn::Ccw, 1, 2),
    (10, QuarterTurn::Half, 0, 1),
];

const PACIFIC_SLOTS: [Slot; 5] = [
    (2, QuarterTurn::Half, 1, 2),
    (5, QuarterTurn::Cw, 0, 1),
    (6, QuarterTurn::Cw, 1, 1),
    (7, QuarterTurn::Cw, 1, 0),
    (10, QuarterTurn::Identity, 2, 1),
];

const ARCTIC_SLOTS: [Slot; 5] = [
    (2, QuarterTurn::Cw, 0, 1),
    (5, QuarterTurn::Identity, 1, 0),
    (6, QuarterTurn::Identity, 1, 1),
    (7, QuarterTurn::Identity, 2, 1),
    (10, QuarterTurn::Ccw, 1, 2),
];

fn centered_slots(centering: Centering) -> &'static [Slot; 5] {
    match centering {
        Centering::Atlantic => &ATLANTIC_SLOTS,
        Centering::Pacific => &PACIFIC_SLOTS,
        Centering::Arctic => &ARCTIC_SLOTS,
    }
}

/// How a variable takes part in the assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    /// No face axis: copied unchanged.
    Global,
    /// Face axis without an X/Y pair: carried through untouched.
    FaceOnly,
    /// Per-face horizontal field: stitched.
    Horizontal,
}

/// Remove variables that still carry the face axis, and the face coordinate.
pub fn drop_size(ds: &Dataset, face_dim: &str) -> Dataset {
    let mut out = ds.clone();
    for (name, var) in ds.variables() {
        if var.has_dim(face_dim) {
            out.remove(name);
        }
    }
    out.remove_coord(face_dim);
    out
}

/// Face rearrangement with a fixed configuration.
#[derive(Debug, Clone)]
pub struct LlcTransformation {
    config: RearrangeConfig,
    pairing: VectorPairing,
}

impl LlcTransformation {
    /// Validate the configuration and build the mate table.
    pub fn new(config: RearrangeConfig) -> Result<Self> {
        config.validate()?;
        let pairing = VectorPairing::new(&config);
        Ok(Self { config, pairing })
    }

    /// Active configuration.
    pub fn config(&self) -> &RearrangeConfig {
        &self.config
    }

    /// Mate table in use.
    pub fn pairing(&self) -> &VectorPairing {
        &self.pairing
    }

    /// Stitch a face subset into one mosaic, cap wedges on top.
    ///
    /// `centering` must be Atlantic or Pacific; it decides which half goes
    /// west and which half wins at the seam.
    pub fn arctic_crown(
        &self,
        ds: &Dataset,
        vars: &VariableSelection,
        centering: Centering,
        faces: &FaceSelection,
        drop: bool,
    ) -> Result<Dataset> {
        if centering == Centering::Arctic {
            return Err(MosaicError::unsupported_centering(
                centering.as_str(),
                &["Atlantic", "Pacific"],
            ));
        }
        let ds = self.pairing.pair_attributes(ds);
        let names = vars.resolve(&ds)?;
        let faces = faces.resolve()?;
        let groups = classify(&faces)?;
        info!(%centering, ?faces, variables = names.len(), "Building crown mosaic");

        let axes = &self.config.axes;
        let nx = self.face_extent(&ds, &axes.x, &axes.xp1)?;
        let ny = self.face_extent(&ds, &axes.y, &axes.yp1)?;

        let wedge_neighbors: Vec<usize> = if groups.cap {
            WEDGES
                .iter()
                .map(|w| w.neighbor())
                .filter(|f| faces.contains(f))
                .collect()
        } else {
            Vec::new()
        };
        let cap_rows = if wedge_neighbors.is_empty() { 0 } else { nx / 2 };
        let (nr_wedges, r_wedges): (Vec<usize>, Vec<usize>) = wedge_neighbors
            .into_iter()
            .partition(|&f| matches!(FaceGroup::of(f), Ok(g) if !g.is_rotated()));

        let non_rotated = half_layout(&groups.non_rotated, &nr_wedges, nx, ny, cap_rows, false)?;
        let rotated = half_layout(&groups.rotated, &r_wedges, ny, nx, cap_rows, true)?;

        // West half first; it also wins at the seam.
        let ordered = match centering {
            Centering::Pacific => [non_rotated, rotated],
            _ => [rotated, non_rotated],
        };
        let layouts: Vec<MosaicLayout> = ordered
            .into_iter()
            .filter(|l| !l.extent.is_empty())
            .collect();
        if layouts.is_empty() {
            info!("No faces survive the cutout");
        }

        let mut halves: Vec<Dataset> = layouts
            .iter()
            .map(|l| self.frame(l.extent.width, l.extent.height))
            .collect();
        let mut carried = Vec::new();
        for name in &names {
            let var = ds.variable(name)?;
            if self.kind(var) != Kind::Horizontal {
                carried.push(name);
                continue;
            }
            let wedges = if cap_rows > 0 {
                cap_wedges(&ds, name, &faces, &self.config, &self.pairing)?
            } else {
                Vec::new()
            };
            for (layout, half) in layouts.iter().zip(halves.iter_mut()) {
                let dest = self.fill_half(&ds, name, var, layout, &wedges)?;
                half.insert(name.clone(), dest);
            }
            debug!(variable = %name, halves = layouts.len(), "variable stitched");
        }

        let merged = combine_list(&concatenate_shifted(&halves, &axes.x, &axes.xp1))?;
        let mut out = shift(&merged, &axes.x, &axes.xp1, &self.pairing);
        self.carry(&ds, &carried, &mut out);
        Ok(self.finish(out, drop))
    }

    /// Place faces 2, 5, 6, 7 and 10 on a 3x3 grid of faces.
    ///
    /// Other requested faces are ignored with a notice. Faces must be square.
    pub fn arctic_centered(
        &self,
        ds: &Dataset,
        vars: &VariableSelection,
        centering: Centering,
        faces: &FaceSelection,
        drop: bool,
    ) -> Result<Dataset> {
        let ds = self.pairing.pair_attributes(ds);
        let names = vars.resolve(&ds)?;
        let ignored: Vec<usize> = faces
            .resolve()?
            .into_iter()
            .filter(|f| !ARCTIC_FACES.contains(f))
            .collect();
        if !ignored.is_empty() {
            info!(?ignored, "Only faces 2, 5, 6, 7 and 10 are part of an Arctic-centered mosaic");
        }
        info!(%centering, variables = names.len(), "Building Arctic-centered mosaic");

        let axes = &self.config.axes;
        let n = self.face_extent(&ds, &axes.x, &axes.xp1)?;
        let ny = self.face_extent(&ds, &axes.y, &axes.yp1)?;
        if n != ny {
            return Err(MosaicError::ShapeMismatch {
                variable: self.config.face_dim.clone(),
                block: vec![ny, n],
                destination: vec![n, n],
            });
        }

        let size = 3 * n;
        let mut out = self.frame(size, size);
        let mut carried = Vec::new();
        for name in &names {
            let var = ds.variable(name)?;
            if self.kind(var) != Kind::Horizontal {
                carried.push(name);
                continue;
            }
            let mut dest = self.template(var, size, size)?;
            for &(face, turn, col, row) in centered_slots(centering) {
                self.place_face(&ds, name, &mut dest, face, turn, bucket(row, n), bucket(col, n))?;
            }
            out.insert(name.clone(), dest);
            debug!(variable = %name, "variable centered");
        }

        self.carry(&ds, &carried, &mut out);
        Ok(self.finish(out, drop))
    }

    fn kind(&self, var: &Variable) -> Kind {
        if !var.has_dim(&self.config.face_dim) {
            return Kind::Global;
        }
        match horizontal_positions(&var.dims, &self.config.face_dim) {
            Ok((px, py))
                if self.config.axes.is_horizontal(&var.dims[px])
                    && self.config.axes.is_horizontal(&var.dims[py]) =>
            {
                Kind::Horizontal
            }
            _ => Kind::FaceOnly,
        }
    }

    /// Per-face extent along a direction, from the center or corner axis.
    fn face_extent(&self, ds: &Dataset, center: &str, corner: &str) -> Result<usize> {
        ds.dim_len(center)
            .or_else(|| ds.dim_len(corner))
            .ok_or_else(|| MosaicError::missing_dimension(center))
    }

    /// Empty dataset with mosaic index coordinates.
    fn frame(&self, width: usize, height: usize) -> Dataset {
        let axes = &self.config.axes;
        let mut ds = Dataset::new();
        ds.set_coord(axes.x.clone(), range(width));
        ds.set_coord(axes.xp1.clone(), range(width + 1));
        ds.set_coord(axes.y.clone(), range(height));
        ds.set_coord(axes.yp1.clone(), range(height + 1));
        ds
    }

    /// All-missing mosaic variable shaped like `var` without its face axis.
    fn template(&self, var: &Variable, width: usize, height: usize) -> Result<Variable> {
        let axes = &self.config.axes;
        let dims = without_face(&var.dims, &self.config.face_dim);
        let shape = dims
            .iter()
            .map(|d| {
                if *d == axes.x {
                    Ok(width)
                } else if *d == axes.xp1 {
                    Ok(width + 1)
                } else if *d == axes.y {
                    Ok(height)
                } else if *d == axes.yp1 {
                    Ok(height + 1)
                } else {
                    var.dim_len(d)
                        .ok_or_else(|| MosaicError::missing_dimension(d.as_str()))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        let mut dest = Variable::missing(dims, &shape)?;
        dest.attributes = var.attributes.clone();
        Ok(dest)
    }

    #[allow(clippy::too_many_arguments)]
    fn place_face(
        &self,
        ds: &Dataset,
        name: &str,
        dest: &mut Variable,
        face: usize,
        turn: QuarterTurn,
        rows: Range<usize>,
        cols: Range<usize>,
    ) -> Result<()> {
        let source_name = self.pairing.source_for(ds, name, turn)?;
        let source = ds.variable(&source_name)?;
        let (view, source_dims) = face_slice(source, face, &self.config.face_dim)?;
        let mut block = turn_block(view, &source_dims, &dest.dims, turn, &self.config)?;
        block.scale(self.pairing.sign_of(name, &dest.dims, turn, &self.config)?);
        place_block(dest, name, &block, rows, cols, &self.config.face_dim)
    }

    fn fill_half(
        &self,
        ds: &Dataset,
        name: &str,
        var: &Variable,
        layout: &MosaicLayout,
        wedges: &[CapWedge],
    ) -> Result<Variable> {
        let mut dest = self.template(var, layout.extent.width, layout.extent.height)?;
        for placement in &layout.faces {
            let turn = FaceGroup::of(placement.face)?.crown_turn();
            self.place_face(
                ds,
                name,
                &mut dest,
                placement.face,
                turn,
                placement.rows.clone(),
                placement.cols.clone(),
            )?;
        }
        for wedge in wedges {
            if let Some(p) = layout.wedges.iter().find(|p| p.face == wedge.neighbor) {
                place_block(
                    &mut dest,
                    name,
                    &wedge.block,
                    p.rows.clone(),
                    p.cols.clone(),
                    &self.config.face_dim,
                )?;
            }
        }
        Ok(dest)
    }

    /// Copy variables that are not stitched, plus the coordinates they use.
    fn carry(&self, ds: &Dataset, names: &[&String], out: &mut Dataset) {
        for name in names {
            if let Some(var) = ds.get(name) {
                out.insert((*name).clone(), var.clone());
            }
        }
        let used = out.dims();
        for (dim, values) in ds.coords() {
            if !self.config.axes.is_horizontal(dim) && used.contains(dim) {
                out.set_coord(dim.clone(), values.clone());
            }
        }
    }

    fn finish(&self, out: Dataset, drop: bool) -> Dataset {
        if drop {
            drop_size(&out, &self.config.face_dim)
        } else {
            out
        }
    }
}

fn range(len: usize) -> Vec<i64> {
    (0..len as i64).collect()
}

fn bucket(index: usize, n: usize) -> Range<usize> {
    index * n..(index + 1) * n
}
