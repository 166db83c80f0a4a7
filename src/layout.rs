//! Placement of faces and cap wedges inside a half-mosaic.

use std::collections::BTreeSet;
use std::ops::Range;

use crate::error::{MosaicError, Result};
use crate::topology::{combined_extent, facet_members, Extent, Facet, FaceGroup};

/// Consecutive index ranges of one face extent each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkGrid {
    chunks: Vec<Range<usize>>,
}

impl ChunkGrid {
    /// Chunks `[0, step), [step, 2*step), ...` that fit inside `total`.
    pub fn new(total: usize, step: usize) -> Self {
        let count = if step == 0 { 0 } else { total / step };
        let chunks = (0..count).map(|i| i * step..(i + 1) * step).collect();
        Self { chunks }
    }

    /// Range of one chunk.
    pub fn chunk(&self, index: usize) -> Option<Range<usize>> {
        self.chunks.get(index).cloned()
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True when no chunk fits.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// End of the last chunk.
    pub fn end(&self) -> usize {
        self.chunks.last().map_or(0, |c| c.end)
    }
}

/// Destination rectangle of a face (or of the wedge next to it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Face index; for a wedge, its neighbor face.
    pub face: usize,
    /// Row (Y) range in the mosaic.
    pub rows: Range<usize>,
    /// Column (X) range in the mosaic.
    pub cols: Range<usize>,
}

/// Face and wedge placements of one half-mosaic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MosaicLayout {
    /// One entry per face, in input order.
    pub faces: Vec<Placement>,
    /// One entry per cap wedge, in wedge order.
    pub wedges: Vec<Placement>,
    /// Total size, wedge rows included.
    pub extent: Extent,
}

impl MosaicLayout {
    /// Placement of a face, if it is part of this half.
    pub fn face(&self, face: usize) -> Option<&Placement> {
        self.faces.iter().find(|p| p.face == face)
    }
}

/// (column bucket, row bucket) of each face.
///
/// Within a facet the bucket is the face's rank among the requested
/// members in canonical order. Facet B sits one column right of facet A
/// when A is present. With `mirror_rows` the row order inside each facet is
/// reversed.
fn buckets(faces: &[usize], mirror_rows: bool) -> Result<Vec<(usize, usize, usize)>> {
    let mut out = Vec::with_capacity(faces.len());
    for &face in faces {
        let group = FaceGroup::of(face)?;
        let Some(facet) = group.facet() else {
            continue;
        };
        let rotated = group.is_rotated();
        let members: BTreeSet<usize> = faces
            .iter()
            .copied()
            .filter(|f| facet_members(rotated, facet).contains(f))
            .collect();
        let rank = members.iter().position(|&f| f == face).unwrap_or(0);
        let row = if mirror_rows {
            members.len() - 1 - rank
        } else {
            rank
        };
        let facet_a_present = faces
            .iter()
            .any(|f| facet_members(rotated, Facet::A).contains(f));
        let col = match facet {
            Facet::A => 0,
            Facet::B if facet_a_present => 1,
            Facet::B => 0,
        };
        out.push((face, col, row));
    }
    Ok(out)
}

/// Concrete placements from bucket positions and chunk boundaries.
///
/// Cap wedges go directly above their neighbor face, spanning half a face
/// height. A wedge whose neighbor is not placed is skipped.
pub fn placements(
    faces: &[usize],
    cap_wedges: &[usize],
    cols: &ChunkGrid,
    rows: &ChunkGrid,
    wedge_height: usize,
    mirror_rows: bool,
) -> Result<(Vec<Placement>, Vec<Placement>)> {
    let mut face_places = Vec::with_capacity(faces.len());
    for (face, col, row) in buckets(faces, mirror_rows)? {
        let cols = cols.chunk(col).ok_or(MosaicError::InvalidFaceIndex(face))?;
        let rows = rows.chunk(row).ok_or(MosaicError::InvalidFaceIndex(face))?;
        face_places.push(Placement { face, rows, cols });
    }

    let top = rows.end();
    let wedge_places = cap_wedges
        .iter()
        .filter_map(|&neighbor| {
            face_places
                .iter()
                .find(|p| p.face == neighbor)
                .map(|p| Placement {
                    face: neighbor,
                    rows: top..top + wedge_height,
                    cols: p.cols.clone(),
                })
        })
        .collect();

    Ok((face_places, wedge_places))
}

/// Size and place one rotation group of the crown.
///
/// `cap_rows` extra rows are reserved above the faces for wedges.
pub fn half_layout(
    faces: &[usize],
    cap_wedges: &[usize],
    face_width: usize,
    face_height: usize,
    cap_rows: usize,
    rotated: bool,
) -> Result<MosaicLayout> {
    let extent = combined_extent(faces, face_width, face_height, rotated)?;
    let cols = ChunkGrid::new(extent.width, face_width);
    let rows = ChunkGrid::new(extent.height, face_height);
    let (faces, wedges) = placements(faces, cap_wedges, &cols, &rows, cap_rows, rotated)?;
    Ok(MosaicLayout {
        faces,
        wedges,
        extent: Extent {
            width: extent.width,
            height: extent.height + cap_rows,
        },
    })
}
