//! Face classification and connectivity of the LLC grid.
//!
//! The 13 faces fall into five groups: two non-rotated facets, the polar
//! cap, and two rotated facets. Group membership is a table lookup.

use std::collections::BTreeSet;

use tracing::info;

use crate::error::{MosaicError, Result};
use crate::remap::QuarterTurn;

/// Number of faces in an LLC grid.
pub const N_FACES: usize = 13;

/// Index of the polar cap face.
pub const CAP_FACE: usize = 6;

/// One of the two facets in a rotation group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Facet {
    /// First facet (faces 0-2 or 7-9).
    A,
    /// Second facet (faces 3-5 or 10-12).
    B,
}

/// Rotation group of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceGroup {
    /// Faces sharing the mosaic orientation.
    NonRotated(Facet),
    /// The polar cap.
    Cap,
    /// Faces whose X/Y axes are transposed relative to the mosaic.
    Rotated(Facet),
}

const FACE_GROUPS: [FaceGroup; N_FACES] = [
    FaceGroup::NonRotated(Facet::A),
    FaceGroup::NonRotated(Facet::A),
    FaceGroup::NonRotated(Facet::A),
    FaceGroup::NonRotated(Facet::B),
    FaceGroup::NonRotated(Facet::B),
    FaceGroup::NonRotated(Facet::B),
    FaceGroup::Cap,
    FaceGroup::Rotated(Facet::A),
    FaceGroup::Rotated(Facet::A),
    FaceGroup::Rotated(Facet::A),
    FaceGroup::Rotated(Facet::B),
    FaceGroup::Rotated(Facet::B),
    FaceGroup::Rotated(Facet::B),
];

const NON_ROTATED_FACETS: [[usize; 3]; 2] = [[0, 1, 2], [3, 4, 5]];
const ROTATED_FACETS: [[usize; 3]; 2] = [[7, 8, 9], [10, 11, 12]];

impl FaceGroup {
    /// Look up the group of a face.
    pub fn of(face: usize) -> Result<Self> {
        FACE_GROUPS
            .get(face)
            .copied()
            .ok_or(MosaicError::InvalidFaceIndex(face))
    }

    /// True for faces 7-12.
    pub fn is_rotated(self) -> bool {
        matches!(self, FaceGroup::Rotated(_))
    }

    /// Facet of a non-cap face.
    pub fn facet(self) -> Option<Facet> {
        match self {
            FaceGroup::NonRotated(f) | FaceGroup::Rotated(f) => Some(f),
            FaceGroup::Cap => None,
        }
    }

    /// Orientation of the group inside the crown mosaic.
    pub fn crown_turn(self) -> QuarterTurn {
        if self.is_rotated() {
            QuarterTurn::Cw
        } else {
            QuarterTurn::Identity
        }
    }
}

/// Members of a facet in canonical order.
pub fn facet_members(rotated: bool, facet: Facet) -> [usize; 3] {
    let table = if rotated {
        ROTATED_FACETS
    } else {
        NON_ROTATED_FACETS
    };
    match facet {
        Facet::A => table[0],
        Facet::B => table[1],
    }
}

/// Position of a face within its facet (0, 1 or 2).
pub fn offset_in_facet(face: usize) -> Result<Option<usize>> {
    let group = FaceGroup::of(face)?;
    Ok(group.facet().map(|facet| {
        let members = facet_members(group.is_rotated(), facet);
        face - members[0]
    }))
}

/// Faces split by rotation group, input order preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    /// Faces 0-5 that were requested.
    pub non_rotated: Vec<usize>,
    /// Faces 7-12 that were requested.
    pub rotated: Vec<usize>,
    /// Whether the polar cap was requested.
    pub cap: bool,
}

/// Partition faces into non-rotated and rotated lists.
pub fn classify(faces: &[usize]) -> Result<Classified> {
    let mut out = Classified::default();
    for &face in faces {
        match FaceGroup::of(face)? {
            FaceGroup::Cap => out.cap = true,
            FaceGroup::Rotated(_) => out.rotated.push(face),
            FaceGroup::NonRotated(_) => out.non_rotated.push(face),
        }
    }
    Ok(out)
}

/// Size of a mosaic in cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extent {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl Extent {
    /// True when nothing survives.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Members of `reference` present in `faces`, as a sorted set.
fn present(faces: &[usize], reference: [usize; 3]) -> BTreeSet<usize> {
    faces
        .iter()
        .copied()
        .filter(|f| reference.contains(f))
        .collect()
}

fn check_connected(members: &BTreeSet<usize>, reference: [usize; 3]) -> Result<()> {
    let ends = (members.iter().next(), members.iter().next_back());
    if members.len() == 2 && ends == (Some(&reference[0]), Some(&reference[2])) {
        return Err(MosaicError::DisconnectedFaces {
            faces: members.iter().copied().collect(),
        });
    }
    Ok(())
}

/// Total mosaic extent of one rotation group.
///
/// `face_width`/`face_height` are the block size of one face in the
/// mosaic frame. Validates connectivity; never corrects a bad request.
pub fn combined_extent(
    faces: &[usize],
    face_width: usize,
    face_height: usize,
    rotated: bool,
) -> Result<Extent> {
    let ref_a = facet_members(rotated, Facet::A);
    let ref_b = facet_members(rotated, Facet::B);
    let a = present(faces, ref_a);
    let b = present(faces, ref_b);

    match (a.is_empty(), b.is_empty()) {
        (true, true) => {
            info!(
                rotated = rotated,
                "No data within group of facets (same ordering) survives the cutout"
            );
            Ok(Extent::default())
        }
        (false, true) | (true, false) => {
            let (members, reference) = if a.is_empty() { (&b, ref_b) } else { (&a, ref_a) };
            check_connected(members, reference)?;
            Ok(Extent {
                width: face_width,
                height: members.len() * face_height,
            })
        }
        (false, false) => {
            check_connected(&a, ref_a)?;
            check_connected(&b, ref_b)?;
            let offsets_a: Vec<usize> = a.iter().map(|f| f - ref_a[0]).collect();
            let offsets_b: Vec<usize> = b.iter().map(|f| f - ref_b[0]).collect();
            if offsets_a != offsets_b {
                return Err(MosaicError::RaggedFacets {
                    facet_a: a.into_iter().collect(),
                    facet_b: b.into_iter().collect(),
                });
            }
            Ok(Extent {
                width: 2 * face_width,
                height: a.len() * face_height,
            })
        }
    }
}
