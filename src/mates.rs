//! Vector-component pairing and the sign convention under rotation.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{AxisNames, RearrangeConfig};
use crate::data::Dataset;
use crate::dims::Dims;
use crate::error::Result;
use crate::remap::QuarterTurn;
use crate::topology::FaceGroup;

/// Where a variable sits on the staggered grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisShape {
    /// Cell center (center X, center Y).
    Center,
    /// West face of a cell (corner X, center Y).
    UPoint,
    /// South face of a cell (center X, corner Y).
    VPoint,
    /// Cell corner (corner X, corner Y).
    Corner,
}

impl AxisShape {
    /// Shape from the variable's X and Y dimension names.
    pub fn of(x: &str, y: &str, axes: &AxisNames) -> Self {
        match (axes.is_corner(x), axes.is_corner(y)) {
            (false, false) => AxisShape::Center,
            (true, false) => AxisShape::UPoint,
            (false, true) => AxisShape::VPoint,
            (true, true) => AxisShape::Corner,
        }
    }

    /// Shape of a variable from its storage-order dimensions.
    pub fn of_dims(dims: &[String], config: &RearrangeConfig) -> Result<Self> {
        let roles = Dims::from_storage(dims, &config.face_dim);
        Ok(Self::of(roles.x()?, roles.y()?, &config.axes))
    }
}

/// Sign applied to a variable of `shape` placed with `turn`.
///
/// A U-point component is negated when native +y ends up pointing west
/// (`Ccw`) or +x west (`Half`); a V-point component when the turn sends
/// the other component south (`Half`, `Cw`).
pub fn sign_for(turn: QuarterTurn, shape: AxisShape, is_metric: bool) -> f64 {
    if is_metric {
        return 1.0;
    }
    let flip = match shape {
        AxisShape::UPoint => matches!(turn, QuarterTurn::Ccw | QuarterTurn::Half),
        AxisShape::VPoint => matches!(turn, QuarterTurn::Half | QuarterTurn::Cw),
        AxisShape::Center | AxisShape::Corner => false,
    };
    if flip {
        -1.0
    } else {
        1.0
    }
}

/// Declared mate pairs and the unsigned-metric set.
#[derive(Debug, Clone)]
pub struct VectorPairing {
    mate_attr: String,
    mates: BTreeMap<String, String>,
    unsigned_metrics: BTreeSet<String>,
}

impl VectorPairing {
    /// Build from configuration. Pairs are stored in both directions.
    pub fn new(config: &RearrangeConfig) -> Self {
        let mut mates = BTreeMap::new();
        for (a, b) in &config.mate_pairs {
            mates.insert(a.clone(), b.clone());
            mates.insert(b.clone(), a.clone());
        }
        Self {
            mate_attr: config.mate_attr.clone(),
            mates,
            unsigned_metrics: config.unsigned_metrics.clone(),
        }
    }

    /// Tag every pair whose members are both present with a back-reference.
    ///
    /// Returns a new dataset; applying it again changes nothing.
    pub fn pair_attributes(&self, ds: &Dataset) -> Dataset {
        let mut out = ds.clone();
        for (name, mate) in &self.mates {
            if !ds.contains(mate) {
                continue;
            }
            if let Some(var) = out.get_mut(name) {
                var.attributes.insert(self.mate_attr.clone(), mate.clone());
            }
        }
        out
    }

    /// Mate of a variable if declared and present, else the variable itself.
    pub fn resolve_mate(&self, ds: &Dataset, name: &str) -> Result<String> {
        let var = ds.variable(name)?;
        let declared = var
            .attributes
            .get(&self.mate_attr)
            .or_else(|| self.mates.get(name));
        Ok(match declared {
            Some(mate) if ds.contains(mate) => mate.clone(),
            _ => name.to_string(),
        })
    }

    /// Variable to read from a face placed with `turn`.
    pub fn source_for(&self, ds: &Dataset, name: &str, turn: QuarterTurn) -> Result<String> {
        if turn.swaps_axes() {
            self.resolve_mate(ds, name)
        } else {
            Ok(name.to_string())
        }
    }

    /// Whether a variable is a direction-free metric.
    pub fn is_unsigned_metric(&self, name: &str) -> bool {
        self.unsigned_metrics.contains(name)
    }

    /// Sign of a variable placed with `turn`.
    pub fn sign_of(
        &self,
        name: &str,
        dims: &[String],
        turn: QuarterTurn,
        config: &RearrangeConfig,
    ) -> Result<f64> {
        let shape = AxisShape::of_dims(dims, config)?;
        Ok(sign_for(turn, shape, self.is_unsigned_metric(name)))
    }

    /// Sign of a variable on a crown face.
    pub fn sign_for_face(&self, face: usize, shape: AxisShape, is_metric: bool) -> Result<f64> {
        Ok(sign_for(FaceGroup::of(face)?.crown_turn(), shape, is_metric))
    }
}
