//! Configuration for face rearrangement.

use std::collections::BTreeSet;

use crate::error::{MosaicError, Result};

/// Known vector components and directional grid metrics, in mate pairs.
const DEFAULT_MATE_PAIRS: [(&str, &str); 12] = [
    ("ADVx_SLT", "ADVy_SLT"),
    ("ADVx_TH", "ADVy_TH"),
    ("DFxE_TH", "DFyE_TH"),
    ("DFxE_SLT", "DFyE_SLT"),
    ("maskW", "maskS"),
    ("TAUX", "TAUY"),
    ("U", "V"),
    ("UVELMASS", "VVELMASS"),
    ("dxC", "dyC"),
    ("dxG", "dyG"),
    ("hFacW", "hFacS"),
    ("rAw", "rAs"),
];

/// Metrics at vector points. They swap with their mate under rotation but
/// never change sign.
const DEFAULT_UNSIGNED_METRICS: [&str; 10] = [
    "dxC", "dyC", "dxG", "dyG", "hFacW", "hFacS", "rAw", "rAs", "maskW", "maskS",
];

/// Dimension names of the two horizontal directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisNames {
    /// Cell-center X dimension.
    pub x: String,
    /// Cell-corner X dimension.
    pub xp1: String,
    /// Cell-center Y dimension.
    pub y: String,
    /// Cell-corner Y dimension.
    pub yp1: String,
}

impl Default for AxisNames {
    fn default() -> Self {
        Self {
            x: "X".to_string(),
            xp1: "Xp1".to_string(),
            y: "Y".to_string(),
            yp1: "Yp1".to_string(),
        }
    }
}

impl AxisNames {
    /// True for either corner-point dimension.
    pub fn is_corner(&self, dim: &str) -> bool {
        dim == self.xp1 || dim == self.yp1
    }

    /// True for any of the four horizontal dimensions.
    pub fn is_horizontal(&self, dim: &str) -> bool {
        dim == self.x || dim == self.xp1 || dim == self.y || dim == self.yp1
    }

    /// The other variant (center <-> corner) of a horizontal dimension.
    pub fn counterpart(&self, dim: &str) -> Option<&str> {
        if dim == self.x {
            Some(&self.xp1)
        } else if dim == self.xp1 {
            Some(&self.x)
        } else if dim == self.y {
            Some(&self.yp1)
        } else if dim == self.yp1 {
            Some(&self.y)
        } else {
            None
        }
    }
}

/// Settings shared by every rearrangement.
#[derive(Debug, Clone)]
pub struct RearrangeConfig {
    /// Horizontal dimension names.
    pub axes: AxisNames,
    /// Name of the per-face axis.
    pub face_dim: String,
    /// Attribute key holding a variable's mate.
    pub mate_attr: String,
    /// Vector/metric variable pairs.
    pub mate_pairs: Vec<(String, String)>,
    /// Variables that are never sign-flipped.
    pub unsigned_metrics: BTreeSet<String>,
}

impl Default for RearrangeConfig {
    fn default() -> Self {
        Self {
            axes: AxisNames::default(),
            face_dim: "face".to_string(),
            mate_attr: "mates".to_string(),
            mate_pairs: DEFAULT_MATE_PAIRS
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
            unsigned_metrics: DEFAULT_UNSIGNED_METRICS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl RearrangeConfig {
    /// Load configuration from environment variables.
    ///
    /// `LLC_UNSIGNED_METRICS` replaces the unsigned-metric set with a
    /// comma-separated list; `LLC_FACE_DIM` renames the face axis.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("LLC_UNSIGNED_METRICS") {
            config.unsigned_metrics = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Ok(val) = std::env::var("LLC_FACE_DIM") {
            if !val.trim().is_empty() {
                config.face_dim = val.trim().to_string();
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let axes = [&self.axes.x, &self.axes.xp1, &self.axes.y, &self.axes.yp1];
        let unique: BTreeSet<&String> = axes.iter().copied().collect();
        if unique.len() != axes.len() {
            return Err(MosaicError::InvalidConfig(
                "horizontal axis names must be distinct".to_string(),
            ));
        }
        if axes.iter().any(|a| **a == self.face_dim) {
            return Err(MosaicError::InvalidConfig(
                "face axis cannot share a name with a horizontal axis".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        for (a, b) in &self.mate_pairs {
            if a == b {
                return Err(MosaicError::InvalidConfig(format!(
                    "'{}' cannot be its own mate",
                    a
                )));
            }
            if !seen.insert(a.as_str()) || !seen.insert(b.as_str()) {
                return Err(MosaicError::InvalidConfig(format!(
                    "variable listed in more than one mate pair: {} / {}",
                    a, b
                )));
            }
        }

        Ok(())
    }

    /// Check whether a variable is an unsigned metric.
    pub fn is_unsigned_metric(&self, name: &str) -> bool {
        self.unsigned_metrics.contains(name)
    }
}
