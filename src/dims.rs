//! Axis-role lookup for a variable's dimensions.

use std::fmt;

use crate::error::{MosaicError, Result};

/// Semantic role of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Zonal (fastest varying) axis.
    X,
    /// Meridional axis.
    Y,
    /// Vertical axis.
    Z,
    /// Time axis.
    T,
}

impl Role {
    /// Position of the role in the reversed dimension tuple.
    fn position(self) -> usize {
        match self {
            Role::X => 0,
            Role::Y => 1,
            Role::Z => 2,
            Role::T => 3,
        }
    }

    /// Single-letter symbol.
    pub fn symbol(self) -> char {
        match self {
            Role::X => 'X',
            Role::Y => 'Y',
            Role::Z => 'Z',
            Role::T => 'T',
        }
    }
}

/// Read-only view of a variable's dimension names by role.
///
/// Built from the storage-order names with the face axis removed; the
/// tuple is reversed so X comes first. The names cannot be reassigned:
///
/// ```compile_fail
/// use llc_mosaic::dims::Dims;
/// let mut dims = Dims::from_storage(&["Y", "X"], "face");
/// dims.names = vec![];
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dims {
    names: Vec<String>,
}

impl Dims {
    /// Build from storage-order dimension names, skipping `face_dim`.
    pub fn from_storage<S: AsRef<str>>(storage: &[S], face_dim: &str) -> Self {
        let names = storage
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| *s != face_dim)
            .rev()
            .map(str::to_string)
            .collect();
        Self { names }
    }

    /// Name at a role, if the variable has that many axes.
    pub fn get(&self, role: Role) -> Option<&str> {
        self.names.get(role.position()).map(String::as_str)
    }

    fn require(&self, role: Role) -> Result<&str> {
        self.get(role).ok_or_else(|| MosaicError::MissingAxis {
            role: role.symbol(),
            dims: self.names.clone(),
        })
    }

    /// X-like axis name.
    pub fn x(&self) -> Result<&str> {
        self.require(Role::X)
    }

    /// Y-like axis name.
    pub fn y(&self) -> Result<&str> {
        self.require(Role::Y)
    }

    /// Z-like axis name.
    pub fn z(&self) -> Result<&str> {
        self.require(Role::Z)
    }

    /// Time axis name.
    pub fn t(&self) -> Result<&str> {
        self.require(Role::T)
    }

    /// Names in reversed (X-first) order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of non-face axes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when no axis remains.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_by_position() {
        let dims = Dims::from_storage(&["time", "Z", "face", "Yp1", "X"], "face");
        assert_eq!(dims.x().unwrap(), "X");
        assert_eq!(dims.y().unwrap(), "Yp1");
        assert_eq!(dims.z().unwrap(), "Z");
        assert_eq!(dims.t().unwrap(), "time");
        assert_eq!(dims.len(), 4);
    }

    #[test]
    fn test_missing_role_fails() {
        let dims = Dims::from_storage(&["face", "Y", "X"], "face");
        assert!(matches!(
            dims.z(),
            Err(MosaicError::MissingAxis { role: 'Z', .. })
        ));
        assert_eq!(dims.to_string(), "(X, Y)");
    }
}
