//! Integer block coordinates.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;

/// A block position in three dimensions.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub struct BlockVector {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockVector {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        BlockVector { x, y, z }
    }

    /// Component-wise minimum of two vectors.
    pub fn minimum(self, other: Self) -> Self {
        BlockVector::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    /// Component-wise maximum of two vectors.
    pub fn maximum(self, other: Self) -> Self {
        BlockVector::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }
}

impl From<(i32, i32, i32)> for BlockVector {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        BlockVector::new(x, y, z)
    }
}

impl Display for BlockVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A block column position, the x/z plane.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub struct BlockVector2D {
    pub x: i32,
    pub z: i32,
}

impl BlockVector2D {
    pub const fn new(x: i32, z: i32) -> Self {
        BlockVector2D { x, z }
    }
}

impl From<(i32, i32)> for BlockVector2D {
    fn from((x, z): (i32, i32)) -> Self {
        BlockVector2D::new(x, z)
    }
}

impl Display for BlockVector2D {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "({}, {})", self.x, self.z)
    }
}
