//! Protected regions and their geometry.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;
use strum_macros::{AsRefStr, Display as StrumDisplay, EnumString};

use crate::error::DecodeError;

use super::domain::Domain;
use super::flags::Flags;
use super::vector::{BlockVector, BlockVector2D};

/// Wire discriminator of a region's geometry.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, EnumString, AsRefStr, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    Cuboid,
    Polygon,
}

/// An axis-aligned box. `min <= max` holds component-wise.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Cuboid {
    min: BlockVector,
    max: BlockVector,
}

impl Cuboid {
    /// Build a box from any two opposite corners.
    pub fn new(pt1: BlockVector, pt2: BlockVector) -> Self {
        Cuboid {
            min: pt1.minimum(pt2),
            max: pt1.maximum(pt2),
        }
    }

    pub fn min(&self) -> BlockVector {
        self.min
    }

    pub fn max(&self) -> BlockVector {
        self.max
    }
}

/// A 2D outline extruded between `min_y` and `max_y`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Polygon {
    points: Vec<BlockVector2D>,
    min_y: i32,
    max_y: i32,
}

impl Polygon {
    pub const DEFAULT_MIN_Y: i32 = 0;
    pub const DEFAULT_MAX_Y: i32 = 128;

    /// Build a polygon; the outline needs at least one point.
    pub fn new(points: Vec<BlockVector2D>, min_y: i32, max_y: i32) -> Result<Self, DecodeError> {
        if points.is_empty() {
            return Err(DecodeError::incomplete("polygon expected, no points defined"));
        }
        Ok(Polygon {
            points,
            min_y,
            max_y,
        })
    }

    pub fn points(&self) -> &[BlockVector2D] {
        &self.points
    }

    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    pub fn max_y(&self) -> i32 {
        self.max_y
    }
}

/// Closed set of region shapes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    Cuboid(Cuboid),
    Polygon(Polygon),
}

impl Geometry {
    pub fn kind(&self) -> RegionKind {
        match self {
            Geometry::Cuboid(_) => RegionKind::Cuboid,
            Geometry::Polygon(_) => RegionKind::Polygon,
        }
    }
}

impl From<Cuboid> for Geometry {
    fn from(cuboid: Cuboid) -> Self {
        Geometry::Cuboid(cuboid)
    }
}

impl From<Polygon> for Geometry {
    fn from(polygon: Polygon) -> Self {
        Geometry::Polygon(polygon)
    }
}

/// A named protected region.
///
/// The parent edge is an id reference into the owning
/// [`RegionSet`](super::RegionSet) and can only be changed through it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Region {
    id: String,
    geometry: Geometry,
    priority: i32,
    flags: Flags,
    owners: Domain,
    members: Domain,
    #[serde(skip_serializing_if = "Option::is_none")]
    enter_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    leave_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
}

impl Region {
    pub fn new(id: impl Into<String>, geometry: impl Into<Geometry>) -> Self {
        Region {
            id: id.into(),
            geometry: geometry.into(),
            priority: 0,
            flags: Flags::default(),
            owners: Domain::default(),
            members: Domain::default(),
            enter_message: None,
            leave_message: None,
            parent: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn kind(&self) -> RegionKind {
        self.geometry.kind()
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut Flags {
        &mut self.flags
    }

    pub fn set_flags(&mut self, flags: Flags) {
        self.flags = flags;
    }

    pub fn owners(&self) -> &Domain {
        &self.owners
    }

    pub fn owners_mut(&mut self) -> &mut Domain {
        &mut self.owners
    }

    pub fn set_owners(&mut self, owners: Domain) {
        self.owners = owners;
    }

    pub fn members(&self) -> &Domain {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut Domain {
        &mut self.members
    }

    pub fn set_members(&mut self, members: Domain) {
        self.members = members;
    }

    pub fn enter_message(&self) -> Option<&str> {
        self.enter_message.as_deref()
    }

    pub fn set_enter_message(&mut self, message: Option<String>) {
        self.enter_message = message;
    }

    pub fn leave_message(&self) -> Option<&str> {
        self.leave_message.as_deref()
    }

    pub fn set_leave_message(&mut self, message: Option<String>) {
        self.leave_message = message;
    }

    /// Id of the attached parent, if any.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub(crate) fn set_parent_id(&mut self, parent: Option<String>) {
        self.parent = parent;
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} ({}, priority={})", self.id, self.kind(), self.priority)
    }
}
