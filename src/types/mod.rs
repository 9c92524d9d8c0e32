//! Data model of the region database.
//!
//! A [`RegionSet`] is an id-indexed arena of [`Region`]s. Each region carries
//! a closed [`Geometry`] (cuboid or polygon), a [`Flags`] table, owner and
//! member [`Domain`]s, optional greeting/farewell messages and at most one
//! parent, referenced by id.

mod domain;
mod flags;
mod region;
mod region_set;
mod vector;

pub use domain::Domain;
pub use flags::{FlagKey, FlagState, Flags};
pub use region::{Cuboid, Geometry, Polygon, Region, RegionKind};
pub use region_set::RegionSet;
pub use vector::{BlockVector, BlockVector2D};
