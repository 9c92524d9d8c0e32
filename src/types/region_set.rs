//! Id-indexed arena of regions.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::error::LinkError;

use super::region::Region;

/// The regions of one database, keyed by id.
///
/// Parent edges are stored as ids on each region and always form a forest.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct RegionSet {
    regions: BTreeMap<String, Region>,
}

impl RegionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a region, replacing any region with the same id.
    ///
    /// The inserted region enters parentless; use [`RegionSet::set_parent`]
    /// to link it. Children of a replaced region stay attached to the id.
    pub fn insert(&mut self, mut region: Region) -> Option<Region> {
        region.set_parent_id(None);
        self.regions.insert(region.id().to_string(), region)
    }

    /// Remove a region. Its children become parentless.
    pub fn remove(&mut self, id: &str) -> Option<Region> {
        let removed = self.regions.remove(id)?;
        for region in self.regions.values_mut() {
            if region.parent() == Some(id) {
                region.set_parent_id(None);
            }
        }
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.get(id)
    }

    /// Mutable access to a region's attributes. The parent edge is not
    /// reachable this way.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Region> {
        self.regions.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.regions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Regions ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    /// Attach `child` to `parent`, or detach it when `parent` is `None`.
    ///
    /// Fails if either region is unknown, or if `child` is already an
    /// ancestor of `parent`.
    pub fn set_parent(&mut self, child: &str, parent: Option<&str>) -> Result<(), LinkError> {
        if !self.contains(child) {
            return Err(LinkError::UnknownRegion(child.to_string()));
        }
        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(LinkError::UnknownRegion(parent.to_string()));
            }
            if parent == child || self.ancestors(parent).any(|a| a.id() == child) {
                return Err(LinkError::CircularInheritance {
                    child: child.to_string(),
                    parent: parent.to_string(),
                });
            }
        }
        if let Some(region) = self.regions.get_mut(child) {
            region.set_parent_id(parent.map(str::to_string));
        }
        Ok(())
    }

    /// Walk the attached parent chain of `id`, nearest ancestor first.
    pub fn ancestors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Region> + 'a {
        let mut seen = HashSet::new();
        let mut cursor = self.get(id).and_then(Region::parent);
        std::iter::from_fn(move || {
            let current = self.get(cursor?)?;
            if !seen.insert(current.id()) {
                return None;
            }
            cursor = current.parent();
            Some(current)
        })
    }

    /// Ids of the regions directly attached to `id`.
    pub fn children<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.iter()
            .filter(move |r| r.parent() == Some(id))
            .map(Region::id)
    }

    /// Check that no parent chain loops back on itself.
    pub fn is_acyclic(&self) -> bool {
        self.iter().all(|region| {
            let mut seen = HashSet::from([region.id()]);
            let mut cursor = region.parent();
            while let Some(id) = cursor {
                if !seen.insert(id) {
                    return false;
                }
                cursor = self.get(id).and_then(Region::parent);
            }
            true
        })
    }
}

impl FromIterator<Region> for RegionSet {
    fn from_iter<T: IntoIterator<Item = Region>>(iter: T) -> Self {
        let mut set = RegionSet::new();
        for region in iter {
            set.insert(region);
        }
        set
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a Region;
    type IntoIter = std::collections::btree_map::Values<'a, String, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.values()
    }
}
