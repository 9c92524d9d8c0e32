use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use super::*;
use crate::diagnostics::CollectingSink;
use crate::traits::RegionManager;
use crate::types::{Region, RegionSet};


const TEST_REGIONS: &str = r#"
spawn: {type: cuboid, pt1: [-10, 0, -10], pt2: [10, 128, 10], priority: 10,
        flags: ['-b', '+p'], owners: {owners: [alice], groups: [admins]},
        greeting: 'Welcome to spawn', farewell: 'Leaving spawn'}
market: {type: polygon, points: [[0, 0], [20, 0], [20, 20], [0, 20]], min-y: 60, max-y: 90,
         parent: spawn, member: {owners: [bob, carol], groups: [traders]}}
stall: {type: cuboid, pt1: [5, 60, 5], pt2: [1, 70, 1], parent: market, flags: ['+T_']}
"#;

/// A scratch directory holding a `regions.yml` with `contents`.
fn db_with(contents: &str) -> (TempDir, RegionDatabase, Arc<CollectingSink>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regions.yml");
    fs::write(&path, contents).unwrap();
    let sink = Arc::new(CollectingSink::default());
    let db = RegionDatabase::with_sink(&path, sink.clone());
    (dir, db, sink)
}

fn parent_of(regions: &RegionSet, id: &str) -> Option<String> {
    regions.get(id).and_then(Region::parent).map(str::to_string)
}

#[derive(Default)]
struct MemoryManager {
    regions: RegionSet,
}

impl RegionManager for MemoryManager {
    fn set_regions(&mut self, regions: RegionSet) {
        self.regions = regions;
    }

    fn regions(&self) -> RegionSet {
        self.regions.clone()
    }
}
