use crate::types::RegionSet;

/// The live region manager a database loads into and saves from.
///
/// The manager owns spatial lookups and overlap resolution; the database
/// only hands whole region sets across.
pub trait RegionManager {
    /// Replace every region the manager knows about.
    fn set_regions(&mut self, regions: RegionSet);

    /// Snapshot of the manager's current regions.
    fn regions(&self) -> RegionSet;
}
