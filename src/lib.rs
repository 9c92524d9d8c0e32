//! Persistence for protected regions.
//!
//! A region database is a YAML mapping from region id to region record.
//! [`RegionDatabase`] loads it into a [`RegionSet`], skipping and reporting
//! malformed records, linking declared parents and refusing inheritance
//! cycles; it saves a set back with every field and an atomic file replace.
//!
//! ```rust
//! # fn main() -> Result<(), regiondb::DatabaseError> {
//! # let dir = tempfile::tempdir().unwrap();
//! # let path = dir.path().join("regions.yml");
//! # std::fs::write(&path, "spawn: {type: cuboid, pt1: [0, 0, 0], pt2: [9, 9, 9]}").unwrap();
//! use regiondb::RegionDatabase;
//!
//! let db = RegionDatabase::new(&path);
//! let report = db.load()?;
//! assert!(report.published);
//! assert!(db.regions()?.contains("spawn"));
//! db.save()?;
//! # Ok(())
//! # }
//! ```

pub use database::{LoadReport, RegionDatabase};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink};
pub use error::{DatabaseError, DecodeError, LinkError};
pub use factory::Built;
pub use linker::PendingLink;
pub use loader::{Decoded, decode_regions, encode_regions};
pub use traits::RegionManager;
pub use types::*;

pub mod codec;
mod database;
mod diagnostics;
mod error;
pub mod factory;
pub mod linker;
mod loader;
mod traits;
mod types;
