use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::DatabaseError;
use crate::loader;
use crate::traits::RegionManager;
use crate::types::RegionSet;

/// Outcome of a [`RegionDatabase::load`] that did not fail outright.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoadReport {
    /// Whether a new region set replaced the published one.
    pub published: bool,
    /// Number of regions in the published set after the load.
    pub regions: usize,
    /// Everything that was skipped or left unlinked.
    pub diagnostics: Vec<Diagnostic>,
}

/// A region database backed by a single YAML file.
///
/// Loads and saves are serialized against each other; readers of
/// [`RegionDatabase::regions`] only ever see a fully linked set.
pub struct RegionDatabase {
    path: PathBuf,
    sink: Arc<dyn DiagnosticSink>,
    io: Mutex<()>,
    regions: RwLock<RegionSet>,
}

impl RegionDatabase {
    /// Database at `path`, reporting diagnostics through `tracing`. No file
    /// is read or written yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_sink(path, Arc::new(TracingSink))
    }

    /// Database at `path`, reporting diagnostics to `sink`.
    pub fn with_sink(path: impl Into<PathBuf>, sink: Arc<dyn DiagnosticSink>) -> Self {
        RegionDatabase {
            path: path.into(),
            sink,
            io: Mutex::new(()),
            regions: RwLock::new(RegionSet::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the published region set.
    pub fn regions(&self) -> Result<RegionSet, DatabaseError> {
        Ok(self.regions.read()?.clone())
    }

    /// Replace the published region set without touching the file.
    pub fn set_regions(&self, regions: RegionSet) -> Result<(), DatabaseError> {
        *self.regions.write()? = regions;
        Ok(())
    }

    /// Read the file, decode and link every region, then publish the result.
    ///
    /// IO and YAML syntax errors are returned and leave the published set
    /// untouched. A document whose root is not a mapping is reported as a
    /// diagnostic and also leaves it untouched.
    pub fn load(&self) -> Result<LoadReport, DatabaseError> {
        let _io = self.io.lock()?;
        self.load_locked().map(|(report, _)| report)
    }

    /// Load under the held io lock. Also returns the set that was published,
    /// or the untouched one when nothing was.
    fn load_locked(&self) -> Result<(LoadReport, RegionSet), DatabaseError> {
        debug!(event = "Load", phase = "Read", path = %self.path.display());

        let text = std::fs::read_to_string(&self.path).map_err(|source| DatabaseError::Io {
            path: self.path.clone(),
            source,
        })?;
        let decoded = loader::decode_regions(&text).map_err(|e| DatabaseError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let mut diagnostics = decoded.diagnostics;
        let Some(regions) = decoded.regions else {
            let diagnostic = Diagnostic::NotAMapping {
                path: self.path.clone(),
            };
            self.sink.report(&diagnostic);
            diagnostics.push(diagnostic);
            let current = self.regions()?;
            let report = LoadReport {
                published: false,
                regions: current.len(),
                diagnostics,
            };
            return Ok((report, current));
        };

        for diagnostic in &diagnostics {
            self.sink.report(diagnostic);
        }

        let count = regions.len();
        *self.regions.write()? = regions.clone();
        info!(
            event = "Load",
            phase = "Publish",
            path = %self.path.display(),
            regions = count,
            skipped = diagnostics.len()
        );

        let report = LoadReport {
            published: true,
            regions: count,
            diagnostics,
        };
        Ok((report, regions))
    }

    /// Write the published region set to the file.
    ///
    /// The document is written to a temporary file next to the target and
    /// renamed over it, so a failed save leaves the old file intact.
    pub fn save(&self) -> Result<(), DatabaseError> {
        let _io = self.io.lock()?;
        self.write_locked()
    }

    /// Load the file and hand the result to `manager`.
    ///
    /// The manager receives the set this load published, even when other
    /// writers replace the published set concurrently.
    pub fn load_into<M: RegionManager + ?Sized>(
        &self,
        manager: &mut M,
    ) -> Result<LoadReport, DatabaseError> {
        let (report, regions) = {
            let _io = self.io.lock()?;
            self.load_locked()?
        };
        manager.set_regions(regions);
        Ok(report)
    }

    /// Take `manager`'s regions as the published set and save them.
    pub fn save_from<M: RegionManager + ?Sized>(&self, manager: &M) -> Result<(), DatabaseError> {
        let _io = self.io.lock()?;
        *self.regions.write()? = manager.regions();
        self.write_locked()
    }

    fn io_error(&self, source: std::io::Error) -> DatabaseError {
        DatabaseError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn write_locked(&self) -> Result<(), DatabaseError> {
        let (text, count) = {
            let regions = self.regions.read()?;
            let text = loader::encode_regions(&regions)
                .map_err(|e| DatabaseError::Encode(e.to_string()))?;
            (text, regions.len())
        };
        debug!(event = "Save", phase = "Encode", path = %self.path.display(), regions = count);

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(text.as_bytes()).map_err(|e| self.io_error(e))?;
        // Keep the mode of the file being replaced.
        if let Ok(existing) = std::fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .map_err(|e| self.io_error(e))?;
        }
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        info!(event = "Save", phase = "Write", path = %self.path.display(), regions = count);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
