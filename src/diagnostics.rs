//! Recoverable conditions met while loading a region database.
//!
//! A load never aborts because of a single bad record or link. Each such
//! condition becomes a [`Diagnostic`], handed to the [`DiagnosticSink`] the
//! database was built with and returned in the [`crate::LoadReport`].
//!
//! The default sink, [`TracingSink`], forwards diagnostics to [`tracing`].
//! Tests and embedders that want to inspect them use [`CollectingSink`]:
//!
//! ```rust
//! use std::sync::Arc;
//! use regiondb::{CollectingSink, RegionDatabase};
//!
//! let sink = Arc::new(CollectingSink::default());
//! let db = RegionDatabase::with_sink("regions.yml", sink.clone());
//! # let _ = db;
//! assert!(sink.diagnostics().is_empty());
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;
use tracing::warn;

/// A condition that was recovered from while loading.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "diagnostic", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The document root is not a mapping; nothing was loaded.
    NotAMapping { path: PathBuf },
    /// A record had missing or malformed geometry and was skipped.
    BadRegion { id: String, reason: String },
    /// A record had an unrecognized `type` and was skipped.
    UnknownType { id: String, kind: String },
    /// A declared parent does not exist; the region stays parentless.
    UnknownParent { id: String, parent: String },
    /// Attaching the declared parent would close a cycle; the region stays
    /// parentless.
    CircularInheritance { id: String, parent: String },
}

impl Diagnostic {
    /// The region the diagnostic is about, if any.
    pub fn region_id(&self) -> Option<&str> {
        match self {
            Diagnostic::NotAMapping { .. } => None,
            Diagnostic::BadRegion { id, .. }
            | Diagnostic::UnknownType { id, .. }
            | Diagnostic::UnknownParent { id, .. }
            | Diagnostic::CircularInheritance { id, .. } => Some(id),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Diagnostic::NotAMapping { path } => write!(
                f,
                "failed to read region database from {}: root node is not a mapping",
                path.display()
            ),
            Diagnostic::BadRegion { id, reason } => {
                write!(f, "bad region definition '{id}': {reason}")
            }
            Diagnostic::UnknownType { id, kind } => {
                write!(f, "unknown region type '{kind}' for '{id}'")
            }
            Diagnostic::UnknownParent { id, parent } => {
                write!(f, "unknown region parent '{parent}' for '{id}'")
            }
            Diagnostic::CircularInheritance { id, parent } => write!(
                f,
                "circular inheritance detected with '{parent}' as the parent of '{id}'"
            ),
        }
    }
}

/// Receiver of load diagnostics. Must be usable from any thread.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

/// Emits each diagnostic as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        warn!(
            event = "Load",
            phase = "Diagnostic",
            region = diagnostic.region_id().unwrap_or_default(),
            "{diagnostic}"
        );
    }
}

/// Keeps every diagnostic in memory, in report order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    collected: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Snapshot of the diagnostics collected so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.collected
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Drain the diagnostics collected so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        match self.collected.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        match self.collected.lock() {
            Ok(mut guard) => guard.push(diagnostic.clone()),
            Err(poisoned) => poisoned.into_inner().push(diagnostic.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_keeps_order() {
        let sink = CollectingSink::default();
        sink.report(&Diagnostic::UnknownParent {
            id: "a".into(),
            parent: "x".into(),
        });
        sink.report(&Diagnostic::BadRegion {
            id: "b".into(),
            reason: "vector expected, not defined".into(),
        });
        let ids: Vec<_> = sink
            .diagnostics()
            .iter()
            .map(|d| d.region_id().map(str::to_string))
            .collect();
        assert_eq!(ids, vec![Some("a".to_string()), Some("b".to_string())]);

        assert_eq!(sink.take().len(), 2);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::CircularInheritance {
            id: "a".into(),
            parent: "b".into(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "circular inheritance detected with 'b' as the parent of 'a'"
        );
        let structural = Diagnostic::NotAMapping {
            path: PathBuf::from("regions.yml"),
        };
        assert_eq!(structural.region_id(), None);
        assert!(structural.to_string().contains("not a mapping"));
    }

    #[test]
    fn test_tracing_sink_does_not_panic_without_subscriber() {
        TracingSink.report(&Diagnostic::UnknownType {
            id: "a".into(),
            kind: "sphere".into(),
        });
    }

    #[test]
    fn test_serialize() {
        let diagnostic = Diagnostic::UnknownType {
            id: "zone".into(),
            kind: "sphere".into(),
        };
        insta::assert_json_snapshot!(diagnostic, @r#"
        {
          "diagnostic": "unknown_type",
          "id": "zone",
          "kind": "sphere"
        }
        "#);
    }
}
