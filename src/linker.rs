//! Second pass of a load: turns declared parent ids into parent edges.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::types::RegionSet;

/// A parent declared by a record, waiting to be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLink {
    pub id: String,
    pub parent: String,
}

/// Does following declared parents upward from `candidate` reach `child`?
///
/// The chain follows each region's declared parent, so a cycle is seen from
/// every one of its members, whatever order the links are processed in. The
/// walk stops at a root, at an unknown id, or on the first repeated id.
fn reaches(child: &str, candidate: &str, declared: &HashMap<&str, &str>, set: &RegionSet) -> bool {
    let mut seen = HashSet::new();
    let mut cursor = Some(candidate);
    while let Some(id) = cursor {
        if id == child {
            return true;
        }
        if !seen.insert(id) {
            return false;
        }
        cursor = declared.get(id).copied().filter(|p| set.contains(p));
    }
    false
}

/// Attach each pending link, in order, unless its parent is unknown or the
/// link is part of a cycle. Returns one diagnostic per rejected link.
pub fn link(set: &mut RegionSet, pending: &[PendingLink]) -> Vec<Diagnostic> {
    let declared: HashMap<&str, &str> = pending
        .iter()
        .map(|link| (link.id.as_str(), link.parent.as_str()))
        .collect();

    let mut diagnostics = Vec::new();
    let mut accepted = Vec::new();
    for link in pending {
        if !set.contains(&link.parent) {
            diagnostics.push(Diagnostic::UnknownParent {
                id: link.id.clone(),
                parent: link.parent.clone(),
            });
        } else if reaches(&link.id, &link.parent, &declared, set) {
            diagnostics.push(Diagnostic::CircularInheritance {
                id: link.id.clone(),
                parent: link.parent.clone(),
            });
        } else {
            accepted.push(link);
        }
    }

    for link in accepted {
        // Accepted links never lie on a declared cycle, so the attached
        // graph stays a forest and this cannot fail.
        if let Err(err) = set.set_parent(&link.id, Some(&link.parent)) {
            debug!(event = "Load", phase = "Link", id = %link.id, error = %err);
            diagnostics.push(Diagnostic::CircularInheritance {
                id: link.id.clone(),
                parent: link.parent.clone(),
            });
        }
    }
    diagnostics
}
