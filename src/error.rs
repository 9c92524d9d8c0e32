use std::path::PathBuf;

use thiserror::Error;

use crate::types::RegionSet;

/// Hard failures of a load or save call. Everything else is recovered
/// locally and reported as a [`crate::Diagnostic`].
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("failed to access region database {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse region database {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to encode region database: {0}")]
    Encode(String),

    #[error("Poisoned lock error: {0}")]
    PoisonedLock(String),
}

/// Why a single record could not be turned into a region.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("incomplete data: {0}")]
    IncompleteData(String),

    #[error("unknown region type: '{0}'")]
    UnknownType(String),
}

impl DecodeError {
    pub(crate) fn incomplete(msg: impl Into<String>) -> Self {
        DecodeError::IncompleteData(msg.into())
    }
}

/// Rejected edits to the parent graph of a [`RegionSet`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("unknown region: '{0}'")]
    UnknownRegion(String),

    #[error("circular inheritance: '{parent}' cannot become the parent of '{child}'")]
    CircularInheritance { child: String, parent: String },
}

impl From<std::sync::PoisonError<std::sync::RwLockReadGuard<'_, RegionSet>>> for DatabaseError {
    fn from(err: std::sync::PoisonError<std::sync::RwLockReadGuard<'_, RegionSet>>) -> Self {
        DatabaseError::PoisonedLock(err.to_string())
    }
}

impl From<std::sync::PoisonError<std::sync::RwLockWriteGuard<'_, RegionSet>>> for DatabaseError {
    fn from(err: std::sync::PoisonError<std::sync::RwLockWriteGuard<'_, RegionSet>>) -> Self {
        DatabaseError::PoisonedLock(err.to_string())
    }
}

impl From<std::sync::PoisonError<std::sync::MutexGuard<'_, ()>>> for DatabaseError {
    fn from(err: std::sync::PoisonError<std::sync::MutexGuard<'_, ()>>) -> Self {
        DatabaseError::PoisonedLock(err.to_string())
    }
}
