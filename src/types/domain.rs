//! Owner and member lists of a region.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

use itertools::Itertools;
use serde::Serialize;

/// A set of individual identities plus a set of group identities.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct Domain {
    players: BTreeSet<String>,
    groups: BTreeSet<String>,
}

impl Domain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an individual identity. Returns `false` if it was already present.
    pub fn add_player(&mut self, name: impl Into<String>) -> bool {
        self.players.insert(name.into())
    }

    /// Add a group identity. Returns `false` if it was already present.
    pub fn add_group(&mut self, name: impl Into<String>) -> bool {
        self.groups.insert(name.into())
    }

    pub fn remove_player(&mut self, name: &str) -> bool {
        self.players.remove(name)
    }

    pub fn remove_group(&mut self, name: &str) -> bool {
        self.groups.remove(name)
    }

    pub fn contains_player(&self, name: &str) -> bool {
        self.players.contains(name)
    }

    pub fn contains_group(&self, name: &str) -> bool {
        self.groups.contains(name)
    }

    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.players.iter().map(String::as_str)
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.groups.is_empty()
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let groups = self.groups().map(|g| format!("g:{g}"));
        write!(f, "{}", self.players().map(str::to_string).chain(groups).join(", "))
    }
}
