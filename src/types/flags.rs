//! Permission flags attached to a region.
//!
//! A flag key is either a single character (`b`, `p`, ...) or a two character
//! key containing an underscore (`T_`, `_c`). Each key is ALLOW, DENY or
//! UNSET; UNSET is the absence of an entry and means "inherit or default".

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use itertools::Itertools;
use serde::Serialize;
use strum_macros::{AsRefStr, Display as StrumDisplay};

/// The key of a permission flag.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct FlagKey(String);

impl FlagKey {
    /// Validate a flag key. Returns `None` for shapes the wire format
    /// cannot express.
    pub fn new(key: &str) -> Option<Self> {
        let chars: Vec<char> = key.chars().collect();
        let valid = match chars.as_slice() {
            [c] => *c != '_',
            [a, b] => *a == '_' || *b == '_',
            _ => false,
        };
        valid.then(|| FlagKey(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for FlagKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlagKey::new(s).ok_or_else(|| format!("Invalid flag key: '{s}'"))
    }
}

impl Display for FlagKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// The state of a single flag.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default, AsRefStr, StrumDisplay)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum FlagState {
    Allow,
    Deny,
    #[default]
    Unset,
}

/// Flag table of a region. Only ALLOW and DENY entries are stored.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Flags(BTreeMap<FlagKey, FlagState>);

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of `key`; unknown and invalid keys are UNSET.
    pub fn get(&self, key: &str) -> FlagState {
        FlagKey::new(key)
            .and_then(|k| self.0.get(&k).copied())
            .unwrap_or(FlagState::Unset)
    }

    /// Set `key` to `state`. Setting UNSET removes the entry.
    pub fn set(&mut self, key: FlagKey, state: FlagState) {
        match state {
            FlagState::Unset => {
                self.0.remove(&key);
            }
            state => {
                self.0.insert(key, state);
            }
        }
    }

    /// Iterate over the flags that are not UNSET, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&FlagKey, FlagState)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Display for Flags {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let tokens = self.iter().map(|(key, state)| match state {
            FlagState::Allow => format!("+{key}"),
            _ => format!("-{key}"),
        });
        write!(f, "[{}]", tokens.format(", "))
    }
}
