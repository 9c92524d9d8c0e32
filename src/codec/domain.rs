use serde_yaml::{Mapping, Value};

use crate::types::Domain;

use super::fields::{DOMAIN_GROUPS, DOMAIN_PLAYERS};

fn names<'a>(record: &'a Mapping, key: &str) -> impl Iterator<Item = &'a str> {
    record
        .get(key)
        .and_then(Value::as_sequence)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

/// Decode `{owners: [...], groups: [...]}`. Missing pieces are empty.
pub fn decode(value: Option<&Value>) -> Domain {
    let mut domain = Domain::new();
    let Some(record) = value.and_then(Value::as_mapping) else {
        return domain;
    };
    for player in names(record, DOMAIN_PLAYERS) {
        domain.add_player(player);
    }
    for group in names(record, DOMAIN_GROUPS) {
        domain.add_group(group);
    }
    domain
}

fn list<'a>(names: impl Iterator<Item = &'a str>) -> Value {
    Value::Sequence(names.map(|n| Value::String(n.to_string())).collect())
}

pub fn encode(domain: &Domain) -> Value {
    let mut record = Mapping::new();
    record.insert(DOMAIN_PLAYERS.into(), list(domain.players()));
    record.insert(DOMAIN_GROUPS.into(), list(domain.groups()));
    Value::Mapping(record)
}
