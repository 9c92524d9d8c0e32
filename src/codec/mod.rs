//! Conversions between YAML values and model types.
//!
//! Readers here never see text: the document layer hands them
//! [`serde_yaml::Value`] trees, and the encoders produce trees that the
//! document layer serializes.

pub mod domain;
pub mod flags;
pub mod vector;

use serde_yaml::{Mapping, Value};

/// Field names of a region record.
pub mod fields {
    pub const TYPE: &str = "type";
    pub const PT1: &str = "pt1";
    pub const PT2: &str = "pt2";
    pub const POINTS: &str = "points";
    pub const MIN_Y: &str = "min-y";
    pub const MAX_Y: &str = "max-y";
    pub const PARENT: &str = "parent";
    pub const PRIORITY: &str = "priority";
    pub const FLAGS: &str = "flags";
    pub const OWNERS: &str = "owners";
    /// Members are stored under the singular name.
    pub const MEMBERS: &str = "member";
    pub const GREETING: &str = "greeting";
    pub const FAREWELL: &str = "farewell";

    /// Individual identities inside a domain record.
    pub const DOMAIN_PLAYERS: &str = "owners";
    /// Group identities inside a domain record.
    pub const DOMAIN_GROUPS: &str = "groups";
}

/// Read an integer that fits in `i32`.
pub(crate) fn as_i32(value: &Value) -> Option<i32> {
    value.as_i64().and_then(|n| i32::try_from(n).ok())
}

/// Read an integer field, falling back to `default` when it is absent or
/// not an integer.
pub(crate) fn int_or(record: &Mapping, key: &str, default: i32) -> i32 {
    record.get(key).and_then(as_i32).unwrap_or(default)
}

/// Read a string field. Non-string values count as absent.
pub(crate) fn string_field<'a>(record: &'a Mapping, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

pub(crate) fn int_value(n: i32) -> Value {
    Value::Number(n.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> Mapping {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_int_or() {
        let rec = record("{priority: 5, big: 9999999999, text: abc, float: 1.5}");
        assert_eq!(int_or(&rec, "priority", 0), 5);
        assert_eq!(int_or(&rec, "missing", 128), 128);
        assert_eq!(int_or(&rec, "big", 0), 0);
        assert_eq!(int_or(&rec, "text", 3), 3);
        assert_eq!(int_or(&rec, "float", 3), 3);
    }

    #[test]
    fn test_string_field() {
        let rec = record("{greeting: hello, number: 4}");
        assert_eq!(string_field(&rec, "greeting"), Some("hello"));
        assert_eq!(string_field(&rec, "number"), None);
        assert_eq!(string_field(&rec, "missing"), None);
    }
}
