use std::fmt;

use serde::de::{self, Deserialize, Deserializer, EnumAccess, IgnoredAny, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Number, Value};
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::error::DecodeError;
use crate::factory;
use crate::linker::{self, PendingLink};
use crate::types::RegionSet;

/// A YAML value whose mappings keep the last of any repeated keys.
struct Lenient(Value);

struct LenientVisitor;

impl<'de> Visitor<'de> for LenientVisitor {
    type Value = Lenient;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Lenient, E> {
        Ok(Lenient(Value::Bool(b)))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<Lenient, E> {
        Ok(Lenient(Value::Number(Number::from(n))))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<Lenient, E> {
        Ok(Lenient(Value::Number(Number::from(n))))
    }

    fn visit_f64<E: de::Error>(self, n: f64) -> Result<Lenient, E> {
        Ok(Lenient(Value::Number(Number::from(n))))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Lenient, E> {
        Ok(Lenient(Value::String(s.to_string())))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Lenient, E> {
        Ok(Lenient(Value::String(s)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Lenient, E> {
        Ok(Lenient(Value::Null))
    }

    fn visit_none<E: de::Error>(self) -> Result<Lenient, E> {
        Ok(Lenient(Value::Null))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Lenient, D::Error> {
        Lenient::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Lenient, A::Error> {
        let mut items = Vec::new();
        while let Some(Lenient(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Lenient(Value::Sequence(items)))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Lenient, A::Error> {
        let mut mapping = Mapping::new();
        while let Some((Lenient(key), Lenient(value))) = map.next_entry()? {
            mapping.insert(key, value);
        }
        Ok(Lenient(Value::Mapping(mapping)))
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Lenient, A::Error> {
        let (tag, variant) = data.variant::<String>()?;
        let Lenient(value) = variant.newtype_variant()?;
        Ok(Lenient(Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new(tag),
            value,
        }))))
    }
}

impl<'de> Deserialize<'de> for Lenient {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LenientVisitor)
    }
}

/// Top level of a region document.
///
/// Entries are kept as a list in file order, so a repeated region id reaches
/// the decoder twice instead of failing the whole parse. Repeated keys inside
/// a record keep the last value.
enum RawDocument {
    Entries(Vec<(Value, Value)>),
    NotAMapping,
}

struct RawDocumentVisitor;

impl<'de> Visitor<'de> for RawDocumentVisitor {
    type Value = RawDocument;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of region ids to region records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawDocument, A::Error> {
        let mut entries = Vec::new();
        while let Some((Lenient(key), Lenient(value))) = map.next_entry()? {
            entries.push((key, value));
        }
        Ok(RawDocument::Entries(entries))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawDocument, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(RawDocument::NotAMapping)
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<RawDocument, A::Error> {
        let (IgnoredAny, variant) = data.variant::<IgnoredAny>()?;
        variant.newtype_variant::<IgnoredAny>()?;
        Ok(RawDocument::NotAMapping)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<RawDocument, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_none<E: de::Error>(self) -> Result<RawDocument, E> {
        Ok(RawDocument::NotAMapping)
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawDocument, E> {
        Ok(RawDocument::NotAMapping)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<RawDocument, E> {
        Ok(RawDocument::NotAMapping)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<RawDocument, E> {
        Ok(RawDocument::NotAMapping)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<RawDocument, E> {
        Ok(RawDocument::NotAMapping)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<RawDocument, E> {
        Ok(RawDocument::NotAMapping)
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<RawDocument, E> {
        Ok(RawDocument::NotAMapping)
    }
}

impl<'de> Deserialize<'de> for RawDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawDocumentVisitor)
    }
}

/// Result of decoding a region document.
#[derive(Debug, Default)]
pub struct Decoded {
    /// `None` when the document root is not a mapping.
    pub regions: Option<RegionSet>,
    /// Skipped records and rejected links, in the order they were met.
    pub diagnostics: Vec<Diagnostic>,
}

fn region_id(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn failure(id: String, err: DecodeError) -> Diagnostic {
    match err {
        DecodeError::IncompleteData(reason) => Diagnostic::BadRegion { id, reason },
        DecodeError::UnknownType(kind) => Diagnostic::UnknownType { id, kind },
    }
}

/// Decode region records and link their parents.
///
/// Only text that is not YAML at all is an error. Bad records and bad links
/// are skipped and reported in [`Decoded::diagnostics`].
///
/// Example:
/// ```rust
/// use regiondb::decode_regions;
/// let text = r#"
///     town: {type: cuboid, pt1: [0, 0, 0], pt2: [100, 128, 100]}
///     shop: {type: polygon, points: [[1, 1], [9, 1], [5, 9]], parent: town}
///     broken: {type: cuboid, pt1: [1, 2]}
/// "#;
/// let decoded = decode_regions(text).unwrap();
/// let regions = decoded.regions.unwrap();
/// assert_eq!(regions.len(), 2);
/// assert_eq!(regions.get("shop").unwrap().parent(), Some("town"));
/// assert_eq!(decoded.diagnostics.len(), 1);
/// ```
pub fn decode_regions(text: &str) -> Result<Decoded, serde_yaml::Error> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    // A file holding no YAML document at all has no root node.
    if text
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'))
    {
        return Ok(Decoded::default());
    }
    let RawDocument::Entries(entries) = serde_yaml::from_str::<RawDocument>(text)? else {
        return Ok(Decoded::default());
    };

    let mut regions = RegionSet::new();
    let mut pending: Vec<PendingLink> = Vec::new();
    let mut diagnostics = Vec::new();

    for (key, value) in entries {
        let (Some(id), Value::Mapping(record)) = (region_id(&key), value) else {
            debug!(event = "Load", phase = "Decode", key = ?key, "skipping entry that is not a region record");
            continue;
        };
        match factory::build(&id, &record) {
            Ok(built) => {
                // The replaced record's link goes away with it.
                if regions.insert(built.region).is_some() {
                    pending.retain(|link| link.id != id);
                }
                if let Some(parent) = built.parent {
                    pending.push(PendingLink { id, parent });
                }
            }
            Err(err) => diagnostics.push(failure(id, err)),
        }
    }

    diagnostics.extend(linker::link(&mut regions, &pending));
    Ok(Decoded {
        regions: Some(regions),
        diagnostics,
    })
}

/// Encode a region set as a YAML document, regions ordered by id.
pub fn encode_regions(regions: &RegionSet) -> Result<String, serde_yaml::Error> {
    let mut root = Mapping::new();
    for region in regions {
        root.insert(
            Value::String(region.id().to_string()),
            Value::Mapping(factory::encode(region)),
        );
    }
    serde_yaml::to_string(&Value::Mapping(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockVector, Geometry};

    #[test]
    fn test_decode_regions() {
        let text = r#"
            spawn: {type: cuboid, pt1: [0, 0, 0], pt2: [10, 10, 10], priority: 1}
            garden: {type: polygon, points: [[0, 0], [4, 0], [4, 4]], parent: spawn}
        "#;
        let decoded = decode_regions(text).unwrap();
        assert!(decoded.diagnostics.is_empty());
        let regions = decoded.regions.unwrap();
        assert_eq!(regions.ids().collect::<Vec<_>>(), vec!["garden", "spawn"]);
        assert_eq!(regions.get("garden").unwrap().parent(), Some("spawn"));
    }

    #[test]
    fn test_not_a_mapping() {
        for text in ["", "# nothing here\n\n", "- a\n- b\n", "42", "just text", "~"] {
            let decoded = decode_regions(text).unwrap();
            assert!(decoded.regions.is_none(), "{text:?} should not decode");
        }
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(decode_regions("a: [1, 2\nb: {").is_err());
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let decoded = decode_regions("\u{feff}a: {type: cuboid, pt1: [0,0,0], pt2: [1,1,1]}").unwrap();
        assert_eq!(decoded.regions.unwrap().len(), 1);
    }

    #[test]
    fn test_non_record_entries_are_skipped_silently() {
        let decoded = decode_regions("a: 5\nb: [1, 2]\nc: {type: cuboid, pt1: [0,0,0], pt2: [1,1,1]}\n").unwrap();
        assert!(decoded.diagnostics.is_empty());
        assert_eq!(decoded.regions.unwrap().len(), 1);
    }

    #[test]
    fn test_numeric_ids() {
        let decoded = decode_regions("7: {type: cuboid, pt1: [0,0,0], pt2: [1,1,1]}").unwrap();
        assert!(decoded.regions.unwrap().contains("7"));
    }

    #[test]
    fn test_duplicate_id_later_record_wins() {
        let text = r#"
            zone1: {type: cuboid, pt1: [0, 0, 0], pt2: [1, 1, 1], priority: 1, parent: base}
            base: {type: cuboid, pt1: [0, 0, 0], pt2: [9, 9, 9]}
            zone1: {type: polygon, points: [[1, 1]], priority: 2}
        "#;
        let decoded = decode_regions(text).unwrap();
        assert!(decoded.diagnostics.is_empty());
        let regions = decoded.regions.unwrap();
        assert_eq!(regions.len(), 2);
        let zone = regions.get("zone1").unwrap();
        assert_eq!(zone.priority(), 2);
        assert!(matches!(zone.geometry(), Geometry::Polygon(_)));
        assert_eq!(zone.parent(), None);
    }

    #[test]
    fn test_failed_duplicate_keeps_earlier_record() {
        let text = r#"
            zone1: {type: cuboid, pt1: [0, 0, 0], pt2: [1, 1, 1], priority: 1}
            zone1: {type: cuboid, pt1: [0, 0]}
        "#;
        let decoded = decode_regions(text).unwrap();
        assert_eq!(decoded.diagnostics.len(), 1);
        assert_eq!(decoded.regions.unwrap().get("zone1").unwrap().priority(), 1);
    }

    #[test]
    fn test_repeated_field_keeps_last_value() {
        let text = r#"
            good: {type: cuboid, pt1: [0, 0, 0], pt2: [1, 1, 1]}
            twice: {type: cuboid, pt1: [0, 0, 0], pt1: [1, 1, 1], pt2: [2, 2, 2],
                    owners: {owners: [a], owners: [b]}}
        "#;
        let decoded = decode_regions(text).unwrap();
        assert!(decoded.diagnostics.is_empty());
        let regions = decoded.regions.unwrap();
        assert!(regions.contains("good"));
        let twice = regions.get("twice").unwrap();
        let Geometry::Cuboid(cuboid) = twice.geometry() else {
            panic!("expected a cuboid");
        };
        assert_eq!(cuboid.min(), BlockVector::new(1, 1, 1));
        assert_eq!(twice.owners().players().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_encode_then_decode() {
        let text = r#"
            a: {type: cuboid, pt1: [3, 2, 1], pt2: [-1, -2, -3], flags: ['+b'], greeting: hi}
            b: {type: polygon, points: [[0, 0], [2, 2]], min-y: 5, max-y: 6, parent: a,
                owners: {owners: [alice], groups: [staff]}}
        "#;
        let regions = decode_regions(text).unwrap().regions.unwrap();
        let encoded = encode_regions(&regions).unwrap();
        let again = decode_regions(&encoded).unwrap();
        assert!(again.diagnostics.is_empty());
        assert_eq!(again.regions.unwrap(), regions);
    }
}
