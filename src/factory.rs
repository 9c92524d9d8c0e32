//! Builds regions from records and turns them back into records.

use std::str::FromStr;

use serde_yaml::{Mapping, Value};

use crate::codec::{self, fields, int_or, int_value, string_field};
use crate::error::DecodeError;
use crate::types::{Cuboid, Geometry, Polygon, Region, RegionKind};

/// A decoded region together with the parent id its record declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Built {
    pub region: Region,
    pub parent: Option<String>,
}

fn geometry(kind: RegionKind, record: &Mapping) -> Result<Geometry, DecodeError> {
    match kind {
        RegionKind::Cuboid => {
            let pt1 = codec::vector::decode3(record.get(fields::PT1))?;
            let pt2 = codec::vector::decode3(record.get(fields::PT2))?;
            Ok(Cuboid::new(pt1, pt2).into())
        }
        RegionKind::Polygon => {
            let min_y = int_or(record, fields::MIN_Y, Polygon::DEFAULT_MIN_Y);
            let max_y = int_or(record, fields::MAX_Y, Polygon::DEFAULT_MAX_Y);
            let Some(points) = record.get(fields::POINTS).and_then(Value::as_sequence) else {
                return Err(DecodeError::incomplete("points expected, not defined"));
            };
            let points = points
                .iter()
                .map(|point| codec::vector::decode2(Some(point)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Polygon::new(points, min_y, max_y)?.into())
        }
    }
}

/// Build one region from its record.
///
/// Fails with [`DecodeError::UnknownType`] when `type` is missing or not a
/// known kind, and with [`DecodeError::IncompleteData`] when the geometry
/// fields are missing or malformed. Everything else has a default.
pub fn build(id: &str, record: &Mapping) -> Result<Built, DecodeError> {
    let declared = string_field(record, fields::TYPE).unwrap_or_default();
    let kind = RegionKind::from_str(declared)
        .map_err(|_| DecodeError::UnknownType(declared.to_string()))?;

    let mut region = Region::new(id, geometry(kind, record)?);
    region.set_priority(int_or(record, fields::PRIORITY, 0));
    region.set_flags(codec::flags::decode(record.get(fields::FLAGS)));
    region.set_owners(codec::domain::decode(record.get(fields::OWNERS)));
    region.set_members(codec::domain::decode(record.get(fields::MEMBERS)));
    region.set_enter_message(string_field(record, fields::GREETING).map(str::to_string));
    region.set_leave_message(string_field(record, fields::FAREWELL).map(str::to_string));

    let parent = string_field(record, fields::PARENT)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    Ok(Built { region, parent })
}

/// Encode every field of a region, including its attached parent.
pub fn encode(region: &Region) -> Mapping {
    let mut record = Mapping::new();
    let mut put = |key: &str, value: Value| {
        record.insert(Value::String(key.to_string()), value);
    };

    put(fields::TYPE, Value::String(region.kind().to_string()));
    match region.geometry() {
        Geometry::Cuboid(cuboid) => {
            put(fields::PT1, codec::vector::encode3(cuboid.min()));
            put(fields::PT2, codec::vector::encode3(cuboid.max()));
        }
        Geometry::Polygon(polygon) => {
            let points = polygon
                .points()
                .iter()
                .map(|p| codec::vector::encode2(*p))
                .collect();
            put(fields::POINTS, Value::Sequence(points));
            put(fields::MIN_Y, int_value(polygon.min_y()));
            put(fields::MAX_Y, int_value(polygon.max_y()));
        }
    }
    put(fields::PRIORITY, int_value(region.priority()));
    put(fields::FLAGS, codec::flags::encode(region.flags()));
    put(fields::OWNERS, codec::domain::encode(region.owners()));
    put(fields::MEMBERS, codec::domain::encode(region.members()));
    if let Some(greeting) = region.enter_message() {
        put(fields::GREETING, Value::String(greeting.to_string()));
    }
    if let Some(farewell) = region.leave_message() {
        put(fields::FAREWELL, Value::String(farewell.to_string()));
    }
    if let Some(parent) = region.parent() {
        put(fields::PARENT, Value::String(parent.to_string()));
    }
    record
}
