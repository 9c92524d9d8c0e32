//! Block vectors as fixed-length integer lists: `[x, y, z]` and `[x, z]`.

use serde_yaml::Value;

use crate::error::DecodeError;
use crate::types::{BlockVector, BlockVector2D};

use super::{as_i32, int_value};

fn integers<const N: usize>(value: Option<&Value>) -> Result<[i32; N], DecodeError> {
    let Some(list) = value.and_then(Value::as_sequence) else {
        return Err(DecodeError::incomplete("vector expected, not defined"));
    };
    if list.len() != N {
        return Err(DecodeError::incomplete(format!(
            "{N}d vector expected, list not {N} elements"
        )));
    }
    let mut out = [0; N];
    for (slot, item) in out.iter_mut().zip(list) {
        *slot = as_i32(item).ok_or_else(|| {
            DecodeError::incomplete(format!("{N}d vector expected, expected {N} numbers"))
        })?;
    }
    Ok(out)
}

/// Decode `[x, y, z]`. An absent value is an error.
pub fn decode3(value: Option<&Value>) -> Result<BlockVector, DecodeError> {
    let [x, y, z] = integers::<3>(value)?;
    Ok(BlockVector::new(x, y, z))
}

/// Decode `[x, z]`. An absent value is an error.
pub fn decode2(value: Option<&Value>) -> Result<BlockVector2D, DecodeError> {
    let [x, z] = integers::<2>(value)?;
    Ok(BlockVector2D::new(x, z))
}

pub fn encode3(vector: BlockVector) -> Value {
    Value::Sequence(vec![
        int_value(vector.x),
        int_value(vector.y),
        int_value(vector.z),
    ])
}

pub fn encode2(vector: BlockVector2D) -> Value {
    Value::Sequence(vec![int_value(vector.x), int_value(vector.z)])
}
