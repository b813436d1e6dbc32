//! Object identifiers and the identifier-assignment policy.

use crate::error::{DbError, DbResult};
use crate::record::Record;
use crate::schema::{FieldKind, Schema};
use crate::value::FieldValue;
use schemadb_kv::NamespaceWrite;
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Upper bound for auto-assigned integer identifiers.
///
/// Inverted-sequence kinds assign `MAX_ID - seq` so newer records sort
/// toward the front of iteration order.
pub const MAX_ID: i64 = 2_147_483_647;

/// A record identifier: either an integer or a text string.
///
/// Integer identifiers render as fixed-width ten-digit zero-padded
/// decimal strings so byte-lexicographic key order matches numeric
/// order; text identifiers render verbatim. Equality and hashing
/// operate on the encoded bytes.
#[derive(Debug, Clone)]
pub enum ObjectId {
    /// Integer identifier.
    Int(i64),
    /// Text identifier.
    Text(String),
}

impl ObjectId {
    /// Returns the canonical key encoding of this identifier.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Int(n) => format!("{n:010}").into_bytes(),
            Self::Text(s) => s.clone().into_bytes(),
        }
    }
}

impl PartialEq for ObjectId {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for ObjectId {}

impl Hash for ObjectId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state);
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<i64> for ObjectId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ObjectId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Assigns or validates the identifier for a record being created.
///
/// Auto-assigned identifiers come from the namespace's sequence and are
/// written back into the record's primary field when it has one.
pub(crate) fn assign_id<T: Record>(
    record: &mut T,
    ns: &mut dyn NamespaceWrite,
) -> DbResult<ObjectId> {
    let schema = T::schema();

    let Some(primary) = schema.primary else {
        return Ok(ObjectId::Int(next_id(ns, schema)?));
    };

    let spec = schema
        .field(primary)
        .ok_or_else(|| DbError::unsupported_identifier(primary))?;

    match spec.kind {
        FieldKind::Int => match record.field(primary) {
            Some(FieldValue::Int(n)) if n != 0 => Ok(ObjectId::Int(n)),
            Some(FieldValue::Int(_)) | Some(FieldValue::Null) | None => {
                let id = next_id(ns, schema)?;
                record.set_field(primary, FieldValue::Int(id));
                Ok(ObjectId::Int(id))
            }
            Some(_) => Err(DbError::schema_mismatch(format!(
                "primary field {primary} is declared Int but holds another shape"
            ))),
        },
        FieldKind::Text => match record.field(primary) {
            Some(FieldValue::Text(s)) if !s.is_empty() => Ok(ObjectId::Text(s)),
            Some(FieldValue::Text(_)) | Some(FieldValue::Null) | None => Err(
                DbError::invalid_identifier("identifier can not be an empty string"),
            ),
            Some(_) => Err(DbError::schema_mismatch(format!(
                "primary field {primary} is declared Text but holds another shape"
            ))),
        },
        _ => Err(DbError::unsupported_identifier(primary)),
    }
}

/// Reads the identifier out of an existing record, for update/delete.
pub(crate) fn primary_id<T: Record>(record: &T) -> DbResult<ObjectId> {
    let schema = T::schema();

    let Some(primary) = schema.primary else {
        return Err(DbError::unsupported_identifier(format!(
            "{} has no primary field",
            schema.namespace
        )));
    };

    let spec = schema
        .field(primary)
        .ok_or_else(|| DbError::unsupported_identifier(primary))?;

    match spec.kind {
        FieldKind::Int => match record.field(primary) {
            Some(FieldValue::Int(n)) => Ok(ObjectId::Int(n)),
            _ => Ok(ObjectId::Int(0)),
        },
        FieldKind::Text => match record.field(primary) {
            Some(FieldValue::Text(s)) => Ok(ObjectId::Text(s)),
            _ => Err(DbError::invalid_identifier(
                "identifier can not be an empty string",
            )),
        },
        _ => Err(DbError::unsupported_identifier(primary)),
    }
}

fn next_id(ns: &mut dyn NamespaceWrite, schema: &Schema) -> DbResult<i64> {
    let seq = ns.next_sequence()? as i64;
    Ok(if schema.inverted_sequence {
        MAX_ID - seq
    } else {
        seq
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_encoding_is_fixed_width() {
        assert_eq!(ObjectId::Int(1).to_bytes(), b"0000000001");
        assert_eq!(ObjectId::Int(2_147_483_647).to_bytes(), b"2147483647");
    }

    #[test]
    fn text_encoding_is_verbatim() {
        assert_eq!(ObjectId::Text("token-a".into()).to_bytes(), b"token-a");
    }

    #[test]
    fn fixed_width_preserves_numeric_order() {
        let ids = [1i64, 9, 10, 99, 100, 1000];
        let mut keys: Vec<Vec<u8>> = ids.iter().map(|n| ObjectId::Int(*n).to_bytes()).collect();
        let sorted = keys.clone();
        keys.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn equality_is_byte_level() {
        assert_eq!(ObjectId::Int(5), ObjectId::Text("0000000005".into()));
        assert_ne!(ObjectId::Int(5), ObjectId::Int(6));
    }

    #[test]
    fn display() {
        assert_eq!(ObjectId::Int(5).to_string(), "5");
        assert_eq!(ObjectId::Text("abc".into()).to_string(), "abc");
    }
}
