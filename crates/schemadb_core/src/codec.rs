//! Generic wire codec.
//!
//! Converts between in-memory records and their JSON wire documents,
//! driven entirely by the kind's [`Schema`]. Fields without a mapping
//! entry are opaque to persistence; embedded structured fields flatten
//! their inner fields into the parent document, recursively.

use crate::error::{DbError, DbResult};
use crate::record::Record;
use crate::schema::{FieldKind, FieldSpec};
use crate::value::FieldValue;
use serde_json::{Map, Value as JsonValue};

/// Encodes a record into its wire document.
///
/// The document contains exactly the fields carried by the schema's
/// mapping, keyed by wire name; `Null` field values encode as JSON
/// null.
///
/// # Errors
///
/// Returns [`DbError::SchemaMismatch`] if a field's value does not
/// match its declared kind, or [`DbError::Codec`] if serialization
/// fails.
pub fn encode<T: Record>(record: &T) -> DbResult<Vec<u8>> {
    let mut doc = Map::new();
    encode_fields(record, T::schema().fields, &mut doc)?;
    Ok(serde_json::to_vec(&JsonValue::Object(doc))?)
}

/// Decodes a wire document into a fresh record.
///
/// Builds `T::default()` and fills it via [`decode_into`], so fields
/// without a mapping entry keep their default values.
///
/// # Errors
///
/// Returns [`DbError::Codec`] if the bytes are not a JSON document, or
/// [`DbError::SchemaMismatch`] if a wire value conflicts with its
/// declared kind.
pub fn decode<T: Record>(bytes: &[u8]) -> DbResult<T> {
    let mut record = T::default();
    decode_into(&mut record, bytes)?;
    Ok(record)
}

/// Decodes a wire document into a caller-provided record.
///
/// Only fields present in the document are written; everything else on
/// the target is left untouched, so decode is non-destructive to
/// out-of-band state.
///
/// # Errors
///
/// Same as [`decode`].
pub fn decode_into<T: Record>(record: &mut T, bytes: &[u8]) -> DbResult<()> {
    let wire: JsonValue = serde_json::from_slice(bytes)?;
    let JsonValue::Object(doc) = wire else {
        return Err(DbError::schema_mismatch("wire document is not an object"));
    };
    decode_fields(record, T::schema().fields, &doc)
}

fn encode_fields<T: Record>(
    record: &T,
    specs: &'static [FieldSpec],
    doc: &mut Map<String, JsonValue>,
) -> DbResult<()> {
    for spec in specs {
        if let FieldKind::Embedded(inner) = spec.kind {
            encode_fields(record, inner, doc)?;
        } else {
            let value = record.field(spec.wire).unwrap_or(FieldValue::Null);
            doc.insert(spec.wire.to_string(), to_wire(spec, &value)?);
        }
    }
    Ok(())
}

fn decode_fields<T: Record>(
    record: &mut T,
    specs: &'static [FieldSpec],
    doc: &Map<String, JsonValue>,
) -> DbResult<()> {
    for spec in specs {
        if let FieldKind::Embedded(inner) = spec.kind {
            decode_fields(record, inner, doc)?;
        } else if let Some(raw) = doc.get(spec.wire) {
            record.set_field(spec.wire, from_wire(spec, raw)?);
        }
    }
    Ok(())
}

fn to_wire(spec: &FieldSpec, value: &FieldValue) -> DbResult<JsonValue> {
    match (spec.kind, value) {
        (_, FieldValue::Null) => Ok(JsonValue::Null),
        (FieldKind::Int, FieldValue::Int(n)) => Ok(JsonValue::from(*n)),
        (FieldKind::Float, FieldValue::Float(f)) => Ok(JsonValue::from(*f)),
        (FieldKind::Bool, FieldValue::Bool(b)) => Ok(JsonValue::Bool(*b)),
        (FieldKind::Text, FieldValue::Text(s)) => Ok(JsonValue::String(s.clone())),
        _ => Err(DbError::schema_mismatch(format!(
            "field {} holds a value that does not match its declared kind",
            spec.wire
        ))),
    }
}

/// Converts a wire value back to a field value per the declared kind.
pub(crate) fn from_wire(spec: &FieldSpec, raw: &JsonValue) -> DbResult<FieldValue> {
    let mismatch = || {
        DbError::schema_mismatch(format!(
            "wire value for field {} does not match its declared kind",
            spec.wire
        ))
    };

    match (spec.kind, raw) {
        (_, JsonValue::Null) => Ok(FieldValue::Null),
        (FieldKind::Int, JsonValue::Number(n)) => {
            n.as_i64().map(FieldValue::Int).ok_or_else(mismatch)
        }
        (FieldKind::Float, JsonValue::Number(n)) => {
            n.as_f64().map(FieldValue::Float).ok_or_else(mismatch)
        }
        (FieldKind::Bool, JsonValue::Bool(b)) => Ok(FieldValue::Bool(*b)),
        (FieldKind::Text, JsonValue::String(s)) => Ok(FieldValue::Text(s.clone())),
        _ => Err(mismatch()),
    }
}
