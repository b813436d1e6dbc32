//! Referential-integrity gate and reference aggregation.
//!
//! Deletion is gated on a closed, configured set of referring kinds:
//! before a record is removed, each guarded kind's namespace is probed
//! for records whose reference field carries the deleted identifier.
//! Probing works at the wire-document level, so no typed decode of the
//! referring kinds is needed.

use crate::bucket::bucket_id;
use crate::codec::from_wire;
use crate::error::{DbError, DbResult};
use crate::id::ObjectId;
use crate::schema::Schema;
use crate::value::FieldValue;
use schemadb_kv::{NamespaceRead, ReadTxn, WriteTxn};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// A summarized referrer: identifier plus display name.
#[derive(Debug, Clone, Serialize)]
pub struct Referrer {
    /// The referring record's primary identifier.
    pub id: ObjectId,
    /// The referring record's display name (empty if the kind declares
    /// no display field).
    pub name: String,
}

/// All referrers of one kind.
#[derive(Debug, Clone, Serialize)]
pub struct ReferrerGroup {
    /// Namespace name of the referring kind.
    pub kind: &'static str,
    /// The referring records.
    pub records: Vec<Referrer>,
}

/// Referrers of a record, grouped by kind. For display/audit use.
#[derive(Debug, Clone, Serialize)]
pub struct ReferrerSummary {
    /// One group per configured referring kind.
    pub groups: Vec<ReferrerGroup>,
}

impl ReferrerSummary {
    /// Returns `true` if no referrer was found in any group.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.records.is_empty())
    }
}

/// The closed set of kinds summarized by the reference aggregator.
#[derive(Debug, Default)]
pub struct ReferrerConfig {
    /// Kinds whose referrers are summarized directly.
    pub direct: Vec<&'static Schema>,
    /// Kinds whose referrers resolve one hop further before being
    /// summarized.
    pub indirect: Vec<IndirectReferrer>,
}

/// One-hop resolution rule: referrers found in `via` are resolved
/// through `hop_field` to the record they point at in `target`, and
/// deduplicated by identifier against `target`'s direct referrers.
#[derive(Debug)]
pub struct IndirectReferrer {
    /// The kind whose records are scanned for references.
    pub via: &'static Schema,
    /// Wire name of the field on `via` holding the target identifier.
    pub hop_field: &'static str,
    /// The kind the hop resolves to.
    pub target: &'static Schema,
}

/// Probes the guarded kinds for any record referencing `id`.
///
/// Returns the namespace name of the first kind with a match, or
/// `None` if the delete may proceed. Kinds whose namespace does not
/// exist in this scope contribute zero records.
pub(crate) fn find_blocking_kind(
    txn: &dyn WriteTxn,
    guards: &[&'static Schema],
    scope: &[i64],
    target: &Schema,
    id: &ObjectId,
) -> DbResult<Option<&'static str>> {
    let Some(suffix) = target.reference_suffix else {
        return Ok(None);
    };

    for guard in guards {
        let Some(ns) = txn.namespace(&bucket_id(guard, scope)) else {
            continue;
        };
        if namespace_has_referrer(ns, guard, suffix, id)? {
            return Ok(Some(guard.namespace));
        }
    }

    Ok(None)
}

fn namespace_has_referrer(
    ns: &dyn NamespaceRead,
    schema: &Schema,
    suffix: &str,
    id: &ObjectId,
) -> DbResult<bool> {
    let mut cursor = ns.cursor();
    while let Some((_, value)) = cursor.next() {
        if references_id(schema, &parse_doc(value)?, suffix, id) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Tests whether one wire document references `id`.
///
/// The reference field is the first of `schema`'s fields whose wire
/// name ends with `suffix`. A missing field, a null value, integer 0,
/// and an empty string all mean "no reference". Matching compares the
/// canonical byte encodings, so an integer reference field matches an
/// integer identifier regardless of formatting.
fn references_id(
    schema: &Schema,
    doc: &Map<String, JsonValue>,
    suffix: &str,
    id: &ObjectId,
) -> bool {
    let Some(spec) = schema.field_with_suffix(suffix) else {
        return false;
    };
    let Some(raw) = doc.get(spec.wire) else {
        return false;
    };
    let Ok(value) = from_wire(spec, raw) else {
        return false;
    };

    let candidate = match value {
        FieldValue::Int(n) if n != 0 => ObjectId::Int(n),
        FieldValue::Text(s) if !s.is_empty() => ObjectId::Text(s),
        _ => return false,
    };

    candidate == *id
}

/// Collects the summarized referrers of a record across the configured
/// kinds.
pub(crate) fn collect_referrers(
    txn: &dyn ReadTxn,
    config: &ReferrerConfig,
    scope: &[i64],
    target: &Schema,
    id: &ObjectId,
) -> DbResult<ReferrerSummary> {
    let suffix = target.reference_suffix.ok_or_else(|| {
        DbError::schema_mismatch(format!(
            "{} declares no reference suffix",
            target.namespace
        ))
    })?;

    let mut groups = Vec::new();

    // A configured kind with no field matching the suffix simply cannot
    // reference this kind; it contributes an empty group.
    for schema in &config.direct {
        let mut records = Vec::new();
        if let Some(ns) = txn.namespace(&bucket_id(schema, scope)) {
            let mut cursor = ns.cursor();
            while let Some((_, value)) = cursor.next() {
                let doc = parse_doc(value)?;
                if references_id(schema, &doc, suffix, id) {
                    records.push(summarize(schema, &doc)?);
                }
            }
        }

        groups.push(ReferrerGroup {
            kind: schema.namespace,
            records,
        });
    }

    for rule in &config.indirect {
        let resolved = resolve_indirect(txn, rule, scope, suffix, id)?;

        match groups.iter_mut().find(|g| g.kind == rule.target.namespace) {
            Some(group) => {
                for referrer in resolved {
                    if !group.records.iter().any(|r| r.id == referrer.id) {
                        group.records.push(referrer);
                    }
                }
            }
            None => groups.push(ReferrerGroup {
                kind: rule.target.namespace,
                records: resolved,
            }),
        }
    }

    Ok(ReferrerSummary { groups })
}

/// Resolves referrers found in `rule.via` one hop further to the
/// records they point at in `rule.target`.
fn resolve_indirect(
    txn: &dyn ReadTxn,
    rule: &IndirectReferrer,
    scope: &[i64],
    suffix: &str,
    id: &ObjectId,
) -> DbResult<Vec<Referrer>> {
    let mut resolved: Vec<Referrer> = Vec::new();

    let Some(via_ns) = txn.namespace(&bucket_id(rule.via, scope)) else {
        return Ok(resolved);
    };

    let mut cursor = via_ns.cursor();
    while let Some((_, value)) = cursor.next() {
        let doc = parse_doc(value)?;
        if !references_id(rule.via, &doc, suffix, id) {
            continue;
        }

        let hop_id = match doc.get(rule.hop_field) {
            Some(JsonValue::Number(n)) => n.as_i64().map(ObjectId::Int),
            Some(JsonValue::String(s)) => Some(ObjectId::Text(s.clone())),
            _ => None,
        }
        .ok_or_else(|| {
            DbError::schema_mismatch(format!(
                "{} record has no readable {} field",
                rule.via.namespace, rule.hop_field
            ))
        })?;

        let target_doc = txn
            .namespace(&bucket_id(rule.target, scope))
            .and_then(|ns| ns.get(&hop_id.to_bytes()))
            .ok_or(DbError::NotFound)?;

        let referrer = summarize(rule.target, &parse_doc(&target_doc)?)?;
        if !resolved.iter().any(|r| r.id == referrer.id) {
            resolved.push(referrer);
        }
    }

    Ok(resolved)
}

fn summarize(schema: &Schema, doc: &Map<String, JsonValue>) -> DbResult<Referrer> {
    let id = match schema.primary.and_then(|p| doc.get(p)) {
        Some(JsonValue::Number(n)) => n.as_i64().map(ObjectId::Int),
        Some(JsonValue::String(s)) => Some(ObjectId::Text(s.clone())),
        _ => None,
    }
    .ok_or_else(|| {
        DbError::schema_mismatch(format!(
            "{} record has no readable primary field",
            schema.namespace
        ))
    })?;

    let name = schema
        .display_field
        .and_then(|d| doc.get(d))
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(Referrer { id, name })
}

fn parse_doc(bytes: &[u8]) -> DbResult<Map<String, JsonValue>> {
    match serde_json::from_slice(bytes)? {
        JsonValue::Object(doc) => Ok(doc),
        _ => Err(DbError::schema_mismatch("wire document is not an object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, FieldSpec};

    static TEMPLATE: Schema = Schema {
        namespace: "template",
        global: false,
        primary: Some("id"),
        inverted_sequence: false,
        sortable: &[],
        reference_suffix: Some("template_id"),
        display_field: Some("name"),
        fields: &[
            FieldSpec {
                wire: "id",
                kind: FieldKind::Int,
            },
            FieldSpec {
                wire: "name",
                kind: FieldKind::Text,
            },
            FieldSpec {
                wire: "environment_id",
                kind: FieldKind::Int,
            },
        ],
    };

    fn doc(json: &str) -> Map<String, JsonValue> {
        match serde_json::from_str(json).unwrap() {
            JsonValue::Object(doc) => doc,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn matching_reference_is_detected() {
        let d = doc(r#"{"id":1,"name":"t","environment_id":7}"#);
        assert!(references_id(
            &TEMPLATE,
            &d,
            "environment_id",
            &ObjectId::Int(7)
        ));
    }

    #[test]
    fn zero_and_null_mean_no_reference() {
        let zero = doc(r#"{"environment_id":0}"#);
        assert!(!references_id(
            &TEMPLATE,
            &zero,
            "environment_id",
            &ObjectId::Int(0)
        ));

        let null = doc(r#"{"environment_id":null}"#);
        assert!(!references_id(
            &TEMPLATE,
            &null,
            "environment_id",
            &ObjectId::Int(7)
        ));
    }

    #[test]
    fn missing_field_means_no_reference() {
        let d = doc(r#"{"id":1}"#);
        assert!(!references_id(
            &TEMPLATE,
            &d,
            "environment_id",
            &ObjectId::Int(7)
        ));
    }

    #[test]
    fn unknown_suffix_means_no_reference() {
        let d = doc(r#"{"id":1,"environment_id":7}"#);
        assert!(!references_id(
            &TEMPLATE,
            &d,
            "repository_id",
            &ObjectId::Int(7)
        ));
    }

    #[test]
    fn comparison_is_byte_level() {
        // An integer reference matches a text identifier carrying the
        // same canonical encoding.
        let d = doc(r#"{"environment_id":7}"#);
        assert!(references_id(
            &TEMPLATE,
            &d,
            "environment_id",
            &ObjectId::Text("0000000007".into())
        ));
    }

    #[test]
    fn summarize_reads_primary_and_display() {
        let d = doc(r#"{"id":3,"name":"deploy","environment_id":7}"#);
        let referrer = summarize(&TEMPLATE, &d).unwrap();
        assert_eq!(referrer.id, ObjectId::Int(3));
        assert_eq!(referrer.name, "deploy");
    }

    #[test]
    fn summarize_without_primary_is_a_schema_mismatch() {
        let d = doc(r#"{"name":"deploy"}"#);
        assert!(matches!(
            summarize(&TEMPLATE, &d),
            Err(DbError::SchemaMismatch { .. })
        ));
    }
}
