//! Namespace addressing.

use crate::schema::Schema;
use std::fmt::Write;

/// Derives the namespace key for a kind within a scope.
///
/// Global kinds map to their bare namespace name. Scoped kinds append
/// each scope id as a fixed-width zero-padded decimal suffix, in call
/// order. Distinct `(schema, scope)` pairs never collide because every
/// key is prefixed with the kind's own namespace name.
#[must_use]
pub fn bucket_id(schema: &Schema, scope: &[i64]) -> Vec<u8> {
    let mut name = String::from(schema.namespace);

    if !schema.global {
        for id in scope {
            let _ = write!(name, "_{id:010}");
        }
    }

    name.into_bytes()
}
