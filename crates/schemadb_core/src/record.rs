//! The record trait.

use crate::schema::Schema;
use crate::value::FieldValue;

/// A domain type persisted through the mapping layer.
///
/// Implementations expose their mapped fields to the engine by wire
/// name. The engine drives everything else from the static [`Schema`]:
/// it never inspects the type beyond these three methods.
///
/// `Default` provides the decode target: decoding builds a fresh
/// default record and sets only the fields present in the wire
/// document, so fields without a mapping entry keep their defaults.
///
/// # Example
///
/// ```rust
/// use schemadb_core::{FieldKind, FieldSpec, FieldValue, Record, Schema};
///
/// #[derive(Debug, Clone, Default)]
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// static USER: Schema = Schema {
///     namespace: "user",
///     global: true,
///     primary: Some("id"),
///     inverted_sequence: false,
///     sortable: &["name"],
///     reference_suffix: Some("user_id"),
///     display_field: Some("name"),
///     fields: &[
///         FieldSpec { wire: "id", kind: FieldKind::Int },
///         FieldSpec { wire: "name", kind: FieldKind::Text },
///     ],
/// };
///
/// impl Record for User {
///     fn schema() -> &'static Schema {
///         &USER
///     }
///
///     fn field(&self, wire: &str) -> Option<FieldValue> {
///         match wire {
///             "id" => Some(FieldValue::Int(self.id)),
///             "name" => Some(FieldValue::Text(self.name.clone())),
///             _ => None,
///         }
///     }
///
///     fn set_field(&mut self, wire: &str, value: FieldValue) {
///         match wire {
///             "id" => {
///                 if let Some(n) = value.as_int() {
///                     self.id = n;
///                 }
///             }
///             "name" => {
///                 if let Some(s) = value.into_text() {
///                     self.name = s;
///                 }
///             }
///             _ => {}
///         }
///     }
/// }
/// ```
pub trait Record: Clone + Default {
    /// Returns the static persistence schema for this kind.
    fn schema() -> &'static Schema;

    /// Reads the value of a mapped field by wire name.
    ///
    /// Returns `None` for wire names the type does not recognize; the
    /// engine treats that as `Null`.
    fn field(&self, wire: &str) -> Option<FieldValue>;

    /// Writes the value of a mapped field by wire name.
    ///
    /// Unrecognized wire names and values of the wrong shape are
    /// ignored; decode must never fail on a field the type cannot
    /// accept.
    fn set_field(&mut self, wire: &str, value: FieldValue);
}
