//! Static type descriptors.
//!
//! A [`Schema`] is the externally supplied persistence metadata for one
//! record kind. The engine consumes only this descriptor; it never
//! inspects record types at runtime.

/// Persistence rules for one record kind.
///
/// Schemas are `'static` values declared once per type, typically as a
/// `static` item next to the type definition:
///
/// ```rust
/// use schemadb_core::{FieldKind, FieldSpec, Schema};
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
/// ```
#[derive(Debug)]
pub struct Schema {
    /// Namespace (bucket) name for this kind.
    pub namespace: &'static str,

    /// Whether the namespace is global (unscoped). Non-global kinds get
    /// one namespace per scope-id sequence.
    pub global: bool,

    /// Wire name of the primary-identifier field. `None` means the key
    /// is system-assigned and not stored on the record.
    pub primary: Option<&'static str>,

    /// Whether auto-assigned identifiers invert the sequence
    /// (`id = MAX_ID - seq`), biasing newer records toward the front of
    /// iteration order.
    pub inverted_sequence: bool,

    /// Wire names eligible for the list pipeline's sort.
    pub sortable: &'static [&'static str],

    /// Wire-name suffix identifying fields on *other* kinds that
    /// reference this kind. `None` means nothing references this kind.
    pub reference_suffix: Option<&'static str>,

    /// Wire name of the field used as a human-readable label in
    /// referrer summaries.
    pub display_field: Option<&'static str>,

    /// Mapped fields, in wire order. Fields absent from this list are
    /// invisible to persistence.
    pub fields: &'static [FieldSpec],
}

/// One mapped field: wire key plus declared kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key under which the field appears in the wire document.
    pub wire: &'static str,
    /// Declared value kind.
    pub kind: FieldKind,
}

/// Declared kind of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Signed integer.
    Int,
    /// Floating-point number.
    Float,
    /// Boolean.
    Bool,
    /// Text string.
    Text,
    /// A nested structured field without its own wire key: its inner
    /// fields flatten into the parent wire document, recursively.
    Embedded(&'static [FieldSpec]),
}

impl Schema {
    /// Finds the spec for an exact wire name, searching embedded
    /// specs recursively.
    #[must_use]
    pub fn field(&self, wire: &str) -> Option<&'static FieldSpec> {
        find_field(self.fields, &|spec| spec.wire == wire)
    }

    /// Finds the first spec whose wire name ends with `suffix`,
    /// searching top-level fields before embedded ones.
    #[must_use]
    pub fn field_with_suffix(&self, suffix: &str) -> Option<&'static FieldSpec> {
        find_field(self.fields, &|spec| spec.wire.ends_with(suffix))
    }

    /// Returns `true` if `wire` is declared sortable.
    #[must_use]
    pub fn is_sortable(&self, wire: &str) -> bool {
        self.sortable.contains(&wire)
    }
}

/// Breadth-first match: scalar fields at this level first, then
/// embedded levels in declaration order.
fn find_field(
    specs: &'static [FieldSpec],
    pred: &dyn Fn(&FieldSpec) -> bool,
) -> Option<&'static FieldSpec> {
    for spec in specs {
        if !matches!(spec.kind, FieldKind::Embedded(_)) && pred(spec) {
            return Some(spec);
        }
    }
    for spec in specs {
        if let FieldKind::Embedded(inner) = spec.kind {
            if let Some(found) = find_field(inner, pred) {
                return Some(found);
            }
        }
    }
    None
}
