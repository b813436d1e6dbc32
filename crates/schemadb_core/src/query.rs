//! The iteration/filter/sort/paginate pipeline.

use crate::codec;
use crate::error::{DbError, DbResult};
use crate::record::Record;
use crate::value::FieldValue;
use schemadb_kv::Cursor;
use serde::{Deserialize, Serialize};

/// Windowing and ordering controls for [`crate::ObjectStore::list`].
///
/// The result cap is exact: `limit = n` returns at most `n` records,
/// and `limit = 0` means unbounded. Sorting happens after the window is
/// taken, so combining `sort_by` with `offset`/`limit` yields a sorted
/// view of the windowed subset, not a globally sorted top-N.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListParams {
    /// Number of leading entries to skip, in namespace key order.
    pub offset: usize,
    /// Maximum number of records to return; 0 = unbounded.
    pub limit: usize,
    /// Wire name of the field to sort by; must be declared sortable.
    pub sort_by: Option<String>,
    /// Whether to invert the sort comparison.
    pub sort_inverted: bool,
}

impl ListParams {
    /// Creates parameters with no window, no filter, no sort.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of leading entries to skip.
    #[must_use]
    pub const fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the result cap (0 = unbounded).
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the sort field by wire name.
    #[must_use]
    pub fn sort_by(mut self, wire: impl Into<String>) -> Self {
        self.sort_by = Some(wire.into());
        self
    }

    /// Sets whether the sort comparison is inverted.
    #[must_use]
    pub const fn sort_inverted(mut self, inverted: bool) -> Self {
        self.sort_inverted = inverted;
        self
    }
}

/// Cursor over a namespace that does not exist: zero entries.
pub(crate) struct EmptyCursor;

impl Cursor for EmptyCursor {
    fn next(&mut self) -> Option<(&[u8], &[u8])> {
        None
    }
}

/// Runs the pipeline over one namespace cursor.
///
/// Walks entries in key order, skips `offset` entries without decoding
/// them, decodes the rest, applies the filter (rejected records do not
/// count against the cap), stops once the cap is reached, and finally
/// applies the stable field sort.
pub(crate) fn collect_records<T: Record>(
    cursor: &mut dyn Cursor,
    params: &ListParams,
    filter: Option<&dyn Fn(&T) -> bool>,
) -> DbResult<Vec<T>> {
    let schema = T::schema();

    if let Some(sort_by) = params.sort_by.as_deref() {
        if !schema.is_sortable(sort_by) {
            return Err(DbError::schema_mismatch(format!(
                "field {sort_by} is not sortable for {}",
                schema.namespace
            )));
        }
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;

    while let Some((_, value)) = cursor.next() {
        if skipped < params.offset {
            skipped += 1;
            continue;
        }

        let record: T = codec::decode(value)?;

        if let Some(filter) = filter {
            if !filter(&record) {
                continue;
            }
        }

        records.push(record);

        if params.limit > 0 && records.len() == params.limit {
            break;
        }
    }

    if let Some(sort_by) = params.sort_by.as_deref() {
        sort_records(&mut records, sort_by, params.sort_inverted);
    }

    Ok(records)
}

/// Stable sort by a field's value.
fn sort_records<T: Record>(records: &mut [T], sort_by: &str, inverted: bool) {
    records.sort_by(|a, b| {
        let va = a.field(sort_by).unwrap_or(FieldValue::Null);
        let vb = b.field(sort_by).unwrap_or(FieldValue::Null);
        let ord = va.sort_cmp(&vb);
        if inverted {
            ord.reverse()
        } else {
            ord
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;
    use crate::schema::{FieldKind, FieldSpec, Schema};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Task {
        id: i64,
        name: String,
        priority: i64,
    }

    static TASK: Schema = Schema {
        namespace: "task",
        global: true,
        primary: Some("id"),
        inverted_sequence: false,
        sortable: &["name", "priority"],
        reference_suffix: None,
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
                wire: "priority",
                kind: FieldKind::Int,
            },
        ],
    };

    impl Record for Task {
        fn schema() -> &'static Schema {
            &TASK
        }

        fn field(&self, wire: &str) -> Option<FieldValue> {
            match wire {
                "id" => Some(FieldValue::Int(self.id)),
                "name" => Some(FieldValue::Text(self.name.clone())),
                "priority" => Some(FieldValue::Int(self.priority)),
                _ => None,
            }
        }

        fn set_field(&mut self, wire: &str, value: FieldValue) {
            match wire {
                "id" => {
                    if let Some(n) = value.as_int() {
                        self.id = n;
                    }
                }
                "name" => {
                    if let Some(s) = value.into_text() {
                        self.name = s;
                    }
                }
                "priority" => {
                    if let Some(n) = value.as_int() {
                        self.priority = n;
                    }
                }
                _ => {}
            }
        }
    }

    /// Cursor over pre-encoded entries, in insertion order.
    struct VecCursor {
        entries: Vec<(Vec<u8>, Vec<u8>)>,
        pos: usize,
    }

    impl Cursor for VecCursor {
        fn next(&mut self) -> Option<(&[u8], &[u8])> {
            let entry = self.entries.get(self.pos)?;
            self.pos += 1;
            Some((entry.0.as_slice(), entry.1.as_slice()))
        }
    }

    fn cursor_over(tasks: &[Task]) -> VecCursor {
        VecCursor {
            entries: tasks
                .iter()
                .map(|t| {
                    (
                        format!("{:010}", t.id).into_bytes(),
                        encode(t).unwrap(),
                    )
                })
                .collect(),
            pos: 0,
        }
    }

    fn tasks(n: usize) -> Vec<Task> {
        (1..=n as i64)
            .map(|i| Task {
                id: i,
                name: format!("task-{i}"),
                priority: (n as i64) - i,
            })
            .collect()
    }

    #[test]
    fn walks_all_by_default() {
        let all = tasks(5);
        let got =
            collect_records::<Task>(&mut cursor_over(&all), &ListParams::new(), None).unwrap();
        assert_eq!(got, all);
    }

    #[test]
    fn offset_skips_leading_entries() {
        let all = tasks(5);
        let params = ListParams::new().offset(2);
        let got = collect_records::<Task>(&mut cursor_over(&all), &params, None).unwrap();
        assert_eq!(got, all[2..]);
    }

    #[test]
    fn offset_past_end_is_empty() {
        let all = tasks(3);
        let params = ListParams::new().offset(10);
        let got = collect_records::<Task>(&mut cursor_over(&all), &params, None).unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn limit_is_exact() {
        // Pins the cap policy: limit=2 over 5 records returns exactly 2.
        let all = tasks(5);
        let params = ListParams::new().limit(2);
        let got = collect_records::<Task>(&mut cursor_over(&all), &params, None).unwrap();
        assert_eq!(got, all[..2]);
    }

    #[test]
    fn limit_zero_is_unbounded() {
        let all = tasks(5);
        let params = ListParams::new().limit(0);
        let got = collect_records::<Task>(&mut cursor_over(&all), &params, None).unwrap();
        assert_eq!(got.len(), 5);
    }

    #[test]
    fn filtered_records_do_not_count_against_the_cap() {
        let all = tasks(6);
        let params = ListParams::new().limit(2);
        let odd = |t: &Task| t.id % 2 == 1;
        let got = collect_records::<Task>(&mut cursor_over(&all), &params, Some(&odd)).unwrap();
        assert_eq!(got.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn sort_by_declared_field() {
        let all = tasks(4);
        let params = ListParams::new().sort_by("priority");
        let got = collect_records::<Task>(&mut cursor_over(&all), &params, None).unwrap();
        let priorities: Vec<i64> = got.iter().map(|t| t.priority).collect();
        assert_eq!(priorities, vec![0, 1, 2, 3]);
    }

    #[test]
    fn sort_inverted_reverses_order() {
        let all = tasks(4);
        let params = ListParams::new().sort_by("name").sort_inverted(true);
        let got = collect_records::<Task>(&mut cursor_over(&all), &params, None).unwrap();
        assert_eq!(got.first().unwrap().name, "task-4");
    }

    #[test]
    fn sort_is_stable() {
        let all = vec![
            Task {
                id: 1,
                name: "same".into(),
                priority: 1,
            },
            Task {
                id: 2,
                name: "same".into(),
                priority: 2,
            },
            Task {
                id: 3,
                name: "same".into(),
                priority: 3,
            },
        ];
        let params = ListParams::new().sort_by("name");
        let got = collect_records::<Task>(&mut cursor_over(&all), &params, None).unwrap();
        assert_eq!(got.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn sort_happens_after_windowing() {
        // Records arrive in key order 1..=5 with descending priority;
        // limit 3 takes ids 1..=3, and only that subset is sorted.
        let all = tasks(5);
        let params = ListParams::new().limit(3).sort_by("priority");
        let got = collect_records::<Task>(&mut cursor_over(&all), &params, None).unwrap();
        assert_eq!(got.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn non_sortable_field_is_a_schema_mismatch() {
        let all = tasks(2);
        let params = ListParams::new().sort_by("id");
        let result = collect_records::<Task>(&mut cursor_over(&all), &params, None);
        assert!(matches!(result, Err(DbError::SchemaMismatch { .. })));
    }

    #[test]
    fn empty_cursor_yields_no_records() {
        let got =
            collect_records::<Task>(&mut EmptyCursor, &ListParams::new(), None).unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn offset_window_equivalence() {
        // list(offset=k, limit=n) == list(offset=0, limit=k+n) minus the
        // first k.
        let all = tasks(7);

        for k in 0..5usize {
            for n in 1..5usize {
                let windowed = collect_records::<Task>(
                    &mut cursor_over(&all),
                    &ListParams::new().offset(k).limit(n),
                    None,
                )
                .unwrap();
                let full = collect_records::<Task>(
                    &mut cursor_over(&all),
                    &ListParams::new().limit(k + n),
                    None,
                )
                .unwrap();
                assert_eq!(windowed, full[k.min(full.len())..], "k={k} n={n}");
            }
        }
    }

    #[test]
    fn offset_applies_to_raw_entries_before_the_filter() {
        let all = tasks(7);
        let even = |t: &Task| t.id % 2 == 0;

        for k in 0..4usize {
            for n in 0..4usize {
                let windowed = collect_records::<Task>(
                    &mut cursor_over(&all),
                    &ListParams::new().offset(k).limit(n),
                    Some(&even),
                )
                .unwrap();
                // The offset applies to raw entries, so compare against a
                // full walk with the same offset and no cap, truncated.
                let mut full = collect_records::<Task>(
                    &mut cursor_over(&all),
                    &ListParams::new().offset(k),
                    Some(&even),
                )
                .unwrap();
                if n > 0 {
                    full.truncate(n);
                }
                assert_eq!(windowed, full, "k={k} n={n}");
            }
        }
    }
}
