//! The diff algorithm: classify row and table changes between two commits.
//!
//! The engine reads two commits and never mutates them. With a declared
//! primary key, rows are matched by key cell under SQL equality, so cell
//! changes surface as Modified. Without one there is no stable row
//! identity, and the engine falls back to a plain multiset comparison:
//! surplus occurrences on either side become Deleted or Added, and
//! Modified is never reported. That limitation is inherent to keyless
//! tables; no similarity heuristics are attempted.

use std::collections::{HashMap, VecDeque};

use crate::catalog::{row_fingerprint, Row, Schema};
use crate::diff::types::{CommitDiff, RowDiff, TableDiff};
use crate::storage::Commit;

/// Compute the structured difference between two commits.
pub fn diff(from: &Commit, to: &Commit) -> CommitDiff {
    let tables_added = to
        .table_names()
        .filter(|&name| !from.has_table(name))
        .cloned()
        .collect();
    let tables_dropped = from
        .table_names()
        .filter(|&name| !to.has_table(name))
        .cloned()
        .collect();

    let mut table_diffs = Vec::new();
    for name in from.table_names().filter(|&name| to.has_table(name)) {
        // both lookups succeed for a common table name
        let (Some(from_schema), Some(to_schema)) = (from.schema(name), to.schema(name)) else {
            continue;
        };
        let from_rows = from.table_rows(name).unwrap_or_default();
        let to_rows = to.table_rows(name).unwrap_or_default();

        table_diffs.push(TableDiff {
            table: name.clone(),
            schema_changed: from_schema != to_schema,
            row_diffs: diff_rows(from_schema, from_rows, to_schema, to_rows),
        });
    }

    CommitDiff {
        from: from.hash().clone(),
        to: to.hash().clone(),
        tables_added,
        tables_dropped,
        table_diffs,
    }
}

/// Diff one table's rows, choosing keyed or multiset matching.
///
/// The primary-key column is resolved by name on each side, so a column
/// reorder between commits still matches rows by key. If either side lacks
/// a primary-key column the table degrades to multiset matching.
fn diff_rows(
    from_schema: &Schema,
    from_rows: &[Row],
    to_schema: &Schema,
    to_rows: &[Row],
) -> Vec<RowDiff> {
    let keyed = from_schema.primary_key_index().and_then(|from_pk| {
        let name = &from_schema.columns()[from_pk].name;
        to_schema.get_column_index(name).map(|to_pk| (from_pk, to_pk))
    });

    match keyed {
        Some((from_pk, to_pk)) => diff_rows_by_key(from_rows, from_pk, to_rows, to_pk),
        None => diff_rows_multiset(from_rows, to_rows),
    }
}

/// Keyed matching: pair rows across the commits by equal primary-key cell.
///
/// A NULL key never matches any key, including another NULL, consistent
/// with NULL inequality. Matched pairs are compared cell-by-cell under the
/// same semantics, so two NULL cells in the same position also count as a
/// difference. Duplicate keys consume the first unmatched partner, which
/// keeps the output deterministic.
///
/// `to` rows are indexed by key fingerprint in one pass, so matching stays
/// near-linear in the snapshot size.
fn diff_rows_by_key(
    from_rows: &[Row],
    from_pk: usize,
    to_rows: &[Row],
    to_pk: usize,
) -> Vec<RowDiff> {
    // unmatched `to` row positions per key, in row order; NULL keys are
    // unmatchable and stay out
    let mut by_key: HashMap<String, VecDeque<usize>> = HashMap::new();
    for (i, to_row) in to_rows.iter().enumerate() {
        let key = &to_row[to_pk];
        if !key.is_null() {
            let mut fp = String::new();
            key.fingerprint_into(&mut fp);
            by_key.entry(fp).or_default().push_back(i);
        }
    }

    let mut diffs = Vec::new();
    let mut matched = vec![false; to_rows.len()];

    for from_row in from_rows {
        let key = &from_row[from_pk];
        let partner = if key.is_null() {
            None
        } else {
            let mut fp = String::new();
            key.fingerprint_into(&mut fp);
            by_key.get_mut(&fp).and_then(|queue| {
                // identical fingerprints can still fail SQL equality
                // (NaN keys), and then nothing under this key matches
                let i = *queue.front()?;
                if key.sql_equals(&to_rows[i][to_pk]) {
                    queue.pop_front()
                } else {
                    None
                }
            })
        };

        match partner {
            Some(i) => {
                matched[i] = true;
                if !rows_identical(from_row, &to_rows[i]) {
                    diffs.push(RowDiff::modified(from_row.clone(), to_rows[i].clone()));
                }
            }
            None => diffs.push(RowDiff::deleted(from_row.clone())),
        }
    }

    for (to_row, was_matched) in to_rows.iter().zip(&matched) {
        if !was_matched {
            diffs.push(RowDiff::added(to_row.clone()));
        }
    }

    diffs
}

/// Two rows are identical when every cell pair satisfies SQL equality.
/// A NULL cell fails that on both sides, so any NULL forces Modified.
fn rows_identical(a: &Row, b: &Row) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.sql_equals(y))
}

/// Keyless fallback: multiset comparison over row fingerprints.
///
/// A row value with `k` occurrences in `from` and `j` in `to` contributes
/// `max(0, k-j)` Deleted and `max(0, j-k)` Added entries. Deleted entries
/// come out in `from` scan order, Added entries in `to` row order.
fn diff_rows_multiset(from_rows: &[Row], to_rows: &[Row]) -> Vec<RowDiff> {
    let mut to_counts: HashMap<String, usize> = HashMap::new();
    for row in to_rows {
        *to_counts.entry(row_fingerprint(row)).or_default() += 1;
    }

    let mut diffs = Vec::new();
    for row in from_rows {
        match to_counts.get_mut(&row_fingerprint(row)) {
            Some(count) if *count > 0 => *count -= 1,
            _ => diffs.push(RowDiff::deleted(row.clone())),
        }
    }

    let mut from_counts: HashMap<String, usize> = HashMap::new();
    for row in from_rows {
        *from_counts.entry(row_fingerprint(row)).or_default() += 1;
    }
    for row in to_rows {
        match from_counts.get_mut(&row_fingerprint(row)) {
            Some(count) if *count > 0 => *count -= 1,
            _ => diffs.push(RowDiff::added(row.clone())),
        }
    }

    diffs
}
