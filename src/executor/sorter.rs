//! Result sorting for query execution
//!
//! Multi-key, stable, deterministic. Keys are extracted once per record,
//! then records are ordered by the first key, ties broken by the next.
//! Absent values order below every present value.

use std::cmp::Ordering;

use serde_json::Value;

use super::compare::compare_optional;
use super::path;
use crate::planner::{SortDirection, SortKey};

/// Sorts result records
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts records according to the sort keys.
    ///
    /// Sort is stable: records equal on every key keep their input order.
    pub fn sort(records: &mut Vec<Value>, keys: &[SortKey]) {
        if keys.is_empty() || records.len() < 2 {
            return;
        }

        let mut decorated: Vec<(Vec<Option<Value>>, Value)> = std::mem::take(records)
            .into_iter()
            .map(|record| (Self::extract_keys(&record, keys), record))
            .collect();

        decorated.sort_by(|(a, _), (b, _)| Self::compare_keys(a, b, keys));

        records.extend(decorated.into_iter().map(|(_, record)| record));
    }

    /// Sort key for one path: absent, the single value, or every value found
    fn extract_key(record: &Value, field: &str) -> Option<Value> {
        let mut found = path::lookup(record, field);
        match found.len() {
            0 => None,
            1 => found.pop().cloned(),
            _ => Some(Value::Array(found.into_iter().cloned().collect())),
        }
    }

    fn extract_keys(record: &Value, keys: &[SortKey]) -> Vec<Option<Value>> {
        keys.iter()
            .map(|key| Self::extract_key(record, &key.path))
            .collect()
    }

    fn compare_keys(a: &[Option<Value>], b: &[Option<Value>], keys: &[SortKey]) -> Ordering {
        for ((left, right), key) in a.iter().zip(b).zip(keys) {
            let ordering = compare_optional(left.as_ref(), right.as_ref());
            let ordering = match key.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}
