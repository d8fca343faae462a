//! Dotted-path field lookup
//!
//! A path may reach zero, one or several values in a record:
//! - an object segment descends by key
//! - a numeric segment on an array selects that element
//! - any other segment on an array fans out over its object elements
//!
//! Missing intermediate segments are never an error; they simply yield no
//! candidates. The empty path yields the record itself.

use serde_json::Value;

/// Returns every value `path` reaches in `record`, in document order
pub fn lookup<'a>(record: &'a Value, path: &str) -> Vec<&'a Value> {
    if path.is_empty() {
        return vec![record];
    }

    let mut current = vec![record];
    for segment in path.split('.') {
        let mut next = Vec::with_capacity(current.len());
        for value in current {
            descend(value, segment, &mut next);
        }
        if next.is_empty() {
            return next;
        }
        current = next;
    }
    current
}

/// Returns the first value `path` reaches, if any
pub fn lookup_first<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    lookup(record, path).into_iter().next()
}

fn descend<'a>(value: &'a Value, segment: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            if let Some(child) = map.get(segment) {
                out.push(child);
            }
        }
        Value::Array(items) => match segment.parse::<usize>() {
            Ok(index) => {
                if let Some(child) = items.get(index) {
                    out.push(child);
                }
            }
            Err(_) => {
                for item in items {
                    if let Value::Object(map) = item {
                        if let Some(child) = map.get(segment) {
                            out.push(child);
                        }
                    }
                }
            }
        },
        _ => {}
    }
}
