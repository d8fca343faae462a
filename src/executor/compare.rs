//! Value comparison
//!
//! Two relations over JSON values:
//! - structural equality, where numbers compare by value (`1 == 1.0`)
//! - a total order used for sorting:
//!   null < bool < number < string < array < object
//!
//! Range operators use [`compare_same_type`], which only orders
//! number-vs-number and string-vs-string.

use std::cmp::Ordering;

use serde_json::{Number, Value};

/// Structural equality with numeric comparison of numbers
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y) == Ordering::Equal,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| values_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, l)| y.get(key).map_or(false, |r| values_equal(l, r)))
        }
        _ => a == b,
    }
}

/// Orders values of the same comparable type; `None` for anything else
pub fn compare_same_type(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Some(compare_numbers(x, y)),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Total order over all values
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (l, r) in x.iter().zip(y) {
                let ordering = compare_values(l, r);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => Ordering::Equal,
    }
}

/// Total order with absent values lowest
pub fn compare_optional(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => compare_values(x, y),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.cmp(&y);
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_equal_across_representations() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(values_equal(&json!({ "a": [1, 2] }), &json!({ "a": [1.0, 2] })));
        assert!(!values_equal(&json!(1), &json!("1")));
    }

    #[test]
    fn test_object_equality_ignores_key_order() {
        assert!(values_equal(&json!({ "a": 1, "b": 2 }), &json!({ "b": 2, "a": 1 })));
        assert!(!values_equal(&json!({ "a": 1 }), &json!({ "a": 1, "b": 2 })));
    }

    #[test]
    fn test_same_type_only() {
        assert_eq!(compare_same_type(&json!(2), &json!(10)), Some(Ordering::Less));
        assert_eq!(compare_same_type(&json!("b"), &json!("a")), Some(Ordering::Greater));
        assert_eq!(compare_same_type(&json!("2"), &json!(1)), None);
        assert_eq!(compare_same_type(&Value::Null, &Value::Null), None);
    }

    #[test]
    fn test_type_order() {
        let ordered = [
            json!(null),
            json!(false),
            json!(true),
            json!(-1.5),
            json!(3),
            json!("a"),
            json!([1]),
            json!({ "a": 1 }),
        ];
        for pair in ordered.windows(2) {
            assert_eq!(compare_values(&pair[0], &pair[1]), Ordering::Less, "{:?}", pair);
        }
    }

    #[test]
    fn test_arrays_lexicographic() {
        assert_eq!(compare_values(&json!([1, 2]), &json!([1, 3])), Ordering::Less);
        assert_eq!(compare_values(&json!([1]), &json!([1, 0])), Ordering::Less);
    }

    #[test]
    fn test_absent_lowest() {
        assert_eq!(compare_optional(None, Some(&Value::Null)), Ordering::Less);
        assert_eq!(compare_optional(None, None), Ordering::Equal);
    }

    #[test]
    fn test_large_unsigned() {
        assert_eq!(
            compare_values(&json!(u64::MAX), &json!(u64::MAX - 1)),
            Ordering::Greater
        );
    }
}
