//! Predicate filtering for query execution
//!
//! A flat filter is a conjunction: every path's operators must hold.
//! Each operator sees all candidate values its path reaches (see
//! [`path::lookup`]) and an array candidate also matches through its
//! elements, so `{tags: {eq: "x"}}` matches `tags: ["x", "y"]`.

use serde_json::Value;

use crate::filter::{FlatFilter, Operator};

use super::compare::{compare_same_type, values_equal};
use super::path;

/// Evaluates flat filters against records
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks if a record matches every entry of the filter (AND semantics)
    pub fn matches(record: &Value, filter: &FlatFilter) -> bool {
        filter.iter().all(|(field, leaf)| {
            let candidates = path::lookup(record, field);
            leaf.ops()
                .iter()
                .all(|op| Self::matches_operator(&candidates, op))
        })
    }

    /// Checks one operator against the values found at its path
    pub fn matches_operator(candidates: &[&Value], op: &Operator) -> bool {
        match op {
            Operator::Eq(expected) => Self::eq_match(candidates, expected),
            Operator::Ne(expected) => !Self::eq_match(candidates, expected),
            Operator::In(options) => Self::in_match(candidates, options),
            Operator::Nin(options) => !Self::in_match(candidates, options),
            Operator::Gt(bound) => Self::range_match(candidates, bound, |o| o.is_gt()),
            Operator::Gte(bound) => Self::range_match(candidates, bound, |o| o.is_ge()),
            Operator::Lt(bound) => Self::range_match(candidates, bound, |o| o.is_lt()),
            Operator::Lte(bound) => Self::range_match(candidates, bound, |o| o.is_le()),
            Operator::Regex(pattern) => candidates.iter().any(|value| {
                Self::any_element(value, |v| v.as_str().map_or(false, |s| pattern.is_match(s)))
            }),
            Operator::Exists(expected) => !candidates.is_empty() == *expected,
            Operator::ElemMatch(sub_filter) => candidates.iter().any(|value| match value {
                Value::Array(items) => items.iter().any(|item| Self::matches(item, sub_filter)),
                _ => false,
            }),
        }
    }

    /// Equality; an absent field equals `null`
    fn eq_match(candidates: &[&Value], expected: &Value) -> bool {
        if candidates.is_empty() {
            return expected.is_null();
        }
        candidates
            .iter()
            .any(|value| values_equal(value, expected) || Self::element_eq(value, expected))
    }

    /// Membership; an absent field is a member of any list holding `null`
    fn in_match(candidates: &[&Value], options: &[Value]) -> bool {
        options.iter().any(|option| Self::eq_match(candidates, option))
    }

    /// Ordered comparison, number-vs-number or string-vs-string only
    fn range_match(
        candidates: &[&Value],
        bound: &Value,
        accept: impl Fn(std::cmp::Ordering) -> bool,
    ) -> bool {
        candidates.iter().any(|value| {
            Self::any_element(value, |v| compare_same_type(v, bound).map_or(false, &accept))
        })
    }

    fn element_eq(value: &Value, expected: &Value) -> bool {
        match value {
            Value::Array(items) => items.iter().any(|item| values_equal(item, expected)),
            _ => false,
        }
    }

    /// Tests the value itself, or each element when it is an array
    fn any_element(value: &Value, test: impl Fn(&Value) -> bool) -> bool {
        match value {
            Value::Array(items) => items.iter().any(&test),
            other => test(other),
        }
    }
}
