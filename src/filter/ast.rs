//! Compiled filter structures
//!
//! A compiled filter is a tree of [`FilterNode`]s. Whether a node is a
//! path continuation or an operator leaf is decided once, at compile time,
//! so the flattener never has to guess from the shape of the data.

use std::collections::BTreeMap;

use serde_json::Value;

use super::flatten::FlatFilter;
use super::pattern::CompiledPattern;

/// Field-path segment that marks an element-match sub-filter
pub const ELEM_MATCH: &str = "elemMatch";

/// Compiled operators
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// Structural equality
    Eq(Value),
    /// Structural inequality
    Ne(Value),
    /// Membership in the operand sequence
    In(Vec<Value>),
    /// Non-membership in the operand sequence
    Nin(Vec<Value>),
    /// Greater than
    Gt(Value),
    /// Greater than or equal
    Gte(Value),
    /// Less than
    Lt(Value),
    /// Less than or equal
    Lte(Value),
    /// Pattern match against a string value (`glob` compiles to this too)
    Regex(CompiledPattern),
    /// Field presence (`true`) or absence (`false`)
    Exists(bool),
    /// Some element of an array field satisfies the sub-filter
    ElemMatch(Box<FlatFilter>),
}

impl Operator {
    /// Returns the operator name
    pub fn op_name(&self) -> &'static str {
        match self {
            Operator::Eq(_) => "eq",
            Operator::Ne(_) => "ne",
            Operator::In(_) => "in",
            Operator::Nin(_) => "nin",
            Operator::Gt(_) => "gt",
            Operator::Gte(_) => "gte",
            Operator::Lt(_) => "lt",
            Operator::Lte(_) => "lte",
            Operator::Regex(_) => "regex",
            Operator::Exists(_) => "exists",
            Operator::ElemMatch(_) => ELEM_MATCH,
        }
    }

    /// Returns true if this is an element-match operation
    pub fn is_elem_match(&self) -> bool {
        matches!(self, Operator::ElemMatch(_))
    }
}

/// The operators applied to one field path, combined with AND
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperatorLeaf {
    ops: Vec<Operator>,
}

impl OperatorLeaf {
    pub fn new(ops: Vec<Operator>) -> Self {
        Self { ops }
    }

    /// A leaf holding a single operator
    pub fn single(op: Operator) -> Self {
        Self { ops: vec![op] }
    }

    pub fn ops(&self) -> &[Operator] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Appends operators from another leaf on the same path
    pub fn extend(&mut self, other: OperatorLeaf) {
        self.ops.extend(other.ops);
    }

    /// True if any operator is an element match
    pub fn has_elem_match(&self) -> bool {
        self.ops.iter().any(Operator::is_elem_match)
    }

    /// The operand when the leaf is exactly one `eq`
    pub fn sole_eq(&self) -> Option<&Value> {
        match self.ops.as_slice() {
            [Operator::Eq(value)] => Some(value),
            _ => None,
        }
    }
}

/// A compiled filter tree node
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    /// Continues the field path; children keyed by segment
    Path(BTreeMap<String, FilterNode>),
    /// Terminal operators for the path leading here
    Leaf(OperatorLeaf),
}

impl FilterNode {
    /// The empty filter
    pub fn empty() -> Self {
        FilterNode::Path(BTreeMap::new())
    }

    /// True for a path node with no children
    pub fn is_empty(&self) -> bool {
        match self {
            FilterNode::Path(children) => children.is_empty(),
            FilterNode::Leaf(leaf) => leaf.is_empty(),
        }
    }
}
