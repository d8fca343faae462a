//! Operator compiler
//!
//! Turns a raw JSON filter tree into a [`FilterNode`] tree.
//!
//! An entry whose value is a JSON object continues the field path, even when
//! its key spells an operator name. Any other entry is an operator. The
//! `elemMatch` key is always an operator whose object operand is compiled
//! into its own flat sub-filter.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::ast::{FilterNode, Operator, OperatorLeaf, ELEM_MATCH};
use super::errors::{FilterError, FilterResult};
use super::flatten::FlatFilter;
use super::pattern::{CompiledPattern, PatternCache, PatternKind};

/// Compiles raw filter trees
#[derive(Debug, Clone, Copy)]
pub struct FilterCompiler<'a> {
    cache: Option<&'a PatternCache>,
}

impl FilterCompiler<'static> {
    /// Compiler backed by the process-wide pattern cache
    pub fn new() -> Self {
        Self {
            cache: Some(PatternCache::global()),
        }
    }

    /// Compiler that compiles every pattern afresh
    pub fn uncached() -> Self {
        Self { cache: None }
    }
}

impl Default for FilterCompiler<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> FilterCompiler<'a> {
    /// Compiler backed by a caller-owned cache
    pub fn with_cache(cache: &'a PatternCache) -> Self {
        Self { cache: Some(cache) }
    }

    /// Compiles a top-level filter.
    ///
    /// `null` is the empty filter. The root must name fields; a bare
    /// operator object at the root is rejected.
    pub fn compile(&self, filter: &Value) -> FilterResult<FilterNode> {
        match filter {
            Value::Null => Ok(FilterNode::empty()),
            Value::Object(map) => match self.compile_node(map, &mut Vec::new())? {
                FilterNode::Leaf(_) => Err(FilterError::InvalidFilter(
                    "top-level filter must start with a field name".into(),
                )),
                node => Ok(node),
            },
            other => Err(FilterError::InvalidFilter(format!(
                "expected an object, found {}",
                json_type_name(other)
            ))),
        }
    }

    fn compile_node(&self, map: &Map<String, Value>, path: &mut Vec<String>) -> FilterResult<FilterNode> {
        let operator_entries = map
            .iter()
            .filter(|(key, value)| is_operator_entry(key, value))
            .count();

        if operator_entries == 0 {
            let mut children = BTreeMap::new();
            for (key, value) in map {
                if let Value::Object(child) = value {
                    path.push(key.clone());
                    let node = self.compile_node(child, path)?;
                    path.pop();
                    children.insert(key.clone(), node);
                }
            }
            return Ok(FilterNode::Path(children));
        }

        if operator_entries != map.len() {
            return Err(FilterError::MixedNode {
                path: path.join("."),
            });
        }

        let ops = map
            .iter()
            .map(|(key, value)| self.compile_operator(key, value, path))
            .collect::<FilterResult<Vec<_>>>()?;

        Ok(FilterNode::Leaf(OperatorLeaf::new(ops)))
    }

    fn compile_operator(&self, key: &str, value: &Value, path: &[String]) -> FilterResult<Operator> {
        let invalid = |expected: &'static str| FilterError::InvalidOperand {
            op: key.to_string(),
            path: path.join("."),
            expected,
        };

        let op = match key {
            "eq" => Operator::Eq(value.clone()),
            "ne" => Operator::Ne(value.clone()),
            "gt" => Operator::Gt(value.clone()),
            "gte" => Operator::Gte(value.clone()),
            "lt" => Operator::Lt(value.clone()),
            "lte" => Operator::Lte(value.clone()),
            "in" => Operator::In(value.as_array().ok_or_else(|| invalid("an array"))?.clone()),
            "nin" => Operator::Nin(value.as_array().ok_or_else(|| invalid("an array"))?.clone()),
            "exists" => Operator::Exists(value.as_bool().ok_or_else(|| invalid("a boolean"))?),
            "regex" => {
                let source = value.as_str().ok_or_else(|| invalid("a string"))?;
                Operator::Regex(self.pattern(PatternKind::Regex, source)?)
            }
            "glob" => {
                let source = value.as_str().ok_or_else(|| invalid("a string"))?;
                Operator::Regex(self.pattern(PatternKind::Glob, source)?)
            }
            ELEM_MATCH => {
                let sub = value.as_object().ok_or_else(|| invalid("an object"))?;
                let mut sub_path = path.to_vec();
                sub_path.push(ELEM_MATCH.to_string());
                let node = self.compile_node(sub, &mut sub_path)?;
                Operator::ElemMatch(Box::new(FlatFilter::from_node(&node)))
            }
            other => {
                return Err(FilterError::UnknownOperator {
                    op: other.to_string(),
                    path: path.join("."),
                })
            }
        };

        Ok(op)
    }

    fn pattern(&self, kind: PatternKind, source: &str) -> FilterResult<CompiledPattern> {
        match self.cache {
            Some(cache) => cache.get_or_compile(kind, source),
            None => CompiledPattern::compile(kind, source),
        }
    }
}

fn is_operator_entry(key: &str, value: &Value) -> bool {
    key == ELEM_MATCH || !value.is_object()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
