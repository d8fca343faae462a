//! Filter subsystem
//!
//! Compiles the nested, user-facing filter tree into typed operators and
//! flattens it into the dotted-path form the executor evaluates.
//!
//! # Pipeline
//!
//! 1. `FilterCompiler` decides path vs operator once, by value shape
//! 2. `regex` and `glob` operands compile into cached matchers
//! 3. `FlatFilter::from_node` flattens to dotted paths, stopping at `elemMatch`

mod ast;
mod compiler;
mod errors;
mod flatten;
mod pattern;

pub use ast::{FilterNode, Operator, OperatorLeaf, ELEM_MATCH};
pub use compiler::FilterCompiler;
pub use errors::{FilterError, FilterResult};
pub use flatten::FlatFilter;
pub use pattern::{glob_to_regex, CompiledPattern, PatternCache, PatternCacheStats, PatternKind};
