//! Query Executor subsystem
//!
//! The executor consumes plans and produces deterministic results.
//!
//! # Execution Flow (strict order)
//!
//! 1. Plan the query; reject malformed filters and sorts before scanning
//! 2. Identifier lookup when the plan allows it
//! 3. Otherwise concatenate the records of every requested type
//! 4. Filter records strictly according to the flat predicate
//! 5. Apply sort (if specified, all-matches mode only)
//! 6. Return ordered results
//!
//! An all-matches query that matches nothing returns "no results"
//! (`QueryOutput::records == None`), distinct from an empty list.

mod compare;
mod errors;
mod executor;
mod filters;
pub(crate) mod path;
mod result;
mod sorter;

pub use compare::{compare_values, values_equal};
pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult, Severity};
pub use executor::QueryExecutor;
pub use filters::PredicateFilter;
pub use path::lookup as lookup_path;
pub use result::QueryOutput;
pub use sorter::ResultSorter;
