//! Query Planner subsystem
//!
//! The planner produces deterministic, immutable plans from query arguments.
//!
//! # Design Principles
//!
//! - Deterministic: same arguments → same plan
//! - Fail early: malformed filters and sorts are rejected before scanning
//! - Transparent: callers never need to know which fields are resolved
//!
//! # Scan Selection
//!
//! 1. Identifier lookup for a first-only query that is exactly `id eq <string>`
//! 2. Full scan otherwise

mod ast;
mod errors;
mod planner;
mod resolved;

pub use ast::{ExecutionMode, QueryArgs, SortDirection, SortKey, SortSpec};
pub use errors::{PlannerError, PlannerErrorCode, PlannerResult};
pub use planner::{QueryPlan, QueryPlanner, ScanType};
pub use resolved::ResolvedFields;
