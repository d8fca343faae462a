//! aeroquery - A strict, deterministic in-memory filter-and-sort query executor
//!
//! Queries are nested filter trees plus an optional sort. They are planned
//! once (compiled, flattened, redirected onto resolved fields) and then
//! evaluated against the records of one or more logical types held by a
//! [`store::RecordStore`].
//!
//! ```ignore
//! use aeroquery::config::QueryConfig;
//! use aeroquery::executor::QueryExecutor;
//! use aeroquery::planner::{QueryArgs, SortSpec};
//! use aeroquery::store::MemoryStore;
//! use serde_json::json;
//!
//! let config = QueryConfig::default();
//! let store = MemoryStore::with_records(&config, records)?;
//! let output = QueryExecutor::new(&store, &config).execute(
//!     &QueryArgs::new(["Post"])
//!         .with_filter(json!({ "fields": { "draft": { "ne": true } } }))
//!         .with_sort(SortSpec::desc("date")),
//! )?;
//! ```

pub mod config;
pub mod executor;
pub mod filter;
pub mod observability;
pub mod planner;
pub mod store;
