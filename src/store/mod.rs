//! Record store collaborator
//!
//! The query executor never owns records. It asks a [`RecordStore`] for a
//! single record by identifier (identifier lookup) or for every record of
//! one logical type (full scan). Records handed out already carry their
//! resolved values under the shadow namespace.

mod errors;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;

use serde_json::Value;

/// Read access to records
pub trait RecordStore {
    /// Look up one record by identifier
    fn lookup_by_id(&self, id: &str) -> StoreResult<Option<Value>>;

    /// Every record of one type, in store order, with resolved values attached
    fn records_and_resolved_by_type(&self, type_name: &str) -> StoreResult<Vec<Value>>;
}
