//! In-memory record store
//!
//! Records are kept in insertion order per type. Resolved values are held
//! separately and attached under the shadow namespace whenever a record is
//! handed out, so lookups and enumeration return identical records.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::config::QueryConfig;
use crate::executor::path;

use super::errors::{StoreError, StoreResult};
use super::RecordStore;

/// Insertion-ordered record store
#[derive(Debug, Clone)]
pub struct MemoryStore {
    id_field: String,
    type_field: String,
    shadow_namespace: String,
    records: Vec<Value>,
    by_id: HashMap<String, usize>,
    resolved: HashMap<String, Value>,
}

impl MemoryStore {
    /// Creates an empty store using the configured field names
    pub fn new(config: &QueryConfig) -> Self {
        Self {
            id_field: config.id_field.clone(),
            type_field: config.type_field.clone(),
            shadow_namespace: config.shadow_namespace.clone(),
            records: Vec::new(),
            by_id: HashMap::new(),
            resolved: HashMap::new(),
        }
    }

    /// Creates a store holding `records`, in order
    pub fn with_records<I>(config: &QueryConfig, records: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut store = Self::new(config);
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Adds a record, replacing any record with the same id in place.
    /// Resolved values attached to a replaced record are dropped.
    pub fn insert(&mut self, record: Value) -> StoreResult<()> {
        let id = self.record_id(&record)?;
        match self.by_id.get(&id).copied() {
            Some(slot) => {
                self.records[slot] = record;
                self.resolved.remove(&id);
            }
            None => {
                self.by_id.insert(id, self.records.len());
                self.records.push(record);
            }
        }
        Ok(())
    }

    /// Attaches derived values to a stored record
    pub fn set_resolved(&mut self, id: &str, resolved: Value) -> StoreResult<()> {
        if !self.by_id.contains_key(id) {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        self.resolved.insert(id.to_string(), resolved);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn record_id(&self, record: &Value) -> StoreResult<String> {
        path::lookup_first(record, &self.id_field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StoreError::MissingId {
                field: self.id_field.clone(),
            })
    }

    fn type_of<'a>(&self, record: &'a Value) -> Option<&'a str> {
        path::lookup_first(record, &self.type_field).and_then(Value::as_str)
    }

    /// The record as queries see it: resolved values under the namespace
    fn materialize(&self, record: &Value) -> Value {
        let resolved = self
            .record_id(record)
            .ok()
            .and_then(|id| self.resolved.get(&id));

        match (record, resolved) {
            (Value::Object(fields), Some(resolved)) => {
                let mut fields: Map<String, Value> = fields.clone();
                fields.insert(self.shadow_namespace.clone(), resolved.clone());
                Value::Object(fields)
            }
            _ => record.clone(),
        }
    }
}

impl RecordStore for MemoryStore {
    fn lookup_by_id(&self, id: &str) -> StoreResult<Option<Value>> {
        Ok(self
            .by_id
            .get(id)
            .map(|&slot| self.materialize(&self.records[slot])))
    }

    fn records_and_resolved_by_type(&self, type_name: &str) -> StoreResult<Vec<Value>> {
        Ok(self
            .records
            .iter()
            .filter(|record| self.type_of(record) == Some(type_name))
            .map(|record| self.materialize(record))
            .collect())
    }
}
