//! Result types for query execution

use serde_json::Value;

use crate::planner::{ExecutionMode, ScanType};

/// Result of query execution
///
/// `records` is `None` when an all-matches query found nothing. A
/// first-only query always yields `Some` holding zero or one record.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    /// Records in result order, or `None` for "no results"
    pub records: Option<Vec<Value>>,
    /// Number of records evaluated
    pub scanned_count: usize,
    /// How candidates were obtained
    pub scan_type: ScanType,
    /// Retrieval mode the query ran in
    pub mode: ExecutionMode,
}

impl QueryOutput {
    /// Creates a result holding `records`
    pub fn found(records: Vec<Value>, scanned_count: usize, scan_type: ScanType, mode: ExecutionMode) -> Self {
        Self {
            records: Some(records),
            scanned_count,
            scan_type,
            mode,
        }
    }

    /// Creates the "no results" signal
    pub fn no_results(scanned_count: usize, scan_type: ScanType, mode: ExecutionMode) -> Self {
        Self {
            records: None,
            scanned_count,
            scan_type,
            mode,
        }
    }

    /// Returns true for the "no results" signal
    pub fn is_no_results(&self) -> bool {
        self.records.is_none()
    }

    /// Returns true if no records are held
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of results
    pub fn len(&self) -> usize {
        self.records.as_ref().map_or(0, Vec::len)
    }

    pub fn records(&self) -> Option<&[Value]> {
        self.records.as_deref()
    }

    /// First record, if any
    pub fn first(&self) -> Option<&Value> {
        self.records.as_ref().and_then(|records| records.first())
    }

    pub fn into_records(self) -> Option<Vec<Value>> {
        self.records
    }
}
