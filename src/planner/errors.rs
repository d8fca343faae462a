//! Planner error types
//!
//! Error codes:
//! - AERO_QUERY_INVALID (REJECT)
//! - AERO_QUERY_SORT_MISMATCH (REJECT)
//! - AERO_QUERY_SORT_DIRECTION_INVALID (REJECT)
//! - AERO_QUERY_NO_TYPES (REJECT)
//!
//! Every planner error is raised before any record is scanned.

use std::fmt;

use crate::filter::FilterError;

/// Severity levels for planner errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Planner-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerErrorCode {
    /// Filter tree does not compile
    AeroQueryInvalid,
    /// Sort fields and directions differ in length
    AeroQuerySortMismatch,
    /// Sort direction is not asc/desc
    AeroQuerySortDirectionInvalid,
    /// No logical type requested
    AeroQueryNoTypes,
}

impl PlannerErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            PlannerErrorCode::AeroQueryInvalid => "AERO_QUERY_INVALID",
            PlannerErrorCode::AeroQuerySortMismatch => "AERO_QUERY_SORT_MISMATCH",
            PlannerErrorCode::AeroQuerySortDirectionInvalid => "AERO_QUERY_SORT_DIRECTION_INVALID",
            PlannerErrorCode::AeroQueryNoTypes => "AERO_QUERY_NO_TYPES",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for PlannerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Planner error type with full context
#[derive(Debug, Clone)]
pub struct PlannerError {
    /// Error code
    code: PlannerErrorCode,
    /// Human-readable message
    message: String,
    /// Underlying filter compilation failure
    source: Option<FilterError>,
}

impl PlannerError {
    /// Create a query invalid error from a compilation failure
    pub fn query_invalid(source: FilterError) -> Self {
        Self {
            code: PlannerErrorCode::AeroQueryInvalid,
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a sort length mismatch error
    pub fn sort_mismatch(fields: usize, order: usize) -> Self {
        Self {
            code: PlannerErrorCode::AeroQuerySortMismatch,
            message: format!(
                "Sort has {} field(s) but {} direction(s)",
                fields, order
            ),
            source: None,
        }
    }

    /// Create an invalid sort direction error
    pub fn sort_direction_invalid(token: impl Into<String>) -> Self {
        Self {
            code: PlannerErrorCode::AeroQuerySortDirectionInvalid,
            message: format!(
                "Sort direction '{}' is not 'asc' or 'desc'",
                token.into()
            ),
            source: None,
        }
    }

    /// Create a missing types error
    pub fn no_types() -> Self {
        Self {
            code: PlannerErrorCode::AeroQueryNoTypes,
            message: "Query must name at least one type".into(),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> PlannerErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the filter compilation failure, if that was the cause
    pub fn filter_error(&self) -> Option<&FilterError> {
        self.source.as_ref()
    }
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for PlannerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<FilterError> for PlannerError {
    fn from(err: FilterError) -> Self {
        Self::query_invalid(err)
    }
}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
