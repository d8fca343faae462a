//! Executor error types
//!
//! Error codes:
//! - AERO_QUERY_REJECTED (REJECT)
//! - AERO_EXECUTION_FAILED (ERROR)

use std::fmt;

use crate::planner::PlannerError;
use crate::store::StoreError;

/// Severity levels for executor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected before scanning
    Reject,
    /// Operation failed while scanning
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Executor-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// Query could not be planned
    AeroQueryRejected,
    /// Record store failed during execution
    AeroExecutionFailed,
}

impl ExecutorErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::AeroQueryRejected => "AERO_QUERY_REJECTED",
            ExecutorErrorCode::AeroExecutionFailed => "AERO_EXECUTION_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            ExecutorErrorCode::AeroQueryRejected => Severity::Reject,
            ExecutorErrorCode::AeroExecutionFailed => Severity::Error,
        }
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug)]
enum Cause {
    Planner(PlannerError),
    Store(StoreError),
}

/// Executor error type with full context
#[derive(Debug)]
pub struct ExecutorError {
    /// Error code
    code: ExecutorErrorCode,
    /// Human-readable message
    message: String,
    /// Underlying failure
    cause: Cause,
}

impl ExecutorError {
    /// Create a rejection from a planner error
    pub fn rejected(source: PlannerError) -> Self {
        Self {
            code: ExecutorErrorCode::AeroQueryRejected,
            message: format!("{}: {}", source.code(), source.message()),
            cause: Cause::Planner(source),
        }
    }

    /// Create an execution failed error from a store error
    pub fn store_failed(source: StoreError) -> Self {
        Self {
            code: ExecutorErrorCode::AeroExecutionFailed,
            message: format!("record store failed: {}", source),
            cause: Cause::Store(source),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ExecutorErrorCode {
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

    /// Returns the planner error behind a rejection
    pub fn planner_error(&self) -> Option<&PlannerError> {
        match &self.cause {
            Cause::Planner(err) => Some(err),
            Cause::Store(_) => None,
        }
    }

    /// Returns the store error behind an execution failure
    pub fn store_error(&self) -> Option<&StoreError> {
        match &self.cause {
            Cause::Store(err) => Some(err),
            Cause::Planner(_) => None,
        }
    }

    /// Returns whether the caller's request was at fault
    pub fn is_rejection(&self) -> bool {
        self.severity() == Severity::Reject
    }
}

impl fmt::Display for ExecutorError {
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

impl std::error::Error for ExecutorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            Cause::Planner(err) => Some(err),
            Cause::Store(err) => Some(err),
        }
    }
}

impl From<PlannerError> for ExecutorError {
    fn from(err: PlannerError) -> Self {
        Self::rejected(err)
    }
}

impl From<StoreError> for ExecutorError {
    fn from(err: StoreError) -> Self {
        Self::store_failed(err)
    }
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
