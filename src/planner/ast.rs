//! Query argument structures
//!
//! The caller-facing description of one query: filter tree, optional sort,
//! resolved-fields map, requested types and retrieval mode.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Parses `asc`/`desc`, case-insensitively
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if token.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}

/// Sort specification as supplied by the caller.
///
/// `fields` and `order` are parallel lists; their lengths must match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    /// Dotted field paths, primary key first
    pub fields: Vec<String>,
    /// Direction tokens (`asc`/`desc`)
    pub order: Vec<String>,
}

impl SortSpec {
    pub fn new<F, O>(fields: F, order: O) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            order: order.into_iter().map(Into::into).collect(),
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new([field.into()], ["asc"])
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new([field.into()], ["desc"])
    }

    /// Adds a tie-breaking key
    pub fn then(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.fields.push(field.into());
        self.order.push(direction.as_str().to_string());
        self
    }
}

/// One validated, redirected sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Dotted path the value is read from
    pub path: String,
    pub direction: SortDirection,
}

/// Retrieval mode, fixed for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// At most one record, never sorted
    FirstOnly,
    /// Every match, sorted if requested
    All,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::FirstOnly => "first_only",
            ExecutionMode::All => "all",
        }
    }
}

/// Arguments of one query call
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryArgs {
    /// Nested filter tree; `null` or `{}` matches everything
    #[serde(default)]
    pub filter: Value,
    /// Optional sort
    #[serde(default)]
    pub sort: Option<SortSpec>,
    /// Nested map whose leaves mark resolved field paths
    #[serde(default)]
    pub resolved_fields: Value,
    /// Logical types whose records are queried, unioned in order
    #[serde(default)]
    pub type_names: Vec<String>,
    /// Return at most the first match
    #[serde(default)]
    pub first_only: bool,
}

impl QueryArgs {
    /// Creates arguments querying the given types with no constraints
    pub fn new<T>(type_names: T) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            type_names: type_names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_resolved_fields(mut self, resolved_fields: Value) -> Self {
        self.resolved_fields = resolved_fields;
        self
    }

    /// Switches to first-only retrieval
    pub fn first_only(mut self) -> Self {
        self.first_only = true;
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        if self.first_only {
            ExecutionMode::FirstOnly
        } else {
            ExecutionMode::All
        }
    }
}
