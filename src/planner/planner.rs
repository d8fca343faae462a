//! Query planner
//!
//! Turns caller arguments into an immutable plan:
//! 1. Validate requested types and the sort specification
//! 2. Compile and flatten the filter tree
//! 3. Choose identifier lookup or full scan
//! 4. Redirect filter and sort paths that touch resolved fields
//!
//! Every rejection happens here, before any record is read.

use crate::config::QueryConfig;
use crate::filter::{FilterCompiler, FlatFilter};
use crate::observability::{log_event, Event};

use super::ast::{ExecutionMode, QueryArgs, SortDirection, SortKey, SortSpec};
use super::errors::{PlannerError, PlannerResult};
use super::resolved::ResolvedFields;

/// Scan type used by query plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanType {
    /// Direct lookup of a single identifier
    IdLookup(String),
    /// Evaluate the predicate against every record of the requested types
    FullScan,
}

impl ScanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::IdLookup(_) => "ID_LOOKUP",
            ScanType::FullScan => "FULL_SCAN",
        }
    }
}

/// Immutable query plan (no runtime state)
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    /// Flattened, redirected predicate (AND of all entries)
    pub filter: FlatFilter,
    /// Redirected sort keys, primary first; empty means unsorted
    pub sort: Vec<SortKey>,
    /// Requested types, deduplicated, in request order
    pub type_names: Vec<String>,
    /// Retrieval mode
    pub mode: ExecutionMode,
    /// Scan type
    pub scan_type: ScanType,
}

impl QueryPlan {
    /// True if a sort was requested
    pub fn has_sort(&self) -> bool {
        !self.sort.is_empty()
    }

    /// True if `type_name` is one of the requested types
    pub fn includes_type(&self, type_name: &str) -> bool {
        self.type_names.iter().any(|t| t == type_name)
    }
}

/// Query planner that produces deterministic plans
pub struct QueryPlanner<'a> {
    config: &'a QueryConfig,
    compiler: FilterCompiler<'static>,
}

impl<'a> QueryPlanner<'a> {
    /// Creates a new planner
    pub fn new(config: &'a QueryConfig) -> Self {
        let compiler = if config.pattern_cache {
            FilterCompiler::new()
        } else {
            FilterCompiler::uncached()
        };
        Self { config, compiler }
    }

    /// Plans a query, returning an immutable plan or error.
    ///
    /// This method is deterministic: same inputs → same plan.
    pub fn plan(&self, args: &QueryArgs) -> PlannerResult<QueryPlan> {
        // 1. Validate requested types
        let type_names = dedup_types(&args.type_names);
        if type_names.is_empty() {
            return Err(PlannerError::no_types());
        }

        // 2. Validate sort before anything is scanned
        let sort = match &args.sort {
            Some(spec) => validate_sort(spec)?,
            None => Vec::new(),
        };

        // 3. Compile and flatten
        let tree = self.compiler.compile(&args.filter)?;
        let flat = FlatFilter::from_node(&tree);

        // 4. Fast path is decided on the pre-redirection filter
        let resolved = ResolvedFields::from_value(&args.resolved_fields);
        let mode = args.mode();
        let scan_type = self.select_scan(mode, &flat, &resolved);

        // 5. Redirect filter and sort paths
        let namespace = self.config.shadow_namespace.as_str();
        let filter = resolved.redirect_filter(namespace, flat);
        let sort = sort
            .into_iter()
            .map(|key| SortKey {
                path: resolved.redirect_path(namespace, &key.path, false),
                direction: key.direction,
            })
            .collect::<Vec<_>>();

        log_event(
            Event::QueryPlanned,
            &[
                ("filter_paths", &filter.len().to_string()),
                ("mode", mode.as_str()),
                ("scan", scan_type.as_str()),
                ("sort_keys", &sort.len().to_string()),
            ],
        );

        Ok(QueryPlan {
            filter,
            sort,
            type_names,
            mode,
            scan_type,
        })
    }

    /// Identifier lookup applies only to a first-only query whose whole
    /// filter is one string `eq` on the id field, and only while that field
    /// is read from the record itself.
    fn select_scan(&self, mode: ExecutionMode, flat: &FlatFilter, resolved: &ResolvedFields) -> ScanType {
        if mode != ExecutionMode::FirstOnly || !self.config.fast_path {
            return ScanType::FullScan;
        }

        let Some((path, leaf)) = flat.sole_entry() else {
            return ScanType::FullScan;
        };

        if path != self.config.id_field || resolved.needs_shadow(path, false) {
            return ScanType::FullScan;
        }

        match leaf.sole_eq().and_then(|value| value.as_str()) {
            Some(id) => ScanType::IdLookup(id.to_string()),
            None => ScanType::FullScan,
        }
    }
}

fn validate_sort(spec: &SortSpec) -> PlannerResult<Vec<SortKey>> {
    if spec.fields.len() != spec.order.len() {
        return Err(PlannerError::sort_mismatch(spec.fields.len(), spec.order.len()));
    }

    spec.fields
        .iter()
        .zip(&spec.order)
        .map(|(field, token)| {
            let direction = SortDirection::parse(token)
                .ok_or_else(|| PlannerError::sort_direction_invalid(token))?;
            Ok(SortKey {
                path: field.clone(),
                direction,
            })
        })
        .collect()
}

fn dedup_types(type_names: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(type_names.len());
    for name in type_names {
        if !unique.contains(name) {
            unique.push(name.clone());
        }
    }
    unique
}
