//! Query executor
//!
//! Executes query plans against a record store, producing deterministic
//! results.
//!
//! Execution flow (strict order):
//! 1. Plan: compile, flatten, validate sort, redirect resolved fields
//! 2. Identifier lookup if the plan allows it, done
//! 3. Otherwise gather records of every requested type, in type order
//! 4. Filter records strictly according to the flat predicate
//! 5. Apply sort (all-matches mode only)
//! 6. Return ordered results, or "no results"

use serde_json::Value;

use crate::config::QueryConfig;
use crate::observability::{log_event, Event, MetricsRegistry};
use crate::planner::{ExecutionMode, QueryArgs, QueryPlan, QueryPlanner, ScanType};
use crate::store::RecordStore;

use super::errors::{ExecutorError, ExecutorResult};
use super::filters::PredicateFilter;
use super::path;
use super::result::QueryOutput;
use super::sorter::ResultSorter;

/// Query executor that processes queries against a record store
pub struct QueryExecutor<'a, S: RecordStore> {
    store: &'a S,
    config: &'a QueryConfig,
    metrics: Option<&'a MetricsRegistry>,
}

impl<'a, S: RecordStore> QueryExecutor<'a, S> {
    /// Creates a new executor
    pub fn new(store: &'a S, config: &'a QueryConfig) -> Self {
        Self {
            store,
            config,
            metrics: None,
        }
    }

    /// Reports counters into `metrics`
    pub fn with_metrics(mut self, metrics: &'a MetricsRegistry) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Executes a query over the records of its requested types.
    ///
    /// This method is deterministic: same arguments + same store = same results.
    pub fn execute(&self, args: &QueryArgs) -> ExecutorResult<QueryOutput> {
        let plan = self.plan(args)?;

        if let ScanType::IdLookup(id) = &plan.scan_type {
            return self.finish(self.execute_id_lookup(&plan, id));
        }

        let mut records = Vec::new();
        for type_name in &plan.type_names {
            records.extend(self.store.records_and_resolved_by_type(type_name)?);
        }

        self.finish(Ok(self.execute_plan(&plan, records)))
    }

    /// Executes a query over caller-supplied records.
    ///
    /// The store is never consulted. Supplied records are taken to be of the
    /// requested types, so an identifier lookup picks the first record
    /// carrying the identifier, as a scan would.
    pub fn execute_on_records(
        &self,
        records: Vec<Value>,
        args: &QueryArgs,
    ) -> ExecutorResult<QueryOutput> {
        let plan = self.plan(args)?;

        if let ScanType::IdLookup(id) = &plan.scan_type {
            let position = records.iter().position(|record| {
                path::lookup_first(record, &self.config.id_field).and_then(Value::as_str)
                    == Some(id.as_str())
            });
            let scanned_count = position.map_or(records.len(), |index| index + 1);
            let matched = position.and_then(|index| records.into_iter().nth(index));
            return self.finish(Ok(self.id_lookup_output(&plan, id, matched, scanned_count)));
        }

        self.finish(Ok(self.execute_plan(&plan, records)))
    }

    /// Scans `records` with an already built plan
    pub fn execute_plan(&self, plan: &QueryPlan, records: Vec<Value>) -> QueryOutput {
        match plan.mode {
            ExecutionMode::FirstOnly => {
                let mut scanned_count = 0;
                for record in records {
                    scanned_count += 1;
                    if PredicateFilter::matches(&record, &plan.filter) {
                        return QueryOutput::found(
                            vec![record],
                            scanned_count,
                            ScanType::FullScan,
                            plan.mode,
                        );
                    }
                }
                QueryOutput::found(Vec::new(), scanned_count, ScanType::FullScan, plan.mode)
            }
            ExecutionMode::All => {
                let scanned_count = records.len();
                let mut matched: Vec<Value> = if plan.filter.is_empty() {
                    records
                } else {
                    records
                        .into_iter()
                        .filter(|record| PredicateFilter::matches(record, &plan.filter))
                        .collect()
                };

                if matched.is_empty() {
                    return QueryOutput::no_results(scanned_count, ScanType::FullScan, plan.mode);
                }

                if plan.has_sort() {
                    ResultSorter::sort(&mut matched, &plan.sort);
                }

                QueryOutput::found(matched, scanned_count, ScanType::FullScan, plan.mode)
            }
        }
    }

    fn plan(&self, args: &QueryArgs) -> ExecutorResult<QueryPlan> {
        let type_count = args.type_names.len().to_string();
        log_event(
            Event::QueryReceived,
            &[("mode", args.mode().as_str()), ("types", &type_count)],
        );

        QueryPlanner::new(self.config).plan(args).map_err(|err| {
            log_event(
                Event::QueryRejected,
                &[("code", err.code().code()), ("message", err.message())],
            );
            if let Some(metrics) = self.metrics {
                metrics.increment_queries_rejected();
            }
            ExecutorError::from(err)
        })
    }

    /// Direct lookup; a missing record or one of another type is no match
    fn execute_id_lookup(&self, plan: &QueryPlan, id: &str) -> ExecutorResult<QueryOutput> {
        let record = self.store.lookup_by_id(id)?;
        let scanned_count = usize::from(record.is_some());
        let matched = record.filter(|record| self.has_planned_type(plan, record));

        Ok(self.id_lookup_output(plan, id, matched, scanned_count))
    }

    fn has_planned_type(&self, plan: &QueryPlan, record: &Value) -> bool {
        path::lookup_first(record, &self.config.type_field)
            .and_then(Value::as_str)
            .map_or(false, |type_name| plan.includes_type(type_name))
    }

    fn id_lookup_output(
        &self,
        plan: &QueryPlan,
        id: &str,
        matched: Option<Value>,
        scanned_count: usize,
    ) -> QueryOutput {
        log_event(
            Event::QueryFastPath,
            &[("found", if matched.is_some() { "true" } else { "false" }), ("id", id)],
        );
        if let Some(metrics) = self.metrics {
            metrics.increment_fast_path_hits();
        }

        QueryOutput::found(
            matched.into_iter().collect(),
            scanned_count,
            plan.scan_type.clone(),
            plan.mode,
        )
    }

    fn finish(&self, output: ExecutorResult<QueryOutput>) -> ExecutorResult<QueryOutput> {
        let output = output?;
        let returned = output.len();

        log_event(
            Event::QueryExecuted,
            &[
                ("mode", output.mode.as_str()),
                ("no_results", if output.is_no_results() { "true" } else { "false" }),
                ("returned", &returned.to_string()),
                ("scan", output.scan_type.as_str()),
                ("scanned", &output.scanned_count.to_string()),
            ],
        );

        if let Some(metrics) = self.metrics {
            metrics.increment_queries_executed();
            metrics.add_records_scanned(output.scanned_count as u64);
            metrics.add_records_returned(returned as u64);
            if output.is_no_results() {
                metrics.increment_no_result_queries();
            }
        }

        Ok(output)
    }
}
