//! Observability subsystem
//!
//! - Structured logging (JSON), one event per line
//! - Atomic counters for query execution
//!
//! Observability is read-only: nothing here changes query results.
//!
//! # Usage
//!
//! ```ignore
//! use aeroquery::observability::{log_event, Event, MetricsRegistry};
//!
//! log_event(Event::QueryExecuted, &[("returned", "3")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_queries_executed();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log an event at its own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    let severity = event.severity();
    if severity >= Severity::Error {
        Logger::log_stderr(severity, event.as_str(), fields);
    } else {
        Logger::log(severity, event.as_str(), fields);
    }
}
