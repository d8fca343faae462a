//! Observable query events
//!
//! Events are explicit and typed; every log line names one of them.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Query operations
    /// Query received
    QueryReceived,
    /// Filter compiled, flattened and redirected
    QueryPlanned,
    /// Identifier lookup used instead of a scan
    QueryFastPath,
    /// Query executed successfully
    QueryExecuted,
    /// Query rejected before scanning
    QueryRejected,

    // Patterns
    /// Regex or glob compiled (cache miss)
    PatternCompiled,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::QueryReceived => "QUERY_BEGIN",
            Event::QueryPlanned => "QUERY_PLANNED",
            Event::QueryFastPath => "QUERY_FAST_PATH",
            Event::QueryExecuted => "QUERY_COMPLETE",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::PatternCompiled => "PATTERN_COMPILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded => Severity::Info,
            Event::QueryRejected => Severity::Warn,
            _ => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Event; 7] = [
        Event::ConfigLoaded,
        Event::QueryReceived,
        Event::QueryPlanned,
        Event::QueryFastPath,
        Event::QueryExecuted,
        Event::QueryRejected,
        Event::PatternCompiled,
    ];

    #[test]
    fn test_all_events_have_string_representation() {
        for event in ALL {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_per_query_events_are_trace() {
        assert_eq!(Event::QueryReceived.severity(), Severity::Trace);
        assert_eq!(Event::QueryExecuted.severity(), Severity::Trace);
        assert_eq!(Event::QueryRejected.severity(), Severity::Warn);
        assert_eq!(Event::ConfigLoaded.severity(), Severity::Info);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::QueryExecuted), "QUERY_COMPLETE");
        assert_eq!(format!("{}", Event::QueryFastPath), "QUERY_FAST_PATH");
    }
}
