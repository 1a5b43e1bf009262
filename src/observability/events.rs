//! Observable events
//!
//! Every lifecycle step of a session has a typed event with a stable name.

use std::fmt;

use super::logger::Severity;

/// Observable events in pageflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Session created
    SessionStart,
    /// Session torn down
    SessionEnd,
    /// Configuration loaded
    ConfigLoaded,

    // Query operations
    /// Query applied to a dataset
    QueryApplied,
    /// Query rejected before execution
    QueryRejected,

    // Fetch lifecycle
    /// Fetch issued for a trigger
    FetchBegin,
    /// Fetch result merged into the visible list
    FetchApplied,
    /// Fetch result superseded by a newer trigger and dropped
    FetchStale,
    /// Data provider failed
    FetchFailed,
    /// Load-more refused (completed or already in flight)
    LoadMoreSkipped,

    // Input
    /// Debounced search text released
    SearchDebounced,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SessionStart => "SESSION_START",
            Event::SessionEnd => "SESSION_END",
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::QueryApplied => "QUERY_APPLIED",
            Event::QueryRejected => "QUERY_REJECTED",

            Event::FetchBegin => "FETCH_BEGIN",
            Event::FetchApplied => "FETCH_APPLIED",
            Event::FetchStale => "FETCH_STALE",
            Event::FetchFailed => "FETCH_FAILED",
            Event::LoadMoreSkipped => "LOAD_MORE_SKIPPED",

            Event::SearchDebounced => "SEARCH_DEBOUNCED",
        }
    }

    /// Default severity of the event
    pub fn severity(&self) -> Severity {
        match self {
            Event::FetchFailed | Event::QueryRejected => Severity::Error,
            Event::SessionStart | Event::SessionEnd | Event::ConfigLoaded => Severity::Info,
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

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::SessionStart,
            Event::SessionEnd,
            Event::ConfigLoaded,
            Event::QueryApplied,
            Event::QueryRejected,
            Event::FetchBegin,
            Event::FetchApplied,
            Event::FetchStale,
            Event::FetchFailed,
            Event::LoadMoreSkipped,
            Event::SearchDebounced,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_failures_are_errors() {
        assert_eq!(Event::FetchFailed.severity(), Severity::Error);
        assert_eq!(Event::FetchStale.severity(), Severity::Trace);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::LoadMoreSkipped), "LOAD_MORE_SKIPPED");
    }
}
