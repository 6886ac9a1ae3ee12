//! Observable index events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Index manager built from its definitions
    ManagerCreated,
    /// Index definitions rejected
    ConfigRejected,
    /// Full rebuild started
    RebuildBegin,
    /// Full rebuild finished
    RebuildComplete,
    /// Rebuild stopped by an invalid item
    RebuildFailed,
    /// Add/remove refused a value; no index was touched
    MutationRejected,
    /// All indexes cleared
    IndexCleared,
    /// Predicate resolved to a candidate result
    CandidatesCollected,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ManagerCreated => "MANAGER_CREATED",
            Event::ConfigRejected => "CONFIG_REJECTED",
            Event::RebuildBegin => "REBUILD_BEGIN",
            Event::RebuildComplete => "REBUILD_COMPLETE",
            Event::RebuildFailed => "REBUILD_FAILED",
            Event::MutationRejected => "MUTATION_REJECTED",
            Event::IndexCleared => "INDEX_CLEARED",
            Event::CandidatesCollected => "CANDIDATES_COLLECTED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigRejected | Event::RebuildFailed => Severity::Error,
            Event::MutationRejected => Severity::Warn,
            Event::CandidatesCollected => Severity::Trace,
            Event::ManagerCreated
            | Event::RebuildBegin
            | Event::RebuildComplete
            | Event::IndexCleared => Severity::Info,
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
    fn test_event_names() {
        assert_eq!(Event::RebuildBegin.as_str(), "REBUILD_BEGIN");
        assert_eq!(Event::CandidatesCollected.to_string(), "CANDIDATES_COLLECTED");
    }

    #[test]
    fn test_event_severities() {
        assert_eq!(Event::ConfigRejected.severity(), Severity::Error);
        assert_eq!(Event::MutationRejected.severity(), Severity::Warn);
        assert_eq!(Event::CandidatesCollected.severity(), Severity::Trace);
        assert_eq!(Event::RebuildComplete.severity(), Severity::Info);
    }
}
