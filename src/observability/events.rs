//! Observability events for memql
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events in memql
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A statement compiled into a plan
    PlanCompiled,
    /// A statement was rejected at compile time
    PlanRejected,
    /// A plan ran over a record slice
    PlanExecuted,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::PlanCompiled => "PLAN_COMPILED",
            Event::PlanRejected => "PLAN_REJECTED",
            Event::PlanExecuted => "PLAN_EXECUTED",
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
        let events = [Event::PlanCompiled, Event::PlanRejected, Event::PlanExecuted];

        for event in events {
            let name = event.as_str();
            assert!(!name.is_empty());
            assert_eq!(name, name.to_uppercase());
            assert_eq!(event.to_string(), name);
        }
    }
}
