//! Observability subsystem for memql
//!
//! Structured JSON-line logging of plan lifecycle events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on execution
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use memql::observability::{Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! Logger::trace(Event::PlanExecuted.as_str(), &[("returned", "3")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
