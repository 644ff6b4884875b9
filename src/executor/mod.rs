//! Query Executor subsystem for memql
//!
//! The executor consumes compiled plans and produces deterministic results.
//!
//! # Execution Flow (strict order)
//!
//! 1. Filter records against every top-level predicate
//! 2. Project survivors
//! 3. Apply sort (if specified)
//!
//! # Invariants
//!
//! - Deterministic execution
//! - No execute-time errors: absent fields degrade to "no value"
//! - Input records are never mutated

mod executor;
mod filters;
mod projector;
mod resolver;
mod result;
mod sorter;

pub use executor::QueryExecutor;
pub use filters::PredicateFilter;
pub use projector::Projector;
pub use resolver::{has_own_property, own_property, resolve};
pub use result::ExecutionResult;
pub use sorter::ResultSorter;
