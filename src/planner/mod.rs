//! Query compiler subsystem for memql
//!
//! Turns a parsed `SelectStatement` into an immutable, reusable plan.
//!
//! # Pipeline
//!
//! 1. Decode (JSON input only): node kinds are dispatched by tag
//! 2. Field list and order-by list are captured as declared
//! 3. The WHERE tree compiles into a combinator tree of predicates
//! 4. Every literal is coerced, and every pattern compiled, up front
//!
//! All failures surface here, at compile time. A plan that compiled never
//! fails to execute.

mod ast;
mod compiler;
mod decode;
mod errors;
mod explain;
mod leaf;
mod literal;
mod predicate;

pub use ast::{
    BinaryNode, Expression, FieldList, Filter, Operator, OrderBy, PredicateNode, SelectField,
    SelectStatement, SortDirection, SortSpec,
};
pub use compiler::{QueryCompiler, QueryPlan};
pub use decode::{expression as decode_expression, select_statement as decode_statement};
pub use errors::{CompileError, CompileErrorCode, CompileResult, Severity as CompileSeverity};
pub use explain::ExplainPlan;
pub use leaf::{LeafBuilder, PredicateKind};
pub use literal::{LiteralCoercer, LIKE_WILDCARD};
pub use predicate::{CompareOp, FieldTest, LeafTest, Predicate};
