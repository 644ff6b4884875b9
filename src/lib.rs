//! memql - compiles SELECT statements into reusable plans that filter,
//! project and sort in-memory JSON records
//!
//! ```ignore
//! use memql::{CompilerConfig, Expression, QueryCompiler, SelectField, SelectStatement, SortSpec};
//!
//! let statement = SelectStatement::new(vec![SelectField::new("name")])
//!     .with_filter(Expression::compare("founded_year", "gte", "1999"))
//!     .with_sort(SortSpec::desc("founded_year"));
//!
//! let plan = QueryCompiler::new(CompilerConfig::default()).compile(&statement)?;
//! let rows = plan.execute(&records);
//! ```

pub mod cli;
pub mod config;
pub mod executor;
pub mod observability;
pub mod planner;
pub mod value;

pub use config::{CompilerConfig, FieldMap, Parameters};
pub use executor::{ExecutionResult, QueryExecutor};
pub use planner::{
    CompileError, CompileErrorCode, CompileResult, ExplainPlan, Expression, QueryCompiler,
    QueryPlan, SelectField, SelectStatement, SortDirection, SortSpec,
};

/// Compiles a statement with the default configuration
pub fn compile(statement: &SelectStatement) -> CompileResult<QueryPlan> {
    QueryCompiler::default().compile(statement)
}
