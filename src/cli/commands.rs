//! CLI command implementations
//!
//! Commands write their results to the writer they are given; logs and
//! errors go to stderr.

use std::io::{self, Write};
use std::path::Path;

use crate::observability::Logger;
use crate::planner::{ExplainPlan, QueryCompiler};

use super::args::{Cli, Command};
use super::errors::CliResult;
use super::io::{load_config, read_json, read_records, write_rows};

/// Parse arguments and run the selected command against stdout
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    Logger::set_min_severity(cli.log_level);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_command(cli.command, &mut out)
}

/// Run the appropriate command based on CLI args
pub fn run_command<W: Write>(cmd: Command, out: &mut W) -> CliResult<()> {
    match cmd {
        Command::Run {
            query: query_path,
            records,
            config,
        } => query(&query_path, &records, config.as_deref(), out),
        Command::Explain {
            query: query_path,
            config,
        } => explain(&query_path, config.as_deref(), out),
    }
}

/// Compile the query, execute it over the records and print one JSON line
/// per result row
pub fn query<W: Write>(
    query_path: &Path,
    records_path: &Path,
    config_path: Option<&Path>,
    out: &mut W,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let ast = read_json(query_path)?;
    let records = read_records(records_path)?;

    let plan = QueryCompiler::new(config).compile_json(&ast)?;
    let rows = plan.execute(&records);

    write_rows(out, rows.iter().map(|row| row.as_ref()))
}

/// Compile the query and print its plan.
///
/// A rejected query still prints its explain output before the error is
/// returned.
pub fn explain<W: Write>(query_path: &Path, config_path: Option<&Path>, out: &mut W) -> CliResult<()> {
    let config = load_config(config_path)?;
    let ast = read_json(query_path)?;

    match QueryCompiler::new(config).compile_json(&ast) {
        Ok(plan) => {
            write!(out, "{}", ExplainPlan::from_plan(&plan))?;
            out.flush()?;
            Ok(())
        }
        Err(err) => {
            write!(out, "{}", ExplainPlan::from_error(&err))?;
            out.flush()?;
            Err(err.into())
        }
    }
}
