//! CLI module for memql
//!
//! Provides command-line interface for:
//! - run: compile a JSON AST and execute it over a JSON array of records
//! - explain: compile a JSON AST and print the plan

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{explain, query, run, run_command};
pub use errors::{CliError, CliResult};
pub use io::{load_config, read_json, read_records, write_rows};
