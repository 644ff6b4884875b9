//! CLI argument definitions using clap
//!
//! Commands:
//! - memql run --query <ast.json> --records <records.json> [--config <path>]
//! - memql explain --query <ast.json> [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::Severity;

/// memql - in-memory query compiler and executor
#[derive(Parser, Debug)]
#[command(name = "memql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Lowest log severity written to stderr (trace, info, warn, error)
    #[arg(long, global = true, default_value = "warn", value_parser = parse_severity)]
    pub log_level: Severity,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a query and run it over a JSON array of records
    Run {
        /// Path to the JSON-serialized SELECT statement
        #[arg(long)]
        query: PathBuf,

        /// Path to a JSON array of records
        #[arg(long)]
        records: PathBuf,

        /// Path to a compiler configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compile a query and print its plan
    Explain {
        /// Path to the JSON-serialized SELECT statement
        #[arg(long)]
        query: PathBuf,

        /// Path to a compiler configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

fn parse_severity(name: &str) -> Result<Severity, String> {
    Severity::parse(name).ok_or_else(|| format!("unknown log level '{}'", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "memql", "run", "--query", "q.json", "--records", "r.json", "--log-level", "trace",
        ])
        .unwrap();

        assert_eq!(cli.log_level, Severity::Trace);
        match cli.command {
            Command::Run {
                query,
                records,
                config,
            } => {
                assert_eq!(query, PathBuf::from("q.json"));
                assert_eq!(records, PathBuf::from("r.json"));
                assert!(config.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_explain_defaults() {
        let cli = Cli::try_parse_from(["memql", "explain", "--query", "q.json"]).unwrap();
        assert_eq!(cli.log_level, Severity::Warn);
        assert!(matches!(cli.command, Command::Explain { .. }));
    }

    #[test]
    fn test_rejects_unknown_level() {
        let result = Cli::try_parse_from(["memql", "--log-level", "loud", "explain", "--query", "q"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_requires_records() {
        assert!(Cli::try_parse_from(["memql", "run", "--query", "q.json"]).is_err());
    }
}
