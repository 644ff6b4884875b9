//! CLI-specific error types
//!
//! Every CLI error ends the process with exit status 1. The binary prints
//! them as `CODE: message` on stderr.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::planner::CompileError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// An input file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An input file is not valid JSON
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration file has the wrong shape
    #[error("invalid config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    /// The records file is not an array
    #[error("{} must hold a JSON array of records", .path.display())]
    Records { path: PathBuf },

    /// The query was rejected by the compiler
    #[error("{}", .0.message())]
    Compile(#[from] CompileError),

    /// Writing results failed
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl CliError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Read { .. } => "MEMQL_CLI_READ_ERROR",
            CliError::Json { .. } => "MEMQL_CLI_JSON_ERROR",
            CliError::Config { .. } => "MEMQL_CLI_CONFIG_ERROR",
            CliError::Records { .. } => "MEMQL_CLI_RECORDS_ERROR",
            CliError::Compile(err) => err.code().code(),
            CliError::Output(_) => "MEMQL_CLI_IO_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_keeps_code() {
        let err = CliError::from(CompileError::unsupported_operator("age", "between"));
        assert_eq!(err.code(), "MEMQL_UNSUPPORTED_OPERATOR");
        assert!(err.to_string().contains("between"));
    }

    #[test]
    fn test_records_error_display() {
        let err = CliError::Records {
            path: PathBuf::from("startups.json"),
        };
        assert_eq!(err.code(), "MEMQL_CLI_RECORDS_ERROR");
        assert!(err.to_string().contains("startups.json"));
    }
}
