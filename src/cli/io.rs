//! JSON I/O handling for CLI
//!
//! - Inputs: JSON files (query AST, records array, compiler config)
//! - Output: one JSON object per line on the given writer
//! - UTF-8 only

use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::Value;

use crate::config::CompilerConfig;

use super::errors::{CliError, CliResult};

/// Read and parse a JSON file
pub fn read_json(path: &Path) -> CliResult<Value> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a JSON array of records
pub fn read_records(path: &Path) -> CliResult<Vec<Value>> {
    match read_json(path)? {
        Value::Array(records) => Ok(records),
        _ => Err(CliError::Records {
            path: path.to_path_buf(),
        }),
    }
}

/// Load a compiler config; no path means the default config
pub fn load_config(path: Option<&Path>) -> CliResult<CompilerConfig> {
    let Some(path) = path else {
        return Ok(CompilerConfig::default());
    };

    serde_json::from_value(read_json(path)?).map_err(|e| CliError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Write rows as JSON lines
pub fn write_rows<'a, W, I>(out: &mut W, rows: I) -> CliResult<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Value>,
{
    for row in rows {
        serde_json::to_writer(&mut *out, row).map_err(std::io::Error::from)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
