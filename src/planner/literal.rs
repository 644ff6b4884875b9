//! Literal coercion
//!
//! Turns the raw literal carried by a predicate node into the typed operand
//! the leaf compares against:
//!
//! 1. `@name` is replaced by the parameter table entry (when a table is set)
//! 2. booleans and null pass through
//! 3. numeric strings become integers, or floats when fractional
//! 4. other strings are quoted unless already delimited by `"`
//! 5. the result is parsed as a single JSON value
//!
//! `like` literals additionally have every `%` turned into a match-anything
//! fragment before step 2.

use serde_json::{Number, Value};

use crate::config::Parameters;
use crate::value::numeric_literal;

use super::errors::{CompileError, CompileResult};

/// Regex fragment a `%` wildcard expands to
pub const LIKE_WILDCARD: &str = "(?:.*)";

/// Coerces raw literals against an optional parameter table
#[derive(Debug, Clone, Copy)]
pub struct LiteralCoercer<'a> {
    params: Option<&'a Parameters>,
}

impl<'a> LiteralCoercer<'a> {
    pub fn new(params: Option<&'a Parameters>) -> Self {
        Self { params }
    }

    /// Resolves a `@name` reference. An unknown name yields no value.
    pub fn substitute(&self, raw: Option<&Value>) -> Option<Value> {
        match (raw, self.params) {
            (Some(Value::String(s)), Some(params)) if s.starts_with('@') => {
                params.get(&s[1..]).cloned()
            }
            _ => raw.cloned(),
        }
    }

    /// Produces the comparison operand for a predicate on `field`.
    ///
    /// `None` is a legitimate result (missing parameter), not an error.
    pub fn coerce(&self, field: &str, raw: Option<&Value>, like: bool) -> CompileResult<Option<Value>> {
        let mut value = self.substitute(raw);

        if like {
            if let Some(Value::String(pattern)) = &mut value {
                *pattern = pattern.replace('%', LIKE_WILDCARD);
            }
        }

        normalize(field, value)
    }
}

fn normalize(field: &str, value: Option<Value>) -> CompileResult<Option<Value>> {
    let text = match value {
        None => return Ok(None),
        Some(v @ (Value::Null | Value::Bool(_) | Value::Number(_))) => return Ok(Some(v)),
        Some(Value::String(text)) => text,
        Some(composite) => {
            return Err(CompileError::malformed_literal(
                field,
                &composite.to_string(),
                "expected a scalar",
            ))
        }
    };

    if let Some(n) = numeric_literal(&text) {
        return number(field, &text, n).map(Some);
    }

    let literal = if text.starts_with('"') || text.starts_with('\'') {
        text
    } else {
        format!("\"{}\"", text)
    };

    serde_json::from_str::<Value>(&literal)
        .map(Some)
        .map_err(|e| CompileError::malformed_literal(field, &literal, e))
}

fn number(field: &str, text: &str, n: f64) -> CompileResult<Value> {
    if n.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(&n) {
        return Ok(Value::from(n as i64));
    }
    Number::from_f64(n)
        .map(Value::Number)
        .ok_or_else(|| CompileError::malformed_literal(field, text, "not a finite number"))
}
