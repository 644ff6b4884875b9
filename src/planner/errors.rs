//! Compile error types
//!
//! Error codes:
//! - MEMQL_UNKNOWN_NODE_KIND (REJECT)
//! - MEMQL_MALFORMED_NODE (REJECT)
//! - MEMQL_UNSUPPORTED_OPERATOR (REJECT)
//! - MEMQL_MALFORMED_LITERAL (REJECT)
//! - MEMQL_INVALID_PATTERN (REJECT)
//!
//! Every compile error is fatal to the statement: no partial plan is built.

use std::fmt;

/// Severity levels for compile errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Statement rejected
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Compile error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorCode {
    /// AST node kind with no handler
    UnknownNodeKind,
    /// AST node missing a required attribute, or one of the wrong shape
    MalformedNode,
    /// Predicate operator outside the recognized set
    UnsupportedOperator,
    /// Literal that does not parse as a JSON scalar after normalization
    MalformedLiteral,
    /// contains/like operand that is not a valid regular expression
    InvalidPattern,
}

impl CompileErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            CompileErrorCode::UnknownNodeKind => "MEMQL_UNKNOWN_NODE_KIND",
            CompileErrorCode::MalformedNode => "MEMQL_MALFORMED_NODE",
            CompileErrorCode::UnsupportedOperator => "MEMQL_UNSUPPORTED_OPERATOR",
            CompileErrorCode::MalformedLiteral => "MEMQL_MALFORMED_LITERAL",
            CompileErrorCode::InvalidPattern => "MEMQL_INVALID_PATTERN",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for CompileErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Compile error with context
#[derive(Debug, Clone)]
pub struct CompileError {
    code: CompileErrorCode,
    message: String,
    /// Field name if applicable
    field: Option<String>,
}

impl CompileError {
    /// Create an unknown node kind error
    pub fn unknown_node_kind(kind: impl Into<String>) -> Self {
        Self {
            code: CompileErrorCode::UnknownNodeKind,
            message: format!("No handler for node kind '{}'", kind.into()),
            field: None,
        }
    }

    /// Create a malformed node error
    pub fn malformed_node(kind: &str, reason: impl Into<String>) -> Self {
        Self {
            code: CompileErrorCode::MalformedNode,
            message: format!("Malformed {} node: {}", kind, reason.into()),
            field: None,
        }
    }

    /// Create an unsupported operator error
    pub fn unsupported_operator(field: impl Into<String>, operator: &str) -> Self {
        let f = field.into();
        Self {
            code: CompileErrorCode::UnsupportedOperator,
            message: format!("Operator '{}' on field '{}' is not supported", operator, f),
            field: Some(f),
        }
    }

    /// Create a malformed literal error
    pub fn malformed_literal(field: impl Into<String>, literal: &str, reason: impl fmt::Display) -> Self {
        let f = field.into();
        Self {
            code: CompileErrorCode::MalformedLiteral,
            message: format!("Literal {} for field '{}' is malformed: {}", literal, f, reason),
            field: Some(f),
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(field: impl Into<String>, reason: impl fmt::Display) -> Self {
        let f = field.into();
        Self {
            code: CompileErrorCode::InvalidPattern,
            message: format!("Pattern for field '{}' is invalid: {}", f, reason),
            field: Some(f),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> CompileErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field name if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for CompileError {}

/// Result type for compile operations
pub type CompileResult<T> = Result<T, CompileError>;
