//! Explain plan output
//!
//! Produces deterministic, human-readable explain output.

use std::fmt;

use super::compiler::QueryPlan;
use super::errors::CompileError;

/// Explain plan output
#[derive(Debug, Clone)]
pub struct ExplainPlan {
    /// Whether compilation succeeded
    pub accepted: bool,
    /// Projection description
    pub projection: Vec<String>,
    /// Top-level filters, in evaluation order
    pub filters: Vec<String>,
    /// Sort keys, first one dominant
    pub sorts: Vec<String>,
    /// Rejection reason (if rejected)
    pub rejection_reason: Option<String>,
    /// Rejection error code (if rejected)
    pub rejection_code: Option<String>,
}

impl ExplainPlan {
    /// Creates an explain plan from a compiled plan
    pub fn from_plan(plan: &QueryPlan) -> Self {
        let projection = if plan.is_wildcard() {
            vec!["*".to_string()]
        } else {
            plan.fields
                .iter()
                .map(|field| match &field.alias {
                    Some(alias) if !field.is_nested() => format!("{} AS {}", field.name, alias),
                    _ => field.name.clone(),
                })
                .collect()
        };

        Self {
            accepted: true,
            projection,
            filters: plan.filters.iter().map(ToString::to_string).collect(),
            sorts: plan
                .sorts
                .iter()
                .map(|s| format!("{} {}", s.field, s.direction.as_str()))
                .collect(),
            rejection_reason: None,
            rejection_code: None,
        }
    }

    /// Creates an explain plan from a compile error
    pub fn from_error(err: &CompileError) -> Self {
        Self {
            accepted: false,
            projection: Vec::new(),
            filters: Vec::new(),
            sorts: Vec::new(),
            rejection_reason: Some(err.message().to_string()),
            rejection_code: Some(err.code().code().to_string()),
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;

        if self.accepted {
            writeln!(f, "Status: ACCEPTED")?;
            writeln!(f, "Select: {}", self.projection.join(", "))?;
            if self.filters.is_empty() {
                writeln!(f, "Filters: none")?;
            } else {
                writeln!(f, "Filters:")?;
                for filter in &self.filters {
                    writeln!(f, "  - {}", filter)?;
                }
            }
            if !self.sorts.is_empty() {
                writeln!(f, "Sort: {}", self.sorts.join(", "))?;
            }
        } else {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
        }

        Ok(())
    }
}
