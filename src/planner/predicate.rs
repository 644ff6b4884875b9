//! Compiled predicates
//!
//! A WHERE clause compiles into an immutable combinator tree. Evaluation
//! lives in `executor::filters`; the tree itself holds no mutable state, so
//! one plan can be evaluated from any number of threads.

use std::fmt;

use regex::Regex;
use serde_json::Value;

/// Ordered and equality comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Lt => "lt",
            CompareOp::Lte => "lte",
            CompareOp::Gt => "gt",
            CompareOp::Gte => "gte",
        }
    }
}

/// What a leaf checks about its field
#[derive(Debug, Clone)]
pub enum FieldTest {
    /// Compare the resolved field against an operand (`None` is "no value")
    Compare { op: CompareOp, operand: Option<Value> },
    /// Resolved field matches the pattern somewhere, case-insensitively
    Matches(Regex),
    /// Raw top-level field holds a single line in which no match of the
    /// pattern starts
    Excludes(Regex),
    /// Top-level key is absent
    Missing,
}

/// A single-record test against one field
#[derive(Debug, Clone)]
pub struct LeafTest {
    /// Record key after field-map translation, possibly dot-separated
    pub field: String,
    pub test: FieldTest,
}

/// Compiled boolean combinator tree
#[derive(Debug, Clone)]
pub enum Predicate {
    Leaf(LeafTest),
    /// Boolean inversion
    Not(Box<Predicate>),
    /// AND-chain; evaluated in order, stops at the first false member
    All(Vec<Predicate>),
    /// OR-chain, inverted as a whole when `negated`; stops at the first
    /// true member
    Any {
        members: Vec<Predicate>,
        negated: bool,
    },
}

impl Predicate {
    pub fn leaf(field: impl Into<String>, test: FieldTest) -> Self {
        Predicate::Leaf(LeafTest {
            field: field.into(),
            test,
        })
    }

    pub fn not(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    pub fn any(members: Vec<Predicate>, negated: bool) -> Self {
        Predicate::Any { members, negated }
    }

    /// Number of leaf tests in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            Predicate::Leaf(_) => 1,
            Predicate::Not(inner) => inner.leaf_count(),
            Predicate::All(members) | Predicate::Any { members, .. } => {
                members.iter().map(Predicate::leaf_count).sum()
            }
        }
    }
}

impl fmt::Display for LeafTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.test {
            FieldTest::Compare { op, operand } => match operand {
                Some(value) => write!(f, "{} {} {}", self.field, op.as_str(), value),
                None => write!(f, "{} {} <no value>", self.field, op.as_str()),
            },
            FieldTest::Matches(regex) => write!(f, "{} matches /{}/i", self.field, regex.as_str()),
            FieldTest::Excludes(regex) => write!(f, "{} excludes /{}/i", self.field, regex.as_str()),
            FieldTest::Missing => write!(f, "{} missing", self.field),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Leaf(leaf) => write!(f, "{}", leaf),
            Predicate::Not(inner) => write!(f, "NOT ({})", inner),
            Predicate::All(members) => write_chain(f, members, " AND "),
            Predicate::Any { members, negated } => {
                if *negated {
                    write!(f, "NOT ")?;
                }
                write_chain(f, members, " OR ")
            }
        }
    }
}

fn write_chain(f: &mut fmt::Formatter<'_>, members: &[Predicate], separator: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", separator)?;
        }
        write!(f, "{}", member)?;
    }
    write!(f, ")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eq(field: &str, value: Value) -> Predicate {
        Predicate::leaf(
            field,
            FieldTest::Compare {
                op: CompareOp::Eq,
                operand: Some(value),
            },
        )
    }

    #[test]
    fn test_display() {
        let tree = Predicate::All(vec![
            eq("name", json!("Digg")),
            Predicate::any(
                vec![
                    Predicate::not(eq("founded_year", json!(2004))),
                    Predicate::leaf("acquired_by", FieldTest::Missing),
                ],
                true,
            ),
        ]);

        assert_eq!(
            tree.to_string(),
            "(name eq \"Digg\" AND NOT (NOT (founded_year eq 2004) OR acquired_by missing))"
        );
    }

    #[test]
    fn test_display_no_value_operand() {
        let leaf = Predicate::leaf(
            "year",
            FieldTest::Compare {
                op: CompareOp::Gte,
                operand: None,
            },
        );
        assert_eq!(leaf.to_string(), "year gte <no value>");
    }

    #[test]
    fn test_leaf_count() {
        let tree = Predicate::any(
            vec![
                Predicate::All(vec![eq("a", json!(1)), eq("b", json!(2))]),
                Predicate::not(eq("c", json!(3))),
            ],
            false,
        );
        assert_eq!(tree.leaf_count(), 3);
    }
}
