//! Predicate leaf builder
//!
//! Compiles one comparison/contains/like/missing node into a leaf test.
//! Field names go through the predicate direction of the field map first.
//!
//! Negation is an inverter around the positive test, except for the pattern
//! operators: a negated contains/like becomes an `Excludes` test on the raw
//! top-level key, which bypasses dot-path resolution entirely.

use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::config::{CompilerConfig, FieldMap};
use crate::value::to_display_string;

use super::ast::{Operator, PredicateNode};
use super::errors::{CompileError, CompileResult};
use super::literal::LiteralCoercer;
use super::predicate::{CompareOp, FieldTest, Predicate};

/// Leaf node kinds, as distinguished by the AST
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateKind {
    Comparison,
    Contains,
    Like,
    Missing,
}

/// Builds leaf predicates against one compiler config
#[derive(Debug, Clone, Copy)]
pub struct LeafBuilder<'a> {
    coercer: LiteralCoercer<'a>,
    field_map: &'a FieldMap,
}

impl<'a> LeafBuilder<'a> {
    pub fn new(config: &'a CompilerConfig) -> Self {
        Self {
            coercer: LiteralCoercer::new(config.params.as_ref()),
            field_map: &config.field_map,
        }
    }

    /// Compiles a leaf node. `negated` is the node's effective negation,
    /// including any pushed down from an enclosing conjunction.
    pub fn build(&self, kind: PredicateKind, node: &PredicateNode, negated: bool) -> CompileResult<Predicate> {
        // Missing nodes ignore whatever operator the parser attached
        let operator = match kind {
            PredicateKind::Missing => Operator::Missing,
            _ => Operator::parse(&node.operator)
                .ok_or_else(|| CompileError::unsupported_operator(&node.field, &node.operator))?,
        };

        let field = self.field_map.predicate_key(&node.field).to_string();

        let op = match operator {
            Operator::Missing => {
                return Ok(invert(Predicate::leaf(field, FieldTest::Missing), negated));
            }
            Operator::Contains | Operator::Like => {
                let operand = self.operand(kind, node)?;
                let regex = compile_pattern(&node.field, operand.as_ref(), negated)?;
                let test = if negated {
                    FieldTest::Excludes(regex)
                } else {
                    FieldTest::Matches(regex)
                };
                return Ok(Predicate::leaf(field, test));
            }
            Operator::Eq => CompareOp::Eq,
            Operator::Lt => CompareOp::Lt,
            Operator::Lte => CompareOp::Lte,
            Operator::Gt => CompareOp::Gt,
            Operator::Gte => CompareOp::Gte,
        };

        let operand = self.operand(kind, node)?;
        Ok(invert(
            Predicate::leaf(field, FieldTest::Compare { op, operand }),
            negated,
        ))
    }

    fn operand(&self, kind: PredicateKind, node: &PredicateNode) -> CompileResult<Option<Value>> {
        self.coercer
            .coerce(&node.field, node.value.as_ref(), kind == PredicateKind::Like)
    }
}

fn invert(predicate: Predicate, negated: bool) -> Predicate {
    if negated {
        Predicate::not(predicate)
    } else {
        predicate
    }
}

fn compile_pattern(field: &str, operand: Option<&Value>, negated: bool) -> CompileResult<Regex> {
    // No value reads as an empty pattern, but as the text "undefined" once negated
    let source = match operand {
        None if !negated => String::new(),
        other => to_display_string(other),
    };

    RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .map_err(|e| CompileError::invalid_pattern(field, e))
}
