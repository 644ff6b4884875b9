//! Query compiler
//!
//! Walks a `SelectStatement` and produces an immutable `QueryPlan`:
//! top-level filters (ANDed), the SELECT list and the ORDER BY list.
//!
//! Boolean rules for the WHERE tree:
//! - `A and B` compiles to one short-circuiting AND-chain. When negated, the
//!   negation is pushed into both children, so `not (A and B)` means
//!   `not A and not B`. Nested negated conjunctions toggle, so two
//!   negations cancel.
//! - `A or B` compiles to one short-circuiting OR-chain. Plain inner
//!   disjunctions on either side join the chain; when negated the OR as a
//!   whole is inverted.
//! - Leaves apply their own negation (see `leaf`).
//!
//! An AND-chain at the root is split so each member is a top-level filter.

use std::borrow::Cow;

use serde_json::Value;

use crate::config::{CompilerConfig, FieldMap};
use crate::executor::QueryExecutor;
use crate::observability::{Event, Logger};

use super::ast::{BinaryNode, Expression, FieldList, Filter, OrderBy, SelectField, SelectStatement, SortSpec};
use super::decode;
use super::errors::CompileResult;
use super::leaf::{LeafBuilder, PredicateKind};
use super::predicate::Predicate;

/// Immutable compiled query (no per-execution state)
#[derive(Debug, Clone)]
pub struct QueryPlan {
    /// WHERE clause as independent filters; a record must pass all of them
    pub filters: Vec<Predicate>,
    /// SELECT list in declared order
    pub fields: Vec<SelectField>,
    /// ORDER BY list in declared order
    pub sorts: Vec<SortSpec>,
    /// Field map captured at compile time
    pub field_map: FieldMap,
}

impl QueryPlan {
    /// True when rows are returned as-is (`*` or an empty SELECT list)
    pub fn is_wildcard(&self) -> bool {
        self.fields.first().map_or(true, SelectField::is_wildcard)
    }

    /// Filters, projects and sorts `records`.
    ///
    /// Records are never modified. Wildcard plans borrow the input records;
    /// projected rows are new objects.
    pub fn execute<'a>(&self, records: &'a [Value]) -> Vec<Cow<'a, Value>> {
        QueryExecutor::new(self).execute(records).rows
    }
}

/// Compiles statements against one configuration
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    config: CompilerConfig,
}

impl QueryCompiler {
    /// Creates a compiler; the config is captured by every plan it builds
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compiles a statement into a plan.
    ///
    /// Deterministic: same statement and config produce the same plan.
    pub fn compile(&self, statement: &SelectStatement) -> CompileResult<QueryPlan> {
        Self::logged(self.visit_select_statement(statement))
    }

    /// Decodes a JSON-serialized statement and compiles it
    pub fn compile_json(&self, ast: &Value) -> CompileResult<QueryPlan> {
        Self::logged(
            decode::select_statement(ast).and_then(|statement| self.visit_select_statement(&statement)),
        )
    }

    fn logged(result: CompileResult<QueryPlan>) -> CompileResult<QueryPlan> {
        match &result {
            Ok(plan) => {
                let filters = plan.filters.len().to_string();
                let fields = plan.fields.len().to_string();
                let sorts = plan.sorts.len().to_string();
                let leaves = plan
                    .filters
                    .iter()
                    .map(Predicate::leaf_count)
                    .sum::<usize>()
                    .to_string();
                Logger::trace(
                    Event::PlanCompiled.as_str(),
                    &[
                        ("fields", fields.as_str()),
                        ("filters", filters.as_str()),
                        ("leaves", leaves.as_str()),
                        ("sorts", sorts.as_str()),
                    ],
                );
            }
            Err(err) => {
                Logger::info(
                    Event::PlanRejected.as_str(),
                    &[("code", err.code().code()), ("message", err.message())],
                );
            }
        }
        result
    }

    fn visit_select_statement(&self, statement: &SelectStatement) -> CompileResult<QueryPlan> {
        let fields = Self::visit_field_list(&statement.field_list);

        let filters = match &statement.filter {
            Some(filter) => self.visit_filter(filter)?,
            None => Vec::new(),
        };

        let sorts = statement
            .order_by
            .as_ref()
            .map(Self::visit_order_by)
            .unwrap_or_default();

        Ok(QueryPlan {
            filters,
            fields,
            sorts,
            field_map: self.config.field_map.clone(),
        })
    }

    fn visit_field_list(field_list: &FieldList) -> Vec<SelectField> {
        field_list.fields.clone()
    }

    fn visit_order_by(order_by: &OrderBy) -> Vec<SortSpec> {
        order_by.sorts.clone()
    }

    fn visit_filter(&self, filter: &Filter) -> CompileResult<Vec<Predicate>> {
        let tree = TreeCompiler {
            leaves: LeafBuilder::new(&self.config),
        };

        Ok(match tree.visit(&filter.expression, false)? {
            Predicate::All(members) => members,
            standalone => vec![standalone],
        })
    }
}

/// Compiles one WHERE tree. Traversal state lives on the call stack and in
/// the local AND-chain buffers; none of it reaches the plan.
struct TreeCompiler<'a> {
    leaves: LeafBuilder<'a>,
}

impl TreeCompiler<'_> {
    /// `negate` is negation pushed down from enclosing conjunctions
    fn visit(&self, expression: &Expression, negate: bool) -> CompileResult<Predicate> {
        match expression {
            Expression::Conjunction(node) => self.visit_conjunction(node, negate),
            Expression::Disjunction(node) => self.visit_disjunction(node, negate),
            Expression::Comparison(node) => {
                self.leaves
                    .build(PredicateKind::Comparison, node, node.is_negated != negate)
            }
            Expression::Contains(node) => {
                self.leaves
                    .build(PredicateKind::Contains, node, node.is_negated != negate)
            }
            Expression::Like(node) => {
                self.leaves
                    .build(PredicateKind::Like, node, node.is_negated != negate)
            }
            Expression::Missing(node) => {
                self.leaves
                    .build(PredicateKind::Missing, node, node.is_negated != negate)
            }
        }
    }

    fn visit_conjunction(&self, node: &BinaryNode, negate: bool) -> CompileResult<Predicate> {
        let pushed = node.is_negated != negate;

        // Nested conjunctions share this buffer. Pending work is popped
        // left-first so members keep their visitation order.
        let mut chain = Vec::new();
        let mut pending = vec![(node.right.as_ref(), pushed), (node.left.as_ref(), pushed)];

        while let Some((expression, negate)) = pending.pop() {
            match expression {
                Expression::Conjunction(inner) => {
                    let pushed = inner.is_negated != negate;
                    pending.push((inner.right.as_ref(), pushed));
                    pending.push((inner.left.as_ref(), pushed));
                }
                other => chain.push(self.visit(other, negate)?),
            }
        }

        Ok(Predicate::All(chain))
    }

    fn visit_disjunction(&self, node: &BinaryNode, negate: bool) -> CompileResult<Predicate> {
        let negated = node.is_negated != negate;

        // Operands never inherit negation, so plain inner disjunctions join
        // this chain. Negated ones stay grouped.
        let mut chain = Vec::new();
        let mut pending = vec![node.right.as_ref(), node.left.as_ref()];

        while let Some(expression) = pending.pop() {
            match expression {
                Expression::Disjunction(inner) if !inner.is_negated => {
                    pending.push(inner.right.as_ref());
                    pending.push(inner.left.as_ref());
                }
                other => chain.push(self.visit(other, false)?),
            }
        }

        Ok(Predicate::any(chain, negated))
    }
}
