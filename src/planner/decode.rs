//! JSON AST decoding
//!
//! Parsers hand statements over as JSON with every node tagged by kind:
//!
//! ```json
//! {"type": "SelectStatement",
//!  "fieldList": {"type": "FieldList", "fields": [{"name": "name"}, {"name": "total_money_raised", "alias": "worth"}]},
//!  "filter": {"type": "Filter", "expression": {"type": "ComparisonPredicate", "field": "founded_year", "operator": "gte", "value": "1999"}},
//!  "orderBy": {"type": "OrderBy", "sorts": [{"field": "founded_year", "direction": "desc"}]}}
//! ```
//!
//! Decoding is the only place an unknown node kind can show up; once the
//! typed AST exists every kind has a handler.

use serde_json::{Map, Value};

use super::ast::{
    BinaryNode, Expression, FieldList, Filter, OrderBy, PredicateNode, SelectField, SelectStatement,
    SortSpec,
};
use super::errors::{CompileError, CompileResult};

type Node = Map<String, Value>;

const KNOWN_KINDS: [&str; 10] = [
    "SelectStatement",
    "FieldList",
    "Filter",
    "OrderBy",
    "Conjunction",
    "Disjunction",
    "ComparisonPredicate",
    "ContainsPredicate",
    "LikePredicate",
    "MissingPredicate",
];

/// Decodes a `SelectStatement` root
pub fn select_statement(value: &Value) -> CompileResult<SelectStatement> {
    let node = expect_kind(value, "SelectStatement")?;

    let field_list = field_list(required(node, "SelectStatement", "fieldList")?)?;
    let filter = optional(node, "filter").map(filter).transpose()?;
    let order_by = optional(node, "orderBy").map(order_by).transpose()?;

    Ok(SelectStatement {
        field_list,
        filter,
        order_by,
    })
}

/// Decodes one WHERE expression node
pub fn expression(value: &Value) -> CompileResult<Expression> {
    let (kind, node) = tagged(value)?;
    match kind {
        "Conjunction" => binary(node, kind).map(Expression::Conjunction),
        "Disjunction" => binary(node, kind).map(Expression::Disjunction),
        "ComparisonPredicate" => predicate(node, kind).map(Expression::Comparison),
        "ContainsPredicate" => predicate(node, kind).map(Expression::Contains),
        "LikePredicate" => predicate(node, kind).map(Expression::Like),
        "MissingPredicate" => predicate(node, kind).map(Expression::Missing),
        known if KNOWN_KINDS.contains(&known) => Err(CompileError::malformed_node(
            known,
            "not valid inside a WHERE expression",
        )),
        unknown => Err(CompileError::unknown_node_kind(unknown)),
    }
}

fn field_list(value: &Value) -> CompileResult<FieldList> {
    let node = expect_kind(value, "FieldList")?;
    let entries = required(node, "FieldList", "fields")?
        .as_array()
        .ok_or_else(|| CompileError::malformed_node("FieldList", "\"fields\" must be an array"))?;

    let fields = entries
        .iter()
        .map(|entry| match entry {
            Value::String(name) => Ok(SelectField::new(name.as_str())),
            other => serde_json::from_value::<SelectField>(other.clone())
                .map_err(|e| CompileError::malformed_node("FieldList", e.to_string())),
        })
        .collect::<CompileResult<Vec<_>>>()?;

    Ok(FieldList::new(fields))
}

fn filter(value: &Value) -> CompileResult<Filter> {
    let node = expect_kind(value, "Filter")?;
    let expression = expression(required(node, "Filter", "expression")?)?;
    Ok(Filter { expression })
}

fn order_by(value: &Value) -> CompileResult<OrderBy> {
    let node = expect_kind(value, "OrderBy")?;
    let sorts = serde_json::from_value::<Vec<SortSpec>>(required(node, "OrderBy", "sorts")?.clone())
        .map_err(|e| CompileError::malformed_node("OrderBy", e.to_string()))?;
    Ok(OrderBy { sorts })
}

fn binary(node: &Node, kind: &str) -> CompileResult<BinaryNode> {
    Ok(BinaryNode {
        left: Box::new(expression(required(node, kind, "left")?)?),
        right: Box::new(expression(required(node, kind, "right")?)?),
        is_negated: flag(node, kind, "isNegated")?,
    })
}

fn predicate(node: &Node, kind: &str) -> CompileResult<PredicateNode> {
    let field = string_attr(node, kind, "field")?;

    let operator = match node.get("operator") {
        None | Some(Value::Null) if kind == "MissingPredicate" => "missing".to_string(),
        _ => string_attr(node, kind, "operator")?,
    };

    Ok(PredicateNode {
        field,
        operator,
        value: node.get("value").cloned(),
        is_negated: flag(node, kind, "isNegated")?,
    })
}

fn tagged(value: &Value) -> CompileResult<(&str, &Node)> {
    let node = value
        .as_object()
        .ok_or_else(|| CompileError::malformed_node("AST", "expected an object"))?;
    let kind = node
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| CompileError::malformed_node("AST", "missing \"type\" tag"))?;
    Ok((kind, node))
}

fn expect_kind<'a>(value: &'a Value, expected: &str) -> CompileResult<&'a Node> {
    let (kind, node) = tagged(value)?;
    if kind == expected {
        Ok(node)
    } else if KNOWN_KINDS.contains(&kind) {
        Err(CompileError::malformed_node(
            expected,
            format!("found a {} node in its place", kind),
        ))
    } else {
        Err(CompileError::unknown_node_kind(kind))
    }
}

fn required<'a>(node: &'a Node, kind: &str, key: &str) -> CompileResult<&'a Value> {
    optional(node, key)
        .ok_or_else(|| CompileError::malformed_node(kind, format!("missing \"{}\"", key)))
}

// Absent and null attributes read the same
fn optional<'a>(node: &'a Node, key: &str) -> Option<&'a Value> {
    node.get(key).filter(|v| !v.is_null())
}

fn string_attr(node: &Node, kind: &str, key: &str) -> CompileResult<String> {
    required(node, kind, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CompileError::malformed_node(kind, format!("\"{}\" must be a string", key)))
}

fn flag(node: &Node, kind: &str, key: &str) -> CompileResult<bool> {
    match optional(node, key) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(CompileError::malformed_node(
            kind,
            format!("\"{}\" must be a boolean", key),
        )),
    }
}
