//! Query AST structures
//!
//! The parsed statement the compiler consumes. An external parser produces
//! it; nothing in this crate reads query text.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Predicate operators recognized by the leaf builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
    Like,
    Missing,
}

impl Operator {
    /// Parses an operator name as the parser emits it
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "eq" => Some(Operator::Eq),
            "lt" => Some(Operator::Lt),
            "lte" => Some(Operator::Lte),
            "gt" => Some(Operator::Gt),
            "gte" => Some(Operator::Gte),
            "contains" => Some(Operator::Contains),
            "like" => Some(Operator::Like),
            "missing" => Some(Operator::Missing),
            _ => None,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort by
    pub field: String,
    /// Sort direction
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// One entry of the SELECT list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectField {
    /// Selected name, possibly dot-separated, or `*`
    pub name: String,
    /// Output name override
    #[serde(default)]
    pub alias: Option<String>,
}

impl SelectField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    /// The `*` entry
    pub fn wildcard() -> Self {
        Self::new("*")
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn is_wildcard(&self) -> bool {
        self.name == "*"
    }

    pub fn is_nested(&self) -> bool {
        self.name.contains('.')
    }
}

/// SELECT field list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldList {
    pub fields: Vec<SelectField>,
}

impl FieldList {
    pub fn new(fields: Vec<SelectField>) -> Self {
        Self { fields }
    }

    /// A list holding only `*`
    pub fn wildcard() -> Self {
        Self::new(vec![SelectField::wildcard()])
    }
}

/// Leaf predicate node
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateNode {
    /// Field name, possibly dot-separated
    pub field: String,
    /// Operator name as emitted by the parser
    pub operator: String,
    /// Raw literal; may be a `@name` parameter reference
    pub value: Option<Value>,
    pub is_negated: bool,
}

impl PredicateNode {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value,
            is_negated: false,
        }
    }
}

/// Binary AND / OR node
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryNode {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub is_negated: bool,
}

impl Drop for BinaryNode {
    // Long chains are deeper than the stack allows for recursive drops, so
    // nested binary nodes are unlinked onto a heap stack first.
    fn drop(&mut self) {
        if !self.left.is_binary() && !self.right.is_binary() {
            return;
        }

        let mut pending = vec![self.left.take(), self.right.take()];
        while let Some(mut expression) = pending.pop() {
            if let Expression::Conjunction(node) | Expression::Disjunction(node) = &mut expression {
                pending.push(node.left.take());
                pending.push(node.right.take());
            }
        }
    }
}

/// Boolean expression tree of a WHERE clause.
///
/// N-ary AND/OR arrive as binary trees leaning either way.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Conjunction(BinaryNode),
    Disjunction(BinaryNode),
    Comparison(PredicateNode),
    Contains(PredicateNode),
    Like(PredicateNode),
    Missing(PredicateNode),
}

impl Expression {
    /// `left and right`
    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::Conjunction(BinaryNode {
            left: Box::new(left),
            right: Box::new(right),
            is_negated: false,
        })
    }

    /// `left or right`
    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Disjunction(BinaryNode {
            left: Box::new(left),
            right: Box::new(right),
            is_negated: false,
        })
    }

    /// Comparison leaf (`eq`, `lt`, `lte`, `gt`, `gte`)
    pub fn compare(field: impl Into<String>, operator: impl Into<String>, value: impl Into<Value>) -> Self {
        Expression::Comparison(PredicateNode::new(field, operator, Some(value.into())))
    }

    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Expression::Contains(PredicateNode::new(field, "contains", Some(value.into())))
    }

    pub fn like(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Expression::Like(PredicateNode::new(field, "like", Some(value.into())))
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Expression::Missing(PredicateNode::new(field, "missing", None))
    }

    fn is_binary(&self) -> bool {
        matches!(self, Expression::Conjunction(_) | Expression::Disjunction(_))
    }

    /// Moves the expression out, leaving a leaf that owns no subtree
    fn take(&mut self) -> Expression {
        std::mem::replace(self, Expression::missing(String::new()))
    }

    /// Toggles the node's negation flag
    pub fn negate(mut self) -> Self {
        match &mut self {
            Expression::Conjunction(node) | Expression::Disjunction(node) => {
                node.is_negated = !node.is_negated;
            }
            Expression::Comparison(node)
            | Expression::Contains(node)
            | Expression::Like(node)
            | Expression::Missing(node) => {
                node.is_negated = !node.is_negated;
            }
        }
        self
    }
}

/// WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub expression: Expression,
}

/// ORDER BY clause
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBy {
    pub sorts: Vec<SortSpec>,
}

/// Root of a parsed query
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub field_list: FieldList,
    pub filter: Option<Filter>,
    pub order_by: Option<OrderBy>,
}

impl SelectStatement {
    /// Creates a statement selecting `fields`
    pub fn new(fields: Vec<SelectField>) -> Self {
        Self {
            field_list: FieldList::new(fields),
            filter: None,
            order_by: None,
        }
    }

    /// Creates a `select *` statement
    pub fn select_all() -> Self {
        Self {
            field_list: FieldList::wildcard(),
            filter: None,
            order_by: None,
        }
    }

    /// Sets the WHERE expression
    pub fn with_filter(mut self, expression: Expression) -> Self {
        self.filter = Some(Filter { expression });
        self
    }

    /// Appends an ORDER BY entry
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.order_by.get_or_insert_with(OrderBy::default).sorts.push(sort);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_statement_builder() {
        let statement = SelectStatement::new(vec![
            SelectField::new("name"),
            SelectField::new("total_money_raised").with_alias("worth"),
        ])
        .with_filter(Expression::compare("founded_year", "gte", "1999"))
        .with_sort(SortSpec::desc("founded_year"))
        .with_sort(SortSpec::asc("name"));

        assert_eq!(statement.field_list.fields.len(), 2);
        assert_eq!(statement.field_list.fields[1].alias.as_deref(), Some("worth"));
        assert!(statement.filter.is_some());
        assert_eq!(statement.order_by.unwrap().sorts.len(), 2);
    }

    #[test]
    fn test_negate_toggles() {
        let like = Expression::like("name", "%air%").negate();
        match &like {
            Expression::Like(node) => assert!(node.is_negated),
            other => panic!("unexpected node {:?}", other),
        }

        match like.negate() {
            Expression::Like(node) => assert!(!node.is_negated),
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_deep_chain_drops() {
        let mut expression = Expression::missing("f");
        for i in 0..100_000 {
            expression = if i % 2 == 0 {
                Expression::or(expression, Expression::missing("f"))
            } else {
                Expression::and(Expression::missing("f"), expression)
            };
        }
        drop(expression);
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!(Operator::parse("gte"), Some(Operator::Gte));
        assert_eq!(Operator::parse("like"), Some(Operator::Like));
        assert_eq!(Operator::parse("ne"), None);
    }

    #[test]
    fn test_select_field_shape() {
        assert!(SelectField::wildcard().is_wildcard());
        assert!(SelectField::new("address.city").is_nested());
        assert!(!SelectField::new("name").is_nested());
    }

    #[test]
    fn test_sort_spec_from_json_defaults_to_asc() {
        let sort: SortSpec = serde_json::from_value(json!({"field": "name"})).unwrap();
        assert_eq!(sort, SortSpec::asc("name"));
    }

    #[test]
    fn test_missing_has_no_value() {
        match Expression::missing("acquired_by") {
            Expression::Missing(node) => {
                assert_eq!(node.operator, "missing");
                assert!(node.value.is_none());
            }
            other => panic!("unexpected node {:?}", other),
        }
    }
}
