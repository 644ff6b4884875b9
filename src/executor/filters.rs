//! Predicate filtering for query execution
//!
//! Evaluates compiled predicate trees against records. Evaluation never
//! fails: missing fields resolve to "no value" (or to the fallbacks in
//! `resolver`) and simply take part in the comparison.

use std::cmp::Ordering;

use regex::Regex;
use serde_json::Value;

use crate::planner::{CompareOp, FieldTest, LeafTest, Predicate};
use crate::value::{loose_cmp, loose_eq, to_display_string};

use super::resolver::{has_own_property, own_property, resolve};

const LINE_TERMINATORS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

/// Evaluates predicates against records
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks if a record passes every top-level filter (AND semantics)
    pub fn matches(record: &Value, filters: &[Predicate]) -> bool {
        filters.iter().all(|filter| Self::evaluate(record, filter))
    }

    /// Evaluates one predicate tree
    pub fn evaluate(record: &Value, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::Leaf(leaf) => Self::test_leaf(record, leaf),
            Predicate::Not(inner) => !Self::evaluate(record, inner),
            Predicate::All(members) => members.iter().all(|m| Self::evaluate(record, m)),
            Predicate::Any { members, negated } => {
                members.iter().any(|m| Self::evaluate(record, m)) != *negated
            }
        }
    }

    fn test_leaf(record: &Value, leaf: &LeafTest) -> bool {
        match &leaf.test {
            FieldTest::Compare { op, operand } => {
                Self::compare(resolve(record, &leaf.field), *op, operand.as_ref())
            }
            FieldTest::Matches(regex) => {
                regex.is_match(&to_display_string(resolve(record, &leaf.field)))
            }
            FieldTest::Excludes(regex) => Self::excludes(regex, own_property(record, &leaf.field)),
            FieldTest::Missing => !has_own_property(record, &leaf.field),
        }
    }

    fn compare(actual: Option<&Value>, op: CompareOp, expected: Option<&Value>) -> bool {
        let ordering = || loose_cmp(actual, expected);
        match op {
            CompareOp::Eq => loose_eq(actual, expected),
            CompareOp::Lt => ordering() == Some(Ordering::Less),
            CompareOp::Lte => matches!(ordering(), Some(Ordering::Less | Ordering::Equal)),
            CompareOp::Gt => ordering() == Some(Ordering::Greater),
            CompareOp::Gte => matches!(ordering(), Some(Ordering::Greater | Ordering::Equal)),
        }
    }

    /// True when the value reads as one line in which no match of the
    /// pattern starts before the end
    fn excludes(regex: &Regex, value: Option<&Value>) -> bool {
        let subject = to_display_string(value);
        if subject.contains(&LINE_TERMINATORS[..]) {
            return false;
        }
        regex
            .find(&subject)
            .map_or(true, |m| m.start() == subject.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;
    use serde_json::json;

    fn compare(field: &str, op: CompareOp, operand: Value) -> Predicate {
        Predicate::leaf(
            field,
            FieldTest::Compare {
                op,
                operand: Some(operand),
            },
        )
    }

    fn pattern(source: &str) -> Regex {
        RegexBuilder::new(source)
            .case_insensitive(true)
            .build()
            .unwrap()
    }

    #[test]
    fn test_equality_match() {
        let doc = json!({"name": "Airbnb", "founded_year": 2008});

        assert!(PredicateFilter::matches(&doc, &[compare("name", CompareOp::Eq, json!("Airbnb"))]));
        assert!(!PredicateFilter::matches(&doc, &[compare("name", CompareOp::Eq, json!("Digg"))]));
    }

    #[test]
    fn test_loose_equality() {
        let doc = json!({"founded_year": 2008});
        assert!(PredicateFilter::matches(
            &doc,
            &[compare("founded_year", CompareOp::Eq, json!("2008"))]
        ));
    }

    #[test]
    fn test_range_predicates() {
        let doc = json!({"founded_year": 2006});

        assert!(PredicateFilter::matches(&doc, &[compare("founded_year", CompareOp::Gte, json!(2006))]));
        assert!(PredicateFilter::matches(&doc, &[compare("founded_year", CompareOp::Lte, json!(2006))]));
        assert!(!PredicateFilter::matches(&doc, &[compare("founded_year", CompareOp::Gt, json!(2006))]));
        assert!(!PredicateFilter::matches(&doc, &[compare("founded_year", CompareOp::Lt, json!(2006))]));
    }

    #[test]
    fn test_missing_field_is_unordered() {
        let doc = json!({"name": "Digg"});

        assert!(!PredicateFilter::matches(&doc, &[compare("founded_year", CompareOp::Gte, json!(0))]));
        assert!(!PredicateFilter::matches(&doc, &[compare("founded_year", CompareOp::Lt, json!(0))]));
        assert!(PredicateFilter::matches(&doc, &[compare("founded_year", CompareOp::Eq, json!(null))]));
    }

    #[test]
    fn test_no_value_operand() {
        let doc = json!({"name": "Digg"});
        let eq_nothing = |field: &str| {
            Predicate::leaf(
                field,
                FieldTest::Compare {
                    op: CompareOp::Eq,
                    operand: None,
                },
            )
        };

        assert!(PredicateFilter::evaluate(&doc, &eq_nothing("absent")));
        assert!(!PredicateFilter::evaluate(&doc, &eq_nothing("name")));
    }

    #[test]
    fn test_nested_field_comparison() {
        let doc = json!({"office": {"city": "SF"}});

        assert!(PredicateFilter::matches(&doc, &[compare("office.city", CompareOp::Eq, json!("SF"))]));
        // Missing leaf compares against the parent object
        assert!(PredicateFilter::matches(
            &doc,
            &[compare("office.zip", CompareOp::Eq, json!("[object Object]"))]
        ));
    }

    #[test]
    fn test_pattern_match() {
        let doc = json!({"name": "Airbnb", "founded_year": 2008});

        let like = Predicate::leaf("name", FieldTest::Matches(pattern("(?:.*)air(?:.*)")));
        assert!(PredicateFilter::evaluate(&doc, &like));

        let year = Predicate::leaf("founded_year", FieldTest::Matches(pattern("^200")));
        assert!(PredicateFilter::evaluate(&doc, &year));

        let absent = Predicate::leaf("missing", FieldTest::Matches(pattern("undef")));
        assert!(PredicateFilter::evaluate(&doc, &absent));
    }

    #[test]
    fn test_excludes() {
        let excludes = Predicate::leaf("name", FieldTest::Excludes(pattern("(?:.*)air(?:.*)")));

        assert!(!PredicateFilter::evaluate(&json!({"name": "Airbnb"}), &excludes));
        assert!(!PredicateFilter::evaluate(&json!({"name": "FlAIRy"}), &excludes));
        assert!(PredicateFilter::evaluate(&json!({"name": "Digg"}), &excludes));
        assert!(!PredicateFilter::evaluate(&json!({"name": "Di\ngg"}), &excludes));
    }

    #[test]
    fn test_excludes_reads_top_level_key() {
        let excludes = Predicate::leaf("office.city", FieldTest::Excludes(pattern("sf")));

        // The dotted name is looked up as a literal key, so the nested value is never seen
        assert!(PredicateFilter::evaluate(&json!({"office": {"city": "SF"}}), &excludes));
        assert!(!PredicateFilter::evaluate(&json!({"office.city": "SF"}), &excludes));
    }

    #[test]
    fn test_excludes_empty_match_at_end() {
        let excludes = Predicate::leaf("name", FieldTest::Excludes(pattern("$")));

        assert!(PredicateFilter::evaluate(&json!({"name": "Digg"}), &excludes));
        assert!(PredicateFilter::evaluate(&json!({"name": ""}), &excludes));
    }

    #[test]
    fn test_missing_predicate() {
        let missing = Predicate::leaf("acquired_by", FieldTest::Missing);

        assert!(PredicateFilter::evaluate(&json!({"name": "Digg"}), &missing));
        assert!(!PredicateFilter::evaluate(&json!({"acquired_by": null}), &missing));
    }

    #[test]
    fn test_combinators() {
        let doc = json!({"a": 1, "b": 2});
        let a = || compare("a", CompareOp::Eq, json!(1));
        let b_wrong = || compare("b", CompareOp::Eq, json!(3));

        assert!(!PredicateFilter::evaluate(&doc, &Predicate::All(vec![a(), b_wrong()])));
        assert!(PredicateFilter::evaluate(&doc, &Predicate::any(vec![a(), b_wrong()], false)));
        assert!(!PredicateFilter::evaluate(&doc, &Predicate::any(vec![a(), b_wrong()], true)));
        assert!(PredicateFilter::evaluate(&doc, &Predicate::not(b_wrong())));
        assert!(PredicateFilter::matches(&doc, &[]));
    }
}
