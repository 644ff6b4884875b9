//! Query executor for memql
//!
//! Runs a compiled plan over an in-memory slice of records.
//!
//! Execution flow (strict order):
//! 1. Scan records in input order
//! 2. Keep records that pass every top-level filter
//! 3. Project survivors into the SELECT shape
//! 4. Apply ORDER BY (stable, first key dominant)
//!
//! Execution cannot fail. Input records are never mutated.

use serde_json::Value;

use crate::observability::{Event, Logger};
use crate::planner::QueryPlan;

use super::filters::PredicateFilter;
use super::projector::Projector;
use super::result::ExecutionResult;
use super::sorter::ResultSorter;

/// Query executor bound to one plan
pub struct QueryExecutor<'p> {
    plan: &'p QueryPlan,
}

impl<'p> QueryExecutor<'p> {
    /// Creates a new executor
    pub fn new(plan: &'p QueryPlan) -> Self {
        Self { plan }
    }

    /// Executes the plan and returns results.
    ///
    /// This method is deterministic: same plan + same records = same rows.
    pub fn execute<'a>(&self, records: &'a [Value]) -> ExecutionResult<'a> {
        let projector = Projector::new(&self.plan.fields, &self.plan.field_map);

        // Steps 1-3: filter, then project each survivor
        let rows = records
            .iter()
            .filter(|record| PredicateFilter::matches(record, &self.plan.filters))
            .map(|record| projector.project(record))
            .collect::<Vec<_>>();

        // Step 4: sort projected rows
        let rows = ResultSorter::sort(rows, &self.plan.sorts);

        let scanned = records.len().to_string();
        let returned = rows.len().to_string();
        Logger::trace(
            Event::PlanExecuted.as_str(),
            &[("returned", returned.as_str()), ("scanned", scanned.as_str())],
        );

        ExecutionResult {
            returned_count: rows.len(),
            scanned_count: records.len(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{Expression, QueryCompiler, SelectField, SelectStatement, SortSpec};
    use serde_json::json;
    use std::borrow::Cow;

    fn records() -> Vec<Value> {
        vec![
            json!({"name": "Postini", "founded_year": 1999, "total_money_raised": "$0"}),
            json!({"name": "Digg", "founded_year": 2004, "total_money_raised": "$45M"}),
            json!({"name": "Airbnb", "founded_year": 2007, "total_money_raised": "$776.4M"}),
        ]
    }

    #[test]
    fn test_filter_project_sort() {
        let statement = SelectStatement::new(vec![
            SelectField::new("name"),
            SelectField::new("total_money_raised").with_alias("worth"),
        ])
        .with_filter(Expression::compare("founded_year", "gte", "2000"))
        .with_sort(SortSpec::asc("name"));
        let plan = QueryCompiler::default().compile(&statement).unwrap();

        let input = records();
        let result = QueryExecutor::new(&plan).execute(&input);

        assert_eq!(result.scanned_count, 3);
        assert_eq!(result.returned_count, 2);
        assert_eq!(
            result.into_owned(),
            vec![
                json!({"name": "Airbnb", "worth": "$776.4M"}),
                json!({"name": "Digg", "worth": "$45M"}),
            ]
        );
        assert_eq!(input, records());
    }

    #[test]
    fn test_sort_reads_projected_keys() {
        let statement = SelectStatement::new(vec![SelectField::new("name").with_alias("title")])
            .with_sort(SortSpec::desc("title"));
        let plan = QueryCompiler::default().compile(&statement).unwrap();

        let input = records();
        let rows = QueryExecutor::new(&plan).execute(&input).into_owned();
        assert_eq!(rows[0], json!({"title": "Postini"}));
        assert_eq!(rows[2], json!({"title": "Airbnb"}));
    }

    #[test]
    fn test_wildcard_rows_are_borrowed() {
        let plan = QueryCompiler::default()
            .compile(&SelectStatement::select_all())
            .unwrap();

        let input = records();
        let result = QueryExecutor::new(&plan).execute(&input);
        assert_eq!(result.len(), 3);
        for (row, record) in result.rows.iter().zip(&input) {
            match row {
                Cow::Borrowed(row) => assert!(std::ptr::eq(*row, record)),
                Cow::Owned(_) => panic!("wildcard rows must borrow"),
            }
        }
    }

    #[test]
    fn test_plan_is_reusable() {
        let statement = SelectStatement::select_all()
            .with_sort(SortSpec::desc("founded_year"))
            .with_sort(SortSpec::asc("name"));
        let plan = QueryCompiler::default().compile(&statement).unwrap();

        let input = records();
        let first = QueryExecutor::new(&plan).execute(&input).into_owned();
        let second = QueryExecutor::new(&plan).execute(&input).into_owned();
        assert_eq!(first, second);
        assert_eq!(plan.sorts[0], SortSpec::desc("founded_year"));
    }

    #[test]
    fn test_empty_input() {
        let plan = QueryCompiler::default()
            .compile(&SelectStatement::select_all())
            .unwrap();
        let result = QueryExecutor::new(&plan).execute(&[]);
        assert!(result.is_empty());
        assert_eq!(result, ExecutionResult::empty());
    }
}
