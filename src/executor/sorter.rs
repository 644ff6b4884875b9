//! Result sorting for query execution
//!
//! ORDER BY keys are applied back to front, one stable pass per key, so the
//! first declared key dominates and later keys break ties. Keys read the
//! row's own top-level property; nested paths are not resolved here.

use std::borrow::Borrow;
use std::cmp::Ordering;

use serde_json::Value;

use crate::planner::{SortDirection, SortSpec};
use crate::value::loose_cmp;

use super::resolver::own_property;

/// Sorts result rows
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts rows according to the ORDER BY list.
    ///
    /// Stable and deterministic. Values that do not order against each other
    /// (absent fields, NaN, mixed kinds that fail to coerce) compare equal
    /// and keep their relative order.
    pub fn sort<T: Borrow<Value>>(rows: Vec<T>, sorts: &[SortSpec]) -> Vec<T> {
        sorts.iter().rev().fold(rows, |rows, spec| {
            merge_sort(rows, &|a: &T, b: &T| Self::compare(a.borrow(), b.borrow(), spec))
        })
    }

    fn compare(a: &Value, b: &Value, spec: &SortSpec) -> Ordering {
        let ordering = match loose_cmp(own_property(a, &spec.field), own_property(b, &spec.field)) {
            Some(Ordering::Less) => Ordering::Less,
            Some(Ordering::Greater) => Ordering::Greater,
            _ => Ordering::Equal,
        };

        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Top-down stable merge sort.
///
/// Only ever asks `cmp(right, left) == Less`, so a comparator that is not a
/// total order produces some permutation instead of a panic.
fn merge_sort<T, F>(mut items: Vec<T>, cmp: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, cmp);
    let right = merge_sort(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(r, l) == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(rows: &[Value]) -> Vec<&str> {
        rows.iter().map(|r| r["name"].as_str().unwrap_or("")).collect()
    }

    fn startups() -> Vec<Value> {
        vec![
            json!({"name": "Postini", "founded_year": 1999}),
            json!({"name": "Digg", "founded_year": 2004}),
            json!({"name": "Airbnb", "founded_year": 2007}),
            json!({"name": "TripIt", "founded_year": 2006}),
            json!({"name": "Twitter", "founded_year": 2006}),
            json!({"name": "Spotify", "founded_year": 2006}),
            json!({"name": "Airbnb", "founded_year": 2008}),
        ]
    }

    #[test]
    fn test_sort_ascending() {
        let sorted = ResultSorter::sort(startups(), &[SortSpec::asc("founded_year")]);
        assert_eq!(
            names(&sorted),
            vec!["Postini", "Digg", "TripIt", "Twitter", "Spotify", "Airbnb", "Airbnb"]
        );
    }

    #[test]
    fn test_sort_descending_is_stable() {
        let sorted = ResultSorter::sort(startups(), &[SortSpec::desc("founded_year")]);
        assert_eq!(
            names(&sorted),
            vec!["Airbnb", "Airbnb", "TripIt", "Twitter", "Spotify", "Digg", "Postini"]
        );
    }

    #[test]
    fn test_first_key_dominates() {
        let sorted = ResultSorter::sort(
            startups(),
            &[SortSpec::desc("founded_year"), SortSpec::asc("name")],
        );
        let years: Vec<i64> = sorted.iter().filter_map(|r| r["founded_year"].as_i64()).collect();

        assert_eq!(
            names(&sorted),
            vec!["Airbnb", "Airbnb", "Spotify", "TripIt", "Twitter", "Digg", "Postini"]
        );
        assert_eq!(years, vec![2008, 2007, 2006, 2006, 2006, 2004, 1999]);
    }

    #[test]
    fn test_no_sorts_keeps_order() {
        let sorted = ResultSorter::sort(startups(), &[]);
        assert_eq!(sorted, startups());
    }

    #[test]
    fn test_unordered_values_keep_position() {
        let rows = vec![
            json!({"name": "b", "rank": 2}),
            json!({"name": "x"}),
            json!({"name": "a", "rank": 1}),
            json!({"name": "y", "rank": null}),
        ];

        // Absent and NaN-coerced keys compare equal to everything, so the
        // outcome is some permutation; it must not panic and must keep all rows
        let sorted = ResultSorter::sort(rows, &[SortSpec::asc("rank")]);
        assert_eq!(sorted.len(), 4);
    }

    #[test]
    fn test_sorts_borrowed_rows() {
        let records = startups();
        let rows: Vec<&Value> = records.iter().collect();

        let sorted = ResultSorter::sort(rows, &[SortSpec::asc("name")]);
        assert_eq!(sorted[0]["name"], json!("Airbnb"));
        assert_eq!(sorted[0]["founded_year"], json!(2007));
        assert!(std::ptr::eq(sorted[0], &records[2]));
    }

    #[test]
    fn test_nested_path_is_not_resolved() {
        let rows = vec![
            json!({"name": "b", "office": {"city": "A"}}),
            json!({"name": "a", "office": {"city": "B"}}),
        ];

        let sorted = ResultSorter::sort(rows.clone(), &[SortSpec::desc("office.city")]);
        assert_eq!(sorted, rows);
    }
}
