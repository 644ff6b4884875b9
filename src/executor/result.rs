//! Result types for query execution

use std::borrow::Cow;

use serde_json::Value;

/// Result of query execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult<'a> {
    /// Rows in result order; borrowed for wildcard plans, owned otherwise
    pub rows: Vec<Cow<'a, Value>>,
    /// Number of records scanned
    pub scanned_count: usize,
    /// Number of rows returned
    pub returned_count: usize,
}

impl<'a> ExecutionResult<'a> {
    /// Creates an empty result
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            scanned_count: 0,
            returned_count: 0,
        }
    }

    /// Returns true if no records matched
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns an iterator over the rows
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.rows.iter().map(|row| row.as_ref())
    }

    /// Detaches the rows from the input records
    pub fn into_owned(self) -> Vec<Value> {
        self.rows.into_iter().map(Cow::into_owned).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execution_result_empty() {
        let result = ExecutionResult::empty();
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
    }

    #[test]
    fn test_mixed_rows() {
        let record = json!({"name": "Digg"});
        let result = ExecutionResult {
            rows: vec![Cow::Borrowed(&record), Cow::Owned(json!({"name": "TripIt"}))],
            scanned_count: 5,
            returned_count: 2,
        };

        let names: Vec<_> = result.iter().map(|r| r["name"].clone()).collect();
        assert_eq!(names, vec![json!("Digg"), json!("TripIt")]);
        assert_eq!(result.into_owned().len(), 2);
    }
}
