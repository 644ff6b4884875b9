//! Projection of surviving records into the SELECT shape

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::config::FieldMap;
use crate::planner::SelectField;

use super::resolver::own_property;

/// Maps records into the output shape of a SELECT list
pub struct Projector<'p> {
    fields: &'p [SelectField],
    field_map: &'p FieldMap,
}

impl<'p> Projector<'p> {
    pub fn new(fields: &'p [SelectField], field_map: &'p FieldMap) -> Self {
        Self { fields, field_map }
    }

    /// True when records pass through untouched
    pub fn is_wildcard(&self) -> bool {
        self.fields.first().map_or(true, SelectField::is_wildcard)
    }

    /// Projects one record.
    ///
    /// Wildcard lists hand back the record itself. Otherwise a new object is
    /// built in SELECT order; values that do not exist are left out.
    pub fn project<'a>(&self, record: &'a Value) -> Cow<'a, Value> {
        if self.is_wildcard() {
            return Cow::Borrowed(record);
        }

        let mut output = Map::new();
        for field in self.fields {
            if field.is_nested() {
                Self::copy_branch(record, &field.name, &mut output);
            } else {
                let key = field.alias.as_deref().unwrap_or(&field.name);
                let source = self.field_map.projection_key(key).unwrap_or(&field.name);
                if let Some(value) = own_property(record, source) {
                    output.insert(key.to_string(), value.clone());
                }
            }
        }

        Cow::Owned(Value::Object(output))
    }

    /// Copies `a.b.c` into `{"a": {"b": {"c": ..}}}`, merging with any
    /// branch already built. Each intermediate segment the source holds
    /// (of any type) gets an output object; the walk stops at the first
    /// one it lacks. The last segment is copied only when present.
    fn copy_branch(record: &Value, path: &str, output: &mut Map<String, Value>) {
        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(last) = segments.pop() else {
            return;
        };

        let mut source = record;
        let mut slot = output;
        for segment in segments {
            let Some(next) = own_property(source, segment) else {
                return;
            };
            let entry = slot
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            match entry {
                Value::Object(inner) => slot = inner,
                _ => return,
            }
            source = next;
        }

        if let Some(value) = own_property(source, last) {
            slot.insert(last.to_string(), value.clone());
        }
    }
}
