//! Compiler configuration
//!
//! The parameter table and field map are read once, when a plan is
//! compiled. Changing a config afterwards has no effect on plans already
//! built from it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameter table: `@name` literals resolve against it
pub type Parameters = Map<String, Value>;

/// Mapping between query-facing field names and record keys.
///
/// The two directions are independent:
/// - `predicate`: query field name -> record key, used when filtering
/// - `projection`: output field name (alias or selected name) -> record key,
///   used when building projected rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap {
    #[serde(default)]
    pub predicate: HashMap<String, String>,

    #[serde(default)]
    pub projection: HashMap<String, String>,
}

impl FieldMap {
    /// Creates an empty field map
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses one mapping for both directions
    pub fn symmetric<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            predicate: map.clone(),
            projection: map,
        }
    }

    /// Adds a query-field -> record-key mapping used by predicates
    pub fn with_predicate_key(mut self, field: impl Into<String>, key: impl Into<String>) -> Self {
        self.predicate.insert(field.into(), key.into());
        self
    }

    /// Adds an output-name -> record-key mapping used by projection
    pub fn with_projection_key(mut self, output: impl Into<String>, key: impl Into<String>) -> Self {
        self.projection.insert(output.into(), key.into());
        self
    }

    /// Record key a predicate on `field` reads
    pub fn predicate_key<'a>(&'a self, field: &'a str) -> &'a str {
        lookup(&self.predicate, field).unwrap_or(field)
    }

    /// Record key projected under `output`, if one is mapped
    pub fn projection_key(&self, output: &str) -> Option<&str> {
        lookup(&self.projection, output)
    }
}

// Empty mappings count as unmapped
fn lookup<'a>(map: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    map.get(name).map(String::as_str).filter(|key| !key.is_empty())
}

/// Configuration captured by the compiler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Parameter table. `None` leaves `@name` literals as plain strings.
    #[serde(default)]
    pub params: Option<Parameters>,

    #[serde(default)]
    pub field_map: FieldMap,
}

impl CompilerConfig {
    /// Creates a config with no parameter table and an empty field map
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a parameter table
    pub fn with_params(mut self, params: Parameters) -> Self {
        self.params = Some(params);
        self
    }

    /// Sets one parameter, activating the table if needed
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params
            .get_or_insert_with(Map::new)
            .insert(name.into(), value.into());
        self
    }

    /// Installs a field map
    pub fn with_field_map(mut self, field_map: FieldMap) -> Self {
        self.field_map = field_map;
        self
    }
}
