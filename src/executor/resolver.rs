//! Field resolution for predicates
//!
//! A plain name reads the record's own key. A dot-separated path walks
//! nested objects, with two fallbacks callers rely on:
//!
//! - a missing intermediate segment turns the walk into `null`, and every
//!   later lookup on it fails
//! - a missing final segment resolves to the container it was looked up in
//!
//! So `address.zip` on `{"address": {"city": "SF"}}` yields the address
//! object, and `company.address.zip` on `{}` yields `null`.

use serde_json::Value;

static NULL: Value = Value::Null;

/// Resolves `path` against `record`; `None` means no value
pub fn resolve<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let Some((parents, last)) = path.rsplit_once('.') else {
        return own_property(record, path);
    };

    let container = parents
        .split('.')
        .fold(record, |current, segment| own_property(current, segment).unwrap_or(&NULL));

    Some(own_property(container, last).unwrap_or(container))
}

/// Reads a key the value itself holds. Arrays expose their indices.
pub fn own_property<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => array_index(key).and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Returns true if the value holds `key` itself
pub fn has_own_property(value: &Value, key: &str) -> bool {
    own_property(value, key).is_some()
}

fn array_index(key: &str) -> Option<usize> {
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse().ok()
}
