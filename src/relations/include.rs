//! Include-list normalization and merging.
//!
//! The `include` option arrives in several shapes: a bare relation name,
//! a list of entries, or a mapping (either one relation per key or the
//! scoped `{relation: .., scope: ..}` form). Everything normalizes to a
//! list of single-key entries before merging, so default-scope includes
//! and runtime includes can be combined by relation name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shape-polymorphic `include` option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Include {
    /// A single relation name.
    Relation(String),
    /// A mapping: one relation per key, or the scoped form carrying a
    /// `relation`/`rel` key.
    Object(Map<String, Value>),
    /// A list of include entries.
    List(Vec<Include>),
}

impl Include {
    /// The bare relation name, when this include is a single name.
    pub fn as_single_relation(&self) -> Option<&str> {
        match self {
            Self::Relation(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Normalize into a list of entries.
    ///
    /// `"name"` becomes `{name: true}`; a bare mapping contributes one
    /// entry per key; a scoped mapping stays a single entry; lists
    /// normalize recursively.
    pub fn normalize(&self) -> Vec<Map<String, Value>> {
        match self {
            Self::Relation(name) => vec![single_entry(name, Value::Bool(true))],
            Self::Object(map) => {
                if map.contains_key("relation") || map.contains_key("rel") {
                    vec![map.clone()]
                } else {
                    map.iter()
                        .map(|(name, scope)| single_entry(name, scope.clone()))
                        .collect()
                }
            }
            Self::List(items) => items.iter().flat_map(Include::normalize).collect(),
        }
    }
}

fn single_entry(name: &str, scope: Value) -> Map<String, Value> {
    let mut entry = Map::new();
    entry.insert(name.to_string(), scope);
    entry
}

/// Relation name of a normalized entry: the `relation`/`rel` marker when
/// present, otherwise the entry's first key.
pub(crate) fn entry_relation_name(entry: &Map<String, Value>) -> Option<&str> {
    if let Some(name) = entry.get("relation").and_then(Value::as_str) {
        return Some(name);
    }
    if let Some(name) = entry.get("rel").and_then(Value::as_str) {
        return Some(name);
    }
    entry.keys().next().map(String::as_str)
}

/// Merge two include options into a normalized entry list.
///
/// Every `source` entry is kept; `destination` entries follow unless
/// their relation name already appears in `source`. Source wins on
/// collision, order is otherwise preserved.
///
/// ```rust
/// use quarry_query::{Include, merge_includes};
/// use serde_json::json;
///
/// let dest = Include::List(vec![
///     Include::Relation("a".into()),
///     Include::Relation("b".into()),
/// ]);
/// let source = Include::Relation("b".into());
/// let merged = merge_includes(Some(&dest), Some(&source));
/// assert_eq!(serde_json::to_value(&merged).unwrap(), json!([{"b": true}, {"a": true}]));
/// ```
pub fn merge_includes(
    destination: Option<&Include>,
    source: Option<&Include>,
) -> Vec<Map<String, Value>> {
    let destination_entries = destination.map(Include::normalize).unwrap_or_default();
    let source_entries = source.map(Include::normalize).unwrap_or_default();
    if destination_entries.is_empty() {
        return source_entries;
    }
    if source_entries.is_empty() {
        return destination_entries;
    }

    let mut taken_names: Vec<String> = Vec::new();
    let mut merged = Vec::with_capacity(source_entries.len() + destination_entries.len());
    for entry in source_entries {
        if let Some(name) = entry_relation_name(&entry) {
            taken_names.push(name.to_string());
        }
        merged.push(entry);
    }
    for entry in destination_entries {
        let collides = entry_relation_name(&entry)
            .is_some_and(|name| taken_names.iter().any(|taken| taken == name));
        if !collides {
            merged.push(entry);
        }
    }
    merged
}
