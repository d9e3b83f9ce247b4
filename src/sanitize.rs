//! Null-slot stripping for query objects.
//!
//! Query input assembled from optional caller data routinely carries null
//! slots (`{"where": {"id": null}}`) that most connectors must not see.
//! [`remove_undefined`] walks a query tree and applies a
//! [`UndefinedPolicy`] to every null slot it finds.

use serde_json::{Map, Value};

use crate::error::{QueryError, QueryResult};

/// What to do with a null slot encountered while scrubbing a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndefinedPolicy {
    /// Remove the key or element entirely (the default).
    #[default]
    Ignore,
    /// Keep the slot with an explicit null.
    Nullify,
    /// Abort the traversal with an [`ErrorCode::InvalidFilter`] error.
    ///
    /// [`ErrorCode::InvalidFilter`]: crate::error::ErrorCode::InvalidFilter
    Throw,
}

/// Deep-traverse `query` and apply `policy` to every null slot.
///
/// Only mappings and sequences are walked; scalar values are kept
/// verbatim. The input is never mutated.
///
/// ```rust
/// use quarry_query::{UndefinedPolicy, remove_undefined};
/// use serde_json::json;
///
/// let query = json!({"a": null, "b": 1});
/// let scrubbed = remove_undefined(&query, UndefinedPolicy::Ignore).unwrap();
/// assert_eq!(scrubbed, json!({"b": 1}));
///
/// let kept = remove_undefined(&query, UndefinedPolicy::Nullify).unwrap();
/// assert_eq!(kept, json!({"a": null, "b": 1}));
/// ```
pub fn remove_undefined(query: &Value, policy: UndefinedPolicy) -> QueryResult<Value> {
    match query {
        Value::Object(map) => {
            let mut scrubbed = Map::new();
            for (key, slot) in map {
                if slot.is_null() {
                    match policy {
                        UndefinedPolicy::Ignore => {}
                        UndefinedPolicy::Nullify => {
                            scrubbed.insert(key.clone(), Value::Null);
                        }
                        UndefinedPolicy::Throw => return Err(unexpected_null()),
                    }
                } else {
                    scrubbed.insert(key.clone(), remove_undefined(slot, policy)?);
                }
            }
            Ok(Value::Object(scrubbed))
        }
        Value::Array(items) => {
            let mut scrubbed = Vec::with_capacity(items.len());
            for item in items {
                if item.is_null() {
                    match policy {
                        UndefinedPolicy::Ignore => {}
                        UndefinedPolicy::Nullify => scrubbed.push(Value::Null),
                        UndefinedPolicy::Throw => return Err(unexpected_null()),
                    }
                } else {
                    scrubbed.push(remove_undefined(item, policy)?);
                }
            }
            Ok(Value::Array(scrubbed))
        }
        other => Ok(other.clone()),
    }
}

fn unexpected_null() -> QueryError {
    QueryError::invalid_filter("unexpected null value in query")
}
