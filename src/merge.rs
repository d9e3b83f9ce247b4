//! Deep merge and clone for plain data values.
//!
//! [`deep_merge`] combines two JSON-like trees without mutating either
//! input. Mappings merge recursively, sequences merge as a union (items
//! from `extras` are appended only when not already present), and calling
//! it with a single argument performs a pure deep clone. Datasource
//! settings overlays use the same routine.

use serde_json::{Map, Value};

/// Check if a value is a plain mapping.
pub fn is_plain_object(value: &Value) -> bool {
    value.is_object()
}

/// Deep-merge `extras` into `base`, returning a new value.
///
/// - Two sequences (or a sequence with no `extras`) produce a union: all
///   elements of `base` followed by the elements of `extras` not already
///   present, compared by value. Elements are never merged individually.
/// - A mapping `base` is deep-cloned, then each `extras` entry either
///   overwrites (scalar), replaces (no mergeable base slot), or recurses
///   (both slots are containers).
/// - With `extras` absent the result is a deep clone of `base`.
///
/// Neither input is mutated.
///
/// ```rust
/// use quarry_query::deep_merge;
/// use serde_json::json;
///
/// let merged = deep_merge(
///     Some(&json!({"limits": {"rows": 10}, "tags": ["a"]})),
///     Some(&json!({"limits": {"cols": 4}, "tags": ["b", "a"]})),
/// );
/// assert_eq!(
///     merged,
///     json!({"limits": {"rows": 10, "cols": 4}, "tags": ["a", "b"]})
/// );
/// ```
pub fn deep_merge(base: Option<&Value>, extras: Option<&Value>) -> Value {
    let as_sequence = matches!(base, Some(Value::Array(_)))
        && matches!(extras, Some(Value::Array(_)) | None);

    if as_sequence {
        let mut dst = match base {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        if let Some(Value::Array(extra_items)) = extras {
            for item in extra_items {
                if !dst.contains(item) {
                    dst.push(item.clone());
                }
            }
        }
        return Value::Array(dst);
    }

    let mut dst = Map::new();

    if let Some(Value::Object(base_map)) = base {
        for (key, value) in base_map {
            if value.is_object() || value.is_array() {
                // recurse with no second argument to deep-clone the slot
                dst.insert(key.clone(), deep_merge(Some(value), None));
            } else {
                dst.insert(key.clone(), value.clone());
            }
        }
    }

    if let Some(Value::Object(extra_map)) = extras {
        for (key, extra) in extra_map {
            if !(extra.is_object() || extra.is_array()) {
                dst.insert(key.clone(), extra.clone());
                continue;
            }
            let base_slot = match base {
                Some(Value::Object(base_map)) => {
                    base_map.get(key).filter(|slot| !slot.is_null())
                }
                _ => None,
            };
            match base_slot {
                Some(slot) => {
                    dst.insert(key.clone(), deep_merge(Some(slot), Some(extra)));
                }
                None => {
                    dst.insert(key.clone(), deep_merge(Some(extra), None));
                }
            }
        }
    }

    Value::Object(dst)
}

/// Deep-merge a single property value of any type.
///
/// Wraps both sides in a one-key mapping, merges, and unwraps, so scalars
/// and sequences get the same treatment they would receive as a nested
/// slot of [`deep_merge`].
pub fn deep_merge_property(base: Option<&Value>, extras: Option<&Value>) -> Option<Value> {
    const KEY: &str = "value";

    let wrap = |side: Option<&Value>| {
        let mut map = Map::new();
        if let Some(value) = side {
            map.insert(KEY.to_string(), value.clone());
        }
        Value::Object(map)
    };

    match deep_merge(Some(&wrap(base)), Some(&wrap(extras))) {
        Value::Object(mut merged) => merged.remove(KEY),
        _ => None,
    }
}
