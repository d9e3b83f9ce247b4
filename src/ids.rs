//! Identifier comparison and array helpers.
//!
//! Identifiers come in mixed shapes — numbers, strings, or structured
//! database-native values already serialized into JSON. Equality is
//! value-based with numeric/string coercion, falling back to canonical
//! serialized comparison for structured values.

use std::collections::HashSet;

use serde_json::Value;

use crate::query::Where;
use crate::record::Record;

/// Compare two identifier values.
///
/// Strictly equal values match; a number and a string match when the
/// string parses to the same number; everything else compares by
/// canonical serialized form.
///
/// ```rust
/// use quarry_query::id_equals;
/// use serde_json::json;
///
/// assert!(id_equals(&json!(1), &json!("1")));
/// assert!(id_equals(&json!({"oid": "abc"}), &json!({"oid": "abc"})));
/// assert!(!id_equals(&json!({"oid": "abc"}), &json!({"oid": "xyz"})));
/// ```
pub fn id_equals(id1: &Value, id2: &Value) -> bool {
    if id1 == id2 {
        return true;
    }
    match (id1, id2) {
        (Value::Number(a), Value::Number(b)) => {
            // distinct integer/float representations of the same value
            a.as_f64().is_some() && a.as_f64() == b.as_f64()
        }
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            match s.parse::<f64>() {
                Ok(parsed) => n.as_f64().is_some_and(|v| v == parsed),
                Err(_) => false,
            }
        }
        _ => comparable_key(id1) == comparable_key(id2),
    }
}

/// Check a list of ids for duplicates.
///
/// While every element is a primitive string or number a uniqueness set
/// decides in O(n); the set applies no cross-type coercion, so `1` and
/// `"1"` are distinct there. The first structured element makes the set
/// inconclusive and the whole slice is re-checked pairwise with
/// [`id_equals`].
pub fn ids_have_duplicates(ids: &[Value]) -> bool {
    let mut unique = HashSet::with_capacity(ids.len());
    let mut verdict: Option<bool> = None;

    for id in ids {
        match id {
            Value::String(_) | Value::Number(_) => {
                if !unique.insert(comparable_key(id)) {
                    verdict = Some(true);
                    break;
                }
            }
            // structured id, the set cannot decide
            _ => break,
        }
    }
    if verdict.is_none() && unique.len() == ids.len() {
        verdict = Some(false);
    }
    if let Some(found) = verdict {
        return found;
    }

    for i in 0..ids.len() {
        for j in 0..i {
            if id_equals(&ids[i], &ids[j]) {
                return true;
            }
        }
    }
    false
}

/// Dedupe a slice of values, keeping the first occurrence of each.
///
/// Structured values compare by canonical serialized form; primitives by
/// type-tagged value, so `1` and `"1"` stay distinct.
pub fn uniq(values: &[Value]) -> Vec<Value> {
    let mut seen = HashSet::with_capacity(values.len());
    let mut deduped = Vec::with_capacity(values.len());
    for value in values {
        if seen.insert(comparable_key(value)) {
            deduped.push(value.clone());
        }
    }
    deduped
}

/// First index in `items` matching `target` under `is_equal`.
pub fn find_index_of<T>(
    items: &[T],
    target: &T,
    is_equal: impl Fn(&T, &T) -> bool,
) -> Option<usize> {
    items.iter().position(|item| is_equal(item, target))
}

/// Reorder `records` to follow the positions of their ids within `ids`.
///
/// Records whose `id_name` field appears in `ids` come first, stably
/// sorted by the position of that id; records without a match follow in
/// their original order, or are dropped entirely when `strict`.
///
/// ```rust
/// use quarry_query::{Record, sort_objects_by_ids};
/// use serde_json::json;
///
/// let records = vec![
///     Record::try_from(json!({"id": 1})).unwrap(),
///     Record::try_from(json!({"id": 3})).unwrap(),
///     Record::try_from(json!({"id": 2})).unwrap(),
/// ];
/// let sorted = sort_objects_by_ids("id", &[json!(2), json!(1)], records, false);
/// let ids: Vec<_> = sorted.iter().map(|r| r.get("id").cloned()).collect();
/// assert_eq!(ids, vec![Some(json!(2)), Some(json!(1)), Some(json!(3))]);
/// ```
pub fn sort_objects_by_ids(
    id_name: &str,
    ids: &[Value],
    records: Vec<Record>,
    strict: bool,
) -> Vec<Record> {
    let positions: Vec<String> = ids.iter().map(comparable_key).collect();
    let index_of = |record: &Record| -> Option<usize> {
        let id = record.get(id_name)?;
        let key = comparable_key(id);
        positions.iter().position(|candidate| *candidate == key)
    };

    let mut heading: Vec<(usize, Record)> = Vec::new();
    let mut tailing: Vec<Record> = Vec::new();
    for record in records {
        match index_of(&record) {
            Some(position) => heading.push((position, record)),
            None => {
                if !strict {
                    tailing.push(record);
                }
            }
        }
    }
    // stable, so records sharing an id keep their relative order
    heading.sort_by_key(|(position, _)| *position);

    heading
        .into_iter()
        .map(|(_, record)| record)
        .chain(tailing)
        .collect()
}

/// Build an `inq` predicate fragment over the deduped ids of `records`.
///
/// The returned tree slots directly into a where clause for the named
/// field: `{field: {inq: [...]}}`.
pub fn collect_target_ids(records: &[Record], id_field: &str) -> Where {
    let ids: Vec<Value> = records
        .iter()
        .map(|record| record.get(id_field).cloned().unwrap_or(Value::Null))
        .collect();
    let mut fragment = Where::new();
    fragment.insert("inq".to_string(), Value::Array(uniq(&ids)));
    fragment
}

/// Type-tagged comparison key: primitives keep their type, structured
/// values use their canonical serialized form.
fn comparable_key(value: &Value) -> String {
    match value {
        Value::String(s) => format!("s:{s}"),
        // normalize through f64 so integer and float spellings of the
        // same number share a key
        Value::Number(n) => match n.as_f64() {
            Some(f) => format!("n:{f}"),
            None => format!("n:{n}"),
        },
        Value::Bool(b) => format!("b:{b}"),
        Value::Null => "null".to_string(),
        structured => format!("c:{structured}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_id_equals_strict() {
        assert!(id_equals(&json!(1), &json!(1)));
        assert!(id_equals(&json!("a"), &json!("a")));
        assert!(!id_equals(&json!(1), &json!(2)));
    }

    #[test]
    fn test_id_equals_coerces_number_and_string() {
        assert!(id_equals(&json!(1), &json!("1")));
        assert!(id_equals(&json!("2.5"), &json!(2.5)));
        assert!(!id_equals(&json!(1), &json!("one")));
    }

    #[test]
    fn test_id_equals_number_spellings() {
        assert!(id_equals(&json!(1), &json!(1.0)));
        assert!(!id_equals(&json!(1), &json!(1.5)));
    }

    #[test]
    fn test_id_equals_structural() {
        assert!(id_equals(&json!({"x": 1}), &json!({"x": 1})));
        assert!(!id_equals(&json!({"x": 1}), &json!({"x": 2})));
    }

    #[test]
    fn test_ids_have_duplicates_primitive_fast_path() {
        assert!(!ids_have_duplicates(&[json!(1), json!("1")]));
        assert!(ids_have_duplicates(&[json!(1), json!(2), json!(1)]));
        assert!(!ids_have_duplicates(&[json!("a"), json!("b")]));
    }

    #[test]
    fn test_ids_have_duplicates_structured_fallback() {
        assert!(ids_have_duplicates(&[
            json!({"oid": "a"}),
            json!(1),
            json!({"oid": "a"}),
        ]));
        assert!(!ids_have_duplicates(&[json!({"oid": "a"}), json!({"oid": "b"})]));
    }

    #[test]
    fn test_ids_have_duplicates_mixed_checks_whole_slice() {
        // the duplicate pair sits before the structured element that
        // aborts the fast path
        assert!(ids_have_duplicates(&[json!(7), json!(7), json!({"oid": "a"})]));
    }

    #[test]
    fn test_uniq_keeps_first_occurrence() {
        let deduped = uniq(&[json!(1), json!(2), json!(1), json!(3)]);
        assert_eq!(deduped, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_uniq_distinguishes_types() {
        let deduped = uniq(&[json!(1), json!("1")]);
        assert_eq!(deduped, vec![json!(1), json!("1")]);
    }

    #[test]
    fn test_uniq_structured_by_serialized_form() {
        let deduped = uniq(&[json!({"oid": "a"}), json!({"oid": "a"}), json!({"oid": "b"})]);
        assert_eq!(deduped, vec![json!({"oid": "a"}), json!({"oid": "b"})]);
    }

    #[test]
    fn test_uniq_empty() {
        assert!(uniq(&[]).is_empty());
    }

    #[test]
    fn test_find_index_of_with_custom_equality() {
        let ids = [json!(1), json!("2"), json!(3)];
        assert_eq!(find_index_of(&ids, &json!(2), id_equals), Some(1));
        assert_eq!(find_index_of(&ids, &json!(4), id_equals), None);
    }

    #[test]
    fn test_sort_objects_by_ids() {
        let records = vec![
            Record::try_from(json!({"id": 1})).unwrap(),
            Record::try_from(json!({"id": 3})).unwrap(),
            Record::try_from(json!({"id": 2})).unwrap(),
        ];
        let sorted = sort_objects_by_ids("id", &[json!(2), json!(1)], records, false);
        let ids: Vec<_> = sorted.iter().filter_map(|r| r.get("id").cloned()).collect();
        assert_eq!(ids, vec![json!(2), json!(1), json!(3)]);
    }

    #[test]
    fn test_sort_objects_by_ids_strict_drops_unmatched() {
        let records = vec![
            Record::try_from(json!({"id": 1})).unwrap(),
            Record::try_from(json!({"id": 3})).unwrap(),
        ];
        let sorted = sort_objects_by_ids("id", &[json!(1)], records, true);
        assert_eq!(sorted.len(), 1);
        assert_eq!(sorted[0].get("id"), Some(&json!(1)));
    }

    #[test]
    fn test_sort_objects_by_ids_structured_ids() {
        let records = vec![
            Record::try_from(json!({"id": {"oid": "b"}})).unwrap(),
            Record::try_from(json!({"id": {"oid": "a"}})).unwrap(),
        ];
        let sorted = sort_objects_by_ids(
            "id",
            &[json!({"oid": "a"}), json!({"oid": "b"})],
            records,
            false,
        );
        assert_eq!(sorted[0].get("id"), Some(&json!({"oid": "a"})));
        assert_eq!(sorted[1].get("id"), Some(&json!({"oid": "b"})));
    }

    #[test]
    fn test_collect_target_ids() {
        let records = vec![
            Record::try_from(json!({"id": 1, "name": "a"})).unwrap(),
            Record::try_from(json!({"id": 2, "name": "b"})).unwrap(),
            Record::try_from(json!({"id": 1, "name": "c"})).unwrap(),
        ];
        let fragment = collect_target_ids(&records, "id");
        assert_eq!(fragment.get("inq"), Some(&json!([1, 2])));
    }
}
