//! Query filter composition.
//!
//! A [`Query`] bundles the optional parts of a find operation: the
//! `where` predicate tree, relation includes, field selection, ordering,
//! and pagination. [`merge_query`] folds a runtime query into a base
//! query (typically a default scope), honoring a [`MergeOptions`] policy
//! that can disable individual parts.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::model::{ModelDescriptor, PropertyKind};
use crate::relations::{FieldSpec, Include, merge_includes};

/// A predicate tree over record fields: field → constraint, or
/// `and`/`or` → list of subtrees.
pub type Where = Map<String, Value>;

/// Shape-polymorphic `order` option: one clause or several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Order {
    /// A single ordering clause, e.g. `"name DESC"`.
    Clause(String),
    /// Several ordering clauses, applied in sequence.
    Clauses(Vec<String>),
}

/// The optional parts of a find operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    /// Predicate tree restricting matched records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#where: Option<Where>,
    /// Relations to attach to the results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Include>,
    /// Field selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldSpec>,
    /// Result ordering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    /// Maximum number of results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Number of results to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    /// Alias for `skip` used by some connectors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    /// Property to collect from through-model results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collect: Option<String>,
}

impl Query {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Per-part merge policy for [`merge_query`]. Disabling a part keeps the
/// base value; `fields` falls back to concatenation instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    /// Merge the update's include option.
    pub include: bool,
    /// Nest the existing include under the update's relation instead of
    /// merging at the same level (scoped queries).
    pub nested_include: bool,
    /// Take the update's collect option.
    pub collect: bool,
    /// Take the update's fields; when disabled, concatenate both sides.
    pub fields: bool,
    /// Keep an existing base order; when disabled, the update's order
    /// overwrites it.
    pub order: bool,
    /// Take the update's limit.
    pub limit: bool,
    /// Take the update's skip (requires `offset` as well).
    pub skip: bool,
    /// Take the update's offset (requires `skip` as well).
    pub offset: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            include: true,
            nested_include: false,
            collect: true,
            fields: true,
            order: true,
            limit: true,
            skip: true,
            offset: true,
        }
    }
}

/// Combine two predicate trees into a conjunction.
///
/// Both sides non-empty produce `{and: [base, update]}`; a single
/// non-empty side is taken as-is. Constraints accumulate, they never
/// overwrite each other's keys.
pub fn merge_where(base: Option<Where>, update: &Where) -> Where {
    match base {
        Some(existing) if !existing.is_empty() => {
            let mut conjunction = Where::new();
            conjunction.insert(
                "and".to_string(),
                Value::Array(vec![Value::Object(existing), Value::Object(update.clone())]),
            );
            conjunction
        }
        _ => update.clone(),
    }
}

/// Fold `update` into `base` under the given merge policy.
///
/// Returns `Ok(false)` without touching `base` when `update` is absent,
/// `Ok(true)` after a merge. `update` is never mutated.
///
/// ```rust
/// use quarry_query::{MergeOptions, Query, merge_query};
/// use serde_json::json;
///
/// let mut base: Query = serde_json::from_value(json!({"where": {"a": 1}})).unwrap();
/// let update: Query = serde_json::from_value(json!({"where": {"b": 2}})).unwrap();
/// merge_query(&mut base, Some(&update), &MergeOptions::default()).unwrap();
/// assert_eq!(
///     serde_json::to_value(&base).unwrap(),
///     json!({"where": {"and": [{"a": 1}, {"b": 2}]}})
/// );
/// ```
pub fn merge_query(
    base: &mut Query,
    update: Option<&Query>,
    options: &MergeOptions,
) -> QueryResult<bool> {
    let Some(update) = update else {
        return Ok(false);
    };
    debug!(nested_include = options.nested_include, "merge_query()");

    if let Some(update_where) = update.r#where.as_ref().filter(|tree| !tree.is_empty()) {
        base.r#where = Some(merge_where(base.r#where.take(), update_where));
    }

    if options.include {
        if let Some(update_include) = update.include.as_ref() {
            let combined = match base.include.as_ref() {
                None => update_include.clone(),
                Some(existing) => {
                    if options.nested_include {
                        nest_include(existing, update_include)?
                    } else {
                        Include::List(
                            merge_includes(Some(existing), Some(update_include))
                                .into_iter()
                                .map(Include::Object)
                                .collect(),
                        )
                    }
                }
            };
            base.include = Some(combined);
        }
    }

    if options.collect {
        if let Some(collect) = update.collect.as_ref() {
            base.collect = Some(collect.clone());
        }
    }

    if let Some(update_fields) = update.fields.as_ref() {
        if options.fields {
            base.fields = Some(update_fields.clone());
        } else {
            base.fields = Some(FieldSpec::concat(base.fields.as_ref(), update_fields));
        }
    }

    if let Some(order) = update.order.as_ref() {
        if base.order.is_none() || !options.order {
            base.order = Some(order.clone());
        }
    }

    if options.limit {
        if let Some(limit) = update.limit {
            base.limit = Some(limit);
        }
    }

    let paginate = options.skip && options.offset;
    if paginate {
        if let Some(skip) = update.skip {
            base.skip = Some(skip);
        }
        if let Some(offset) = update.offset {
            base.offset = Some(offset);
        }
    }

    Ok(true)
}

/// Nest the saved include under the update's relation, so an inclusion
/// requested on a scoped query attaches to the related model rather than
/// the scope owner.
fn nest_include(existing: &Include, update: &Include) -> QueryResult<Include> {
    let Some(relation) = update.as_single_relation() else {
        return Err(QueryError::invalid_include(
            "nested include merging requires a single relation name",
        ));
    };
    let saved = serde_json::to_value(existing)
        .map_err(|err| QueryError::internal(format!("include serialization failed: {err}")))?;
    let mut nested = Map::new();
    nested.insert(relation.to_string(), saved);
    Ok(Include::Object(nested))
}

/// Copy fixed property values from a where clause into `data`.
///
/// Descends into `and` conjunctions; for each declared model property a
/// scalar constraint is copied verbatim, while structured values are
/// only copied for properties declared as structured ids. Operator
/// constraints (`{gt: ..}`, `{inq: ..}`) are left out.
pub fn set_scope_values_from_where(
    data: &mut Map<String, Value>,
    r#where: &Where,
    model: &ModelDescriptor,
) {
    for (field, constraint) in r#where {
        if field == "and" {
            if let Value::Array(clauses) = constraint {
                for clause in clauses {
                    if let Value::Object(subtree) = clause {
                        set_scope_values_from_where(data, subtree, model);
                    }
                }
            }
            continue;
        }
        let Some(kind) = model.property_kind(field) else {
            continue;
        };
        let structured = constraint.is_object() || constraint.is_array();
        if !structured || kind == PropertyKind::OpaqueId {
            data.insert(field.clone(), constraint.clone());
        }
    }
}
