//! Integration tests for query normalization.
//!
//! These tests verify the utilities working together the way the query
//! execution layer drives them:
//! - Default scope merged with a runtime query
//! - Field selection resolved against a model and applied to records
//! - Connection settings parsed, overlaid, and resolved to a connector
//! - Related records correlated and reordered by id

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};

use quarry_query::{
    Connector, ConnectorRegistry, ErrorCode, FieldSpec, MergeOptions, ModelDescriptor, Query,
    Record, UndefinedPolicy, collect_target_ids, create_promise_callback, fields_to_array,
    merge_query, parse_settings, remove_undefined, select_fields, set_scope_values_from_where,
    sort_objects_by_ids,
};

fn query(value: Value) -> Query {
    serde_json::from_value(value).unwrap()
}

fn as_value(query: &Query) -> Value {
    serde_json::to_value(query).unwrap()
}

fn records(value: Value) -> Vec<Record> {
    serde_json::from_value(value).unwrap()
}

/// A default scope combined with a runtime query: constraints conjoin,
/// includes merge by relation name, pagination comes from the runtime
/// side.
#[test]
fn test_default_scope_merge() {
    let mut scope = query(json!({
        "where": {"tenant": "t1"},
        "include": ["owner", "tags"],
        "order": "created_at DESC"
    }));
    let runtime = query(json!({
        "where": {"active": true},
        "include": {"relation": "tags", "scope": {"limit": 3}},
        "limit": 25,
        "skip": 50,
        "offset": 50
    }));

    merge_query(&mut scope, Some(&runtime), &MergeOptions::default()).unwrap();

    assert_eq!(
        as_value(&scope),
        json!({
            "where": {"and": [{"tenant": "t1"}, {"active": true}]},
            "include": [
                {"relation": "tags", "scope": {"limit": 3}},
                {"owner": true}
            ],
            "order": "created_at DESC",
            "limit": 25,
            "skip": 50,
            "offset": 50
        })
    );
}

/// Merging twice keeps accumulating conjunctions instead of overwriting.
#[test]
fn test_repeated_merges_accumulate() {
    let mut base = query(json!({"where": {"a": 1}}));
    merge_query(
        &mut base,
        Some(&query(json!({"where": {"b": 2}}))),
        &MergeOptions::default(),
    )
    .unwrap();
    merge_query(
        &mut base,
        Some(&query(json!({"where": {"c": 3}}))),
        &MergeOptions::default(),
    )
    .unwrap();
    assert_eq!(
        as_value(&base),
        json!({"where": {"and": [{"and": [{"a": 1}, {"b": 2}]}, {"c": 3}]}})
    );
}

/// A scoped query nests the saved inclusion under the new relation.
#[test]
fn test_scoped_query_nested_include() {
    let mut scope = query(json!({"include": "address"}));
    let runtime = query(json!({"include": "patients"}));
    let options = MergeOptions {
        nested_include: true,
        ..MergeOptions::default()
    };
    merge_query(&mut scope, Some(&runtime), &options).unwrap();
    assert_eq!(as_value(&scope), json!({"include": {"patients": "address"}}));
}

/// Field selection resolved against the model's properties, then applied
/// to result records.
#[test]
fn test_field_selection_flow() {
    let model = ModelDescriptor::new("User")
        .with_id("id")
        .scalar("name")
        .scalar("password_hash");
    let spec: FieldSpec = serde_json::from_value(json!({"password_hash": false})).unwrap();

    let fields = fields_to_array(Some(&spec), &model.property_names(), true).unwrap();
    assert_eq!(fields, vec!["id".to_string(), "name".to_string()]);

    let project = select_fields(fields);
    let rows = [
        json!({"id": 1, "name": "a", "password_hash": "x"}),
        json!({"id": 2, "password_hash": "y"}),
    ];
    let projected: Vec<Value> = rows
        .iter()
        .map(|row| Value::Object(project(row.as_object().unwrap())))
        .collect();
    assert_eq!(
        projected,
        vec![
            json!({"id": 1, "name": "a"}),
            json!({"id": 2, "name": null}),
        ]
    );
}

/// Fixed values from a scope's where clause seed the data of a new
/// record created through that scope.
#[test]
fn test_scope_values_seed_new_records() {
    let model = ModelDescriptor::new("Patient")
        .with_id("id")
        .scalar("physician_id")
        .scalar("status");
    let scope = query(json!({
        "where": {"and": [{"physician_id": 7}, {"status": "active"}]}
    }));

    let mut data = Map::new();
    data.insert("name".to_string(), json!("n"));
    set_scope_values_from_where(&mut data, scope.r#where.as_ref().unwrap(), &model);

    assert_eq!(
        Value::Object(data),
        json!({"name": "n", "physician_id": 7, "status": "active"})
    );
}

/// Settings parsed from a URL, overlaid with deploy-time overrides, and
/// resolved against the connector registry.
#[test]
fn test_settings_to_connector_flow() {
    struct MemoryConnector;
    impl Connector for MemoryConnector {
        fn name(&self) -> &str {
            "memory"
        }
    }

    let parsed = parse_settings("memory://cache-host:11211/sessions?ttl=30");
    assert_eq!(parsed.connector.as_deref(), Some("memory"));
    assert_eq!(parsed.port, Some(11211));
    assert_eq!(parsed.param("ttl"), Some("30"));

    let overrides = parse_settings("memory://cache-host/sessions?ttl=60");
    let settings = parsed.merge(&overrides);
    assert_eq!(settings.param("ttl"), Some("60"));
    assert_eq!(settings.port, Some(11211));

    let mut registry = ConnectorRegistry::new();
    let connector_name = settings.connector.as_deref().unwrap();
    assert!(registry.get(connector_name).is_err());

    registry.register(Arc::new(MemoryConnector));
    assert_eq!(registry.get(connector_name).unwrap().name(), "memory");
}

/// Related records correlated through an `inq` fragment and restored to
/// the order of the requesting ids.
#[test]
fn test_relation_correlation_flow() {
    let parents = records(json!([
        {"id": 2, "name": "b"},
        {"id": 1, "name": "a"},
        {"id": 2, "name": "dup"}
    ]));

    let fragment = collect_target_ids(&parents, "id");
    assert_eq!(Value::Object(fragment.clone()), json!({"inq": [2, 1]}));

    let mut where_tree = Map::new();
    where_tree.insert("parent_id".to_string(), Value::Object(fragment));
    let mut child_query = Query::new();
    child_query.r#where = Some(where_tree);
    assert_eq!(
        as_value(&child_query),
        json!({"where": {"parent_id": {"inq": [2, 1]}}})
    );

    // connector returned children out of order
    let children = records(json!([
        {"id": 9, "parent_id": 1},
        {"id": 8, "parent_id": 2}
    ]));
    let ordered = sort_objects_by_ids("parent_id", &[json!(2), json!(1)], children, false);
    let parent_ids: Vec<_> = ordered
        .iter()
        .filter_map(|child| child.get("parent_id").cloned())
        .collect();
    assert_eq!(parent_ids, vec![json!(2), json!(1)]);
}

/// Null slots introduced while assembling a query are scrubbed before
/// the connector sees them.
#[test]
fn test_scrub_assembled_query() {
    let mut base = query(json!({"where": {"tenant": "t1"}}));
    let runtime = query(json!({"where": {"deleted_at": null, "active": true}}));
    merge_query(&mut base, Some(&runtime), &MergeOptions::default()).unwrap();

    let scrubbed = remove_undefined(&as_value(&base), UndefinedPolicy::Ignore).unwrap();
    assert_eq!(
        scrubbed,
        json!({"where": {"and": [{"tenant": "t1"}, {"active": true}]}})
    );

    let err = remove_undefined(&as_value(&base), UndefinedPolicy::Throw).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidFilter);
}

/// A callback-style connector API bridged into an async caller.
#[tokio::test]
async fn test_callback_bridge_flow() {
    let (callback, promise) = create_promise_callback::<Vec<Record>>();

    let produced = records(json!([{"id": 1}]));
    std::thread::spawn(move || {
        callback.resolve(produced);
    });

    let received = promise.await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].get("id"), Some(&json!(1)));
}
