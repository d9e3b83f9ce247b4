//! # quarry-query
//!
//! Query normalization and datasource utilities for the Quarry ORM.
//!
//! This crate holds the stateless plumbing the query execution and
//! relation resolution layers lean on:
//! - Merging query filter objects (`where` conjunction, include-list
//!   union, field selection, pagination policies)
//! - Deep merge and clone of plain data values
//! - Connection URL parsing into flat connector settings
//! - Identifier comparison, dedup, and ordering helpers
//! - Regex coercion for string-encoded patterns
//! - A callback/future bridge for callback-style connector APIs
//!
//! ## Merging queries
//!
//! Fold a runtime query into a default scope; `where` constraints
//! accumulate as a conjunction rather than overwriting each other:
//!
//! ```rust
//! use quarry_query::{MergeOptions, Query, merge_query};
//! use serde_json::json;
//!
//! let mut base: Query = serde_json::from_value(json!({"where": {"tenant": "t1"}})).unwrap();
//! let update: Query = serde_json::from_value(json!({"where": {"active": true}, "limit": 10}))
//!     .unwrap();
//! merge_query(&mut base, Some(&update), &MergeOptions::default()).unwrap();
//! assert_eq!(
//!     serde_json::to_value(&base).unwrap(),
//!     json!({"where": {"and": [{"tenant": "t1"}, {"active": true}]}, "limit": 10})
//! );
//! ```
//!
//! ## Deep merge
//!
//! ```rust
//! use quarry_query::deep_merge;
//! use serde_json::json;
//!
//! let merged = deep_merge(
//!     Some(&json!({"pool": {"min": 1}, "hosts": ["a"]})),
//!     Some(&json!({"pool": {"max": 8}, "hosts": ["b", "a"]})),
//! );
//! assert_eq!(merged, json!({"pool": {"min": 1, "max": 8}, "hosts": ["a", "b"]}));
//!
//! // A single argument deep-clones.
//! let clone = deep_merge(Some(&json!({"a": [1]})), None);
//! assert_eq!(clone, json!({"a": [1]}));
//! ```
//!
//! ## Field selection
//!
//! ```rust
//! use quarry_query::{FieldSpec, fields_to_array, select_fields};
//! use serde_json::json;
//!
//! let props: Vec<String> = vec!["id".into(), "name".into(), "secret".into()];
//! let spec: FieldSpec = serde_json::from_value(json!({"secret": false})).unwrap();
//! let fields = fields_to_array(Some(&spec), &props, false).unwrap();
//! assert_eq!(fields, vec!["id".to_string(), "name".to_string()]);
//!
//! let project = select_fields(fields);
//! let record = json!({"id": 1, "name": "a", "secret": "s"});
//! let projected = project(record.as_object().unwrap());
//! assert_eq!(serde_json::to_value(projected).unwrap(), json!({"id": 1, "name": "a"}));
//! ```
//!
//! ## Connection settings
//!
//! ```rust
//! use quarry_query::parse_settings;
//!
//! let settings = parse_settings("mysql://u:p@host:3306/db?ssl=true");
//! assert_eq!(settings.connector.as_deref(), Some("mysql"));
//! assert_eq!(settings.database.as_deref(), Some("db"));
//! assert_eq!(settings.port, Some(3306));
//! assert_eq!(settings.param("ssl"), Some("true"));
//! ```
//!
//! ## Identifiers
//!
//! ```rust
//! use quarry_query::{id_equals, ids_have_duplicates, uniq};
//! use serde_json::json;
//!
//! assert!(id_equals(&json!(1), &json!("1")));
//! assert!(!ids_have_duplicates(&[json!(1), json!("1")]));
//! assert_eq!(uniq(&[json!(1), json!(1), json!(2)]), vec![json!(1), json!(2)]);
//! ```
//!
//! ## Error handling
//!
//! Malformed input is reported as an error value with a programmatic
//! code:
//!
//! ```rust
//! use quarry_query::{ErrorCode, to_regex};
//! use serde_json::json;
//!
//! let err = to_regex(&json!("/abc/z")).unwrap_err();
//! assert_eq!(err.code, ErrorCode::InvalidParameter);
//! ```

pub mod callback;
pub mod connection;
pub mod error;
pub mod ids;
pub mod logging;
pub mod merge;
pub mod model;
pub mod query;
pub mod record;
pub mod regexp;
pub mod relations;
pub mod sanitize;

pub use callback::{Promise, PromiseCallback, create_promise_callback};
pub use error::{ErrorCode, QueryError, QueryResult};
pub use ids::{
    collect_target_ids, find_index_of, id_equals, ids_have_duplicates, sort_objects_by_ids, uniq,
};
pub use merge::{deep_merge, deep_merge_property, is_plain_object};
pub use model::{ModelDescriptor, PropertyKind, id_name};
pub use query::{
    MergeOptions, Order, Query, Where, merge_query, merge_where, set_scope_values_from_where,
};
pub use record::{Record, rank_array_elements};
pub use regexp::{has_regex_flags, to_regex};
pub use sanitize::{UndefinedPolicy, remove_undefined};

// Re-export relation specifications
pub use relations::{FieldSpec, Include, fields_to_array, merge_includes, select_fields};

// Re-export connection types
pub use connection::{
    ConnectionError, ConnectionResult, Connector, ConnectorRegistry, Settings, parse_settings,
};

// Re-export logging utilities
pub use logging::{get_log_format, get_log_level, init as init_logging, is_debug_enabled};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::callback::{Promise, PromiseCallback, create_promise_callback};
    pub use crate::connection::{ConnectorRegistry, Settings, parse_settings};
    pub use crate::error::{ErrorCode, QueryError, QueryResult};
    pub use crate::ids::{id_equals, ids_have_duplicates, sort_objects_by_ids, uniq};
    pub use crate::merge::{deep_merge, deep_merge_property};
    pub use crate::model::ModelDescriptor;
    pub use crate::query::{MergeOptions, Query, Where, merge_query};
    pub use crate::record::Record;
    pub use crate::relations::{FieldSpec, Include, fields_to_array, merge_includes};
    pub use crate::sanitize::{UndefinedPolicy, remove_undefined};
}
