//! Field selection normalization and projection.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shape-polymorphic `fields` option.
///
/// Accepts a single field name, a list of names, or a name → flag map.
/// A flag map with any `true` entry is an inclusion list of those keys;
/// an all-`false` map excludes its keys from the model's properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    /// A single field name.
    Name(String),
    /// An explicit list of field names.
    List(Vec<String>),
    /// Per-field inclusion/exclusion flags.
    Flags(IndexMap<String, bool>),
}

impl FieldSpec {
    /// Names this specification contributes when concatenated with
    /// another: the listed names, or the truthy flag keys.
    pub fn as_names(&self) -> Vec<String> {
        match self {
            Self::Name(name) => vec![name.clone()],
            Self::List(names) => names.clone(),
            Self::Flags(flags) => flags
                .iter()
                .filter(|&(_, &included)| included)
                .map(|(name, _)| name.clone())
                .collect(),
        }
    }

    /// Concatenate two specifications into a flat inclusion list.
    pub fn concat(base: Option<&FieldSpec>, update: &FieldSpec) -> FieldSpec {
        let mut names = base.map(FieldSpec::as_names).unwrap_or_default();
        names.extend(update.as_names());
        FieldSpec::List(names)
    }
}

/// Normalize a fields option to the list of included property names.
///
/// Returns `None` when there is no selection to apply (absent spec, empty
/// name, empty list, or empty flag map). With `exclude_unknown` the
/// result is filtered to names present in `properties`.
///
/// ```rust
/// use quarry_query::{FieldSpec, fields_to_array};
/// use serde_json::json;
///
/// let props: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
///
/// let spec: FieldSpec = serde_json::from_value(json!({"a": true, "b": false})).unwrap();
/// assert_eq!(fields_to_array(Some(&spec), &props, false), Some(vec!["a".to_string()]));
///
/// let spec: FieldSpec = serde_json::from_value(json!({"b": false})).unwrap();
/// assert_eq!(
///     fields_to_array(Some(&spec), &props, false),
///     Some(vec!["a".to_string(), "c".to_string()])
/// );
/// ```
pub fn fields_to_array(
    fields: Option<&FieldSpec>,
    properties: &[String],
    exclude_unknown: bool,
) -> Option<Vec<String>> {
    let fields = fields?;

    let selected: Vec<String> = match fields {
        FieldSpec::Name(name) => {
            if name.is_empty() {
                return None;
            }
            vec![name.clone()]
        }
        FieldSpec::List(names) => {
            if names.is_empty() {
                return None;
            }
            names.clone()
        }
        FieldSpec::Flags(flags) => {
            if flags.is_empty() {
                return None;
            }
            let included: Vec<String> = flags
                .iter()
                .filter(|&(_, &flag)| flag)
                .map(|(name, _)| name.clone())
                .collect();
            if !included.is_empty() {
                included
            } else {
                // exclusion semantics: every flag is false
                properties
                    .iter()
                    .filter(|property| !flags.contains_key(property.as_str()))
                    .cloned()
                    .collect()
            }
        }
    };

    if exclude_unknown {
        Some(
            selected
                .into_iter()
                .filter(|field| properties.contains(field))
                .collect(),
        )
    } else {
        Some(selected)
    }
}

/// Build a projector keeping exactly the named fields of a record map.
///
/// Missing fields project to explicit nulls rather than being omitted,
/// so every projected record has the same shape.
pub fn select_fields(fields: Vec<String>) -> impl Fn(&Map<String, Value>) -> Map<String, Value> {
    move |record| {
        let mut projected = Map::new();
        for field in &fields {
            projected.insert(
                field.clone(),
                record.get(field).cloned().unwrap_or(Value::Null),
            );
        }
        projected
    }
}
