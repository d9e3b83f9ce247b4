//! Model instance data with explicit bookkeeping metadata.
//!
//! A [`Record`] owns a plain field map plus two metadata slots the field
//! map never sees: a write-once `rank` used to keep included results in
//! their inclusion order, and a `cached_relations` table holding related
//! data resolved for this instance. Metadata is excluded from
//! serialization and equality; only business fields participate.

use indexmap::IndexMap;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A model instance: a field map plus bookkeeping metadata.
#[derive(Debug, Clone, Default)]
pub struct Record {
    data: Map<String, Value>,
    rank: Option<u64>,
    cached_relations: Option<IndexMap<String, Value>>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Set a field value.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.data.insert(field.into(), value);
    }

    /// Remove a field, returning its previous value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.data.shift_remove(field)
    }

    /// Borrow the field map.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Mutably borrow the field map.
    pub fn data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.data
    }

    /// Consume the record, returning the field map.
    pub fn into_data(self) -> Map<String, Value> {
        self.data
    }

    /// The sort priority assigned by [`rank_array_elements`], if any.
    pub fn rank(&self) -> Option<u64> {
        self.rank
    }

    /// Assign the sort priority. Write-once: returns `false` without
    /// touching an already-ranked record.
    pub fn set_rank(&mut self, rank: u64) -> bool {
        if self.rank.is_some() {
            return false;
        }
        self.rank = Some(rank);
        true
    }

    /// Whether the relation cache slot has been created.
    pub fn has_cached_relations(&self) -> bool {
        self.cached_relations.is_some()
    }

    /// Ensure the relation cache slot exists and borrow it mutably.
    pub fn ensure_cached_relations(&mut self) -> &mut IndexMap<String, Value> {
        self.cached_relations.get_or_insert_with(IndexMap::new)
    }

    /// Store resolved related data under a relation name.
    pub fn cache_relation(&mut self, relation: impl Into<String>, related: Value) {
        self.ensure_cached_relations().insert(relation.into(), related);
    }

    /// Look up cached related data by relation name.
    pub fn cached_relation(&self, relation: &str) -> Option<&Value> {
        self.cached_relations.as_ref()?.get(relation)
    }
}

/// Equality covers business fields only; metadata is bookkeeping.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl From<Map<String, Value>> for Record {
    fn from(data: Map<String, Value>) -> Self {
        Self {
            data,
            rank: None,
            cached_relations: None,
        }
    }
}

impl TryFrom<Value> for Record {
    type Error = Value;

    /// Accepts a mapping value; anything else is handed back unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(data) => Ok(Self::from(data)),
            other => Err(other),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::from)
    }
}

/// Assign `rank` to every record that does not already carry one.
///
/// Ranks are write-once, so repeated passes over overlapping result sets
/// keep the earliest assignment.
pub fn rank_array_elements(records: &mut [Record], rank: u64) {
    for record in records.iter_mut() {
        record.set_rank(rank);
    }
}
