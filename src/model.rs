//! Minimal model metadata consumed by the query utilities.
//!
//! The full model machinery lives in the ORM layer; these utilities only
//! need to know which properties a model declares, which of them is the
//! id, and whether a property holds a database-native structured id.

use indexmap::IndexMap;

/// How a declared property stores its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyKind {
    /// Ordinary scalar property.
    #[default]
    Scalar,
    /// Database-native structured id (document-store object ids and the
    /// like); structured values are copied verbatim by scope extraction.
    OpaqueId,
}

/// The slice of a model definition these utilities operate against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelDescriptor {
    name: String,
    id_name: Option<String>,
    properties: IndexMap<String, PropertyKind>,
}

impl ModelDescriptor {
    /// Create a descriptor for the named model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id_name: None,
            properties: IndexMap::new(),
        }
    }

    /// Declare the id property, registering it as a scalar property.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.properties
            .entry(id.clone())
            .or_insert(PropertyKind::Scalar);
        self.id_name = Some(id);
        self
    }

    /// Declare a scalar property.
    pub fn scalar(mut self, property: impl Into<String>) -> Self {
        self.properties
            .insert(property.into(), PropertyKind::Scalar);
        self
    }

    /// Declare a structured-id property.
    pub fn opaque_id(mut self, property: impl Into<String>) -> Self {
        self.properties
            .insert(property.into(), PropertyKind::OpaqueId);
        self
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the model declares the property.
    pub fn has_property(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    /// Kind of a declared property.
    pub fn property_kind(&self, property: &str) -> Option<PropertyKind> {
        self.properties.get(property).copied()
    }

    /// Declared property names, in declaration order.
    pub fn property_names(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    /// The id property name, defaulting to `id`.
    pub fn id_name(&self) -> &str {
        self.id_name.as_deref().unwrap_or("id")
    }
}

/// The id property name of a model, defaulting to `id`.
pub fn id_name(model: &ModelDescriptor) -> &str {
    model.id_name()
}
