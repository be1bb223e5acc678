//! The generic record shape exchanged with persistence collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access_control::RecordId;

/// A stored record: a model discriminator plus a flat attribute object.
///
/// Persisters store records without interpreting `model`; readers decide
/// whether a record is the type they expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Assigned by the persister on first save.
    pub id: Option<RecordId>,
    /// Type discriminator (e.g. "AccessControl").
    pub model: String,
    /// Top-level attributes. String-valued entries are what inverse
    /// reference queries match against.
    pub attributes: serde_json::Map<String, serde_json::Value>,
    /// Wall-clock time of the last save (UTC), stamped by the persister.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record {
    /// An unpersisted record of the given model with no attributes.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            id: None,
            model: model.into(),
            attributes: serde_json::Map::new(),
            updated_at: None,
        }
    }

    /// Builder-style helper to set one attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Return the attribute as a string, if present and string-valued.
    pub fn string_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(|v| v.as_str())
    }

    /// True once a persister has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
