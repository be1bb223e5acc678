//! The `AccessControl` aggregate and the identifiers it is keyed by.
//!
//! An `AccessControl` holds every permission for exactly one resource. It is
//! stored as an ordinary `Record` whose model discriminator is checked on
//! every read, so a record that merely exposes an `access_to` attribute can
//! never stand in for one.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AclError, AclResult};
use crate::permission::Permission;
use crate::record::Record;

/// Opaque identifier of an access-controlled resource.
///
/// Example: ResourceId("etaoin")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&ResourceId> for ResourceId {
    fn from(id: &ResourceId) -> Self {
        id.clone()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity a persister assigns to a record on its first save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub uuid::Uuid);

impl RecordId {
    /// Create a new, unique record ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .map(Self)
            .map_err(|e| AclError::validation(format!("invalid record id '{s}': {e}")))
    }
}

/// The permission set governing one resource.
///
/// `access_to` names the governed resource. Every permission in the set
/// should carry the same `access_to`; the facade pins it on insertion, and
/// readers that care re-check it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControl {
    /// Assigned by the persister. `None` until the first save.
    pub id: Option<RecordId>,
    pub access_to: ResourceId,
    pub permissions: HashSet<Permission>,
}

/// Stored attribute layout of an `AccessControl` record.
#[derive(Serialize, Deserialize)]
struct Attributes {
    access_to: ResourceId,
    #[serde(default)]
    permissions: Vec<Permission>,
}

impl AccessControl {
    /// The model discriminator written to, and required on, stored records.
    pub const MODEL: &'static str = "AccessControl";

    /// The record attribute naming the governed resource.
    pub const ACCESS_TO: &'static str = "access_to";

    /// A fresh, unpersisted access control with no grants.
    pub fn new(access_to: impl Into<ResourceId>) -> Self {
        Self {
            id: None,
            access_to: access_to.into(),
            permissions: HashSet::new(),
        }
    }

    /// Builder-style helper to seed the permission set.
    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions = permissions.into_iter().collect();
        self
    }

    /// True once a persister has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Convert into the stored record shape.
    pub fn to_record(&self) -> AclResult<Record> {
        let mut permissions: Vec<Permission> = self.permissions.iter().cloned().collect();
        permissions.sort();

        let value = serde_json::to_value(Attributes {
            access_to: self.access_to.clone(),
            permissions,
        })?;
        let serde_json::Value::Object(attributes) = value else {
            return Err(AclError::Serialization {
                reason: "access control attributes did not serialize to an object".to_string(),
            });
        };

        Ok(Record {
            id: self.id,
            model: Self::MODEL.to_string(),
            attributes,
            updated_at: None,
        })
    }

    /// Rebuild an access control from a stored record.
    ///
    /// Returns `UnexpectedModel` for any record whose discriminator is not
    /// `AccessControl`, regardless of what attributes it carries.
    pub fn from_record(record: &Record) -> AclResult<Self> {
        if record.model != Self::MODEL {
            return Err(AclError::UnexpectedModel {
                expected: Self::MODEL.to_string(),
                found: record.model.clone(),
            });
        }

        let attributes: Attributes =
            serde_json::from_value(serde_json::Value::Object(record.attributes.clone()))?;

        Ok(Self {
            id: record.id,
            access_to: attributes.access_to,
            permissions: attributes.permissions.into_iter().collect(),
        })
    }
}
