//! JSON snapshot file format for `InMemoryStore`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use warden_contracts::{
    error::{AclError, AclResult},
    record::Record,
};

/// On-disk layout: every record, in first-save order.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    pub(crate) records: Vec<Record>,
}

impl Snapshot {
    /// Read a snapshot. A missing file is an empty snapshot.
    pub(crate) fn read(path: &Path) -> AclResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AclError::persistence(format!("failed to read store '{}': {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub(crate) fn write(&self, path: &Path) -> AclResult<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|e| {
            AclError::persistence(format!("failed to write store '{}': {}", path.display(), e))
        })
    }
}
