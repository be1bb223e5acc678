//! In-memory implementation of `Persister` and `QueryService`.
//!
//! `InMemoryStore` is the reference persistence collaborator. Records live
//! in a `Vec` in first-save order, behind a `Mutex`, so the store can be
//! shared by every `AccessControlList` in a process. Inverse-reference
//! queries are answered from an index over top-level string attributes.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info};

use warden_contracts::{
    access_control::{RecordId, ResourceId},
    error::{AclError, AclResult},
    record::Record,
};
use warden_core::traits::{Persister, QueryService};

use crate::snapshot::Snapshot;

// ── Internal mutable state ────────────────────────────────────────────────────

/// The mutable interior of an `InMemoryStore`.
#[derive(Default)]
pub(crate) struct StoreState {
    /// All records, in the order they were first saved.
    pub(crate) records: Vec<Record>,

    /// Position of each record in `records`.
    positions: HashMap<RecordId, usize>,

    /// (attribute name, attribute value) → positions of records carrying it.
    index: HashMap<(String, String), BTreeSet<usize>>,
}

impl StoreState {
    fn from_records(records: Vec<Record>) -> AclResult<Self> {
        let mut state = Self::default();
        for record in records {
            let id = record.id.ok_or_else(|| AclError::Serialization {
                reason: format!("stored '{}' record has no id", record.model),
            })?;
            state.insert(id, record);
        }
        Ok(state)
    }

    fn insert(&mut self, id: RecordId, record: Record) {
        match self.positions.get(&id).copied() {
            Some(position) => {
                let previous = std::mem::replace(&mut self.records[position], record);
                self.unindex(position, &previous);
                self.index_record(position);
            }
            None => {
                let position = self.records.len();
                self.records.push(record);
                self.positions.insert(id, position);
                self.index_record(position);
            }
        }
    }

    fn index_record(&mut self, position: usize) {
        for key in index_keys(&self.records[position]) {
            self.index.entry(key).or_default().insert(position);
        }
    }

    fn unindex(&mut self, position: usize, record: &Record) {
        for key in index_keys(record) {
            if let Some(positions) = self.index.get_mut(&key) {
                positions.remove(&position);
                if positions.is_empty() {
                    self.index.remove(&key);
                }
            }
        }
    }
}

fn index_keys(record: &Record) -> Vec<(String, String)> {
    record
        .attributes
        .iter()
        .filter_map(|(name, value)| value.as_str().map(|v| (name.clone(), v.to_string())))
        .collect()
}

// ── Public store ──────────────────────────────────────────────────────────────

/// An in-memory record store with an inverse-reference index.
///
/// # Thread safety
///
/// Every operation acquires the internal `Mutex`. Clones share the same
/// state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    pub(crate) state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from the JSON snapshot at `path`.
    ///
    /// A missing file yields an empty store.
    pub fn open(path: &Path) -> AclResult<Self> {
        let snapshot = Snapshot::read(path)?;
        let count = snapshot.records.len();
        let state = StoreState::from_records(snapshot.records)?;

        debug!(path = %path.display(), records = count, "record store loaded");
        Ok(Self {
            state: Arc::new(Mutex::new(state)),
        })
    }

    /// Write every record to a JSON snapshot at `path`.
    pub fn flush(&self, path: &Path) -> AclResult<()> {
        let state = self.lock()?;
        Snapshot {
            records: state.records.clone(),
        }
        .write(path)?;

        info!(path = %path.display(), records = state.records.len(), "record store flushed");
        Ok(())
    }

    /// Number of stored records. Fails only if the state lock is poisoned.
    pub fn len(&self) -> AclResult<usize> {
        Ok(self.lock()?.records.len())
    }

    pub fn is_empty(&self) -> AclResult<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> AclResult<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|e| AclError::persistence(format!("record store lock poisoned: {}", e)))
    }
}

// ── Persister / QueryService impls ────────────────────────────────────────────

impl Persister for InMemoryStore {
    /// Insert or replace `record`, assigning an id and `updated_at`.
    fn save(&self, record: &Record) -> AclResult<Record> {
        let mut state = self.lock()?;

        let mut stored = record.clone();
        let id = *stored.id.get_or_insert_with(RecordId::new);
        stored.updated_at = Some(Utc::now());

        debug!(record_id = %id, model = %stored.model, "saving record");
        state.insert(id, stored.clone());

        Ok(stored)
    }
}

impl QueryService for InMemoryStore {
    fn find_by(&self, id: &RecordId) -> AclResult<Record> {
        let state = self.lock()?;
        state
            .positions
            .get(id)
            .map(|&position| state.records[position].clone())
            .ok_or_else(|| AclError::not_found(format!("record {}", id)))
    }

    fn find_inverse_references(
        &self,
        target: &ResourceId,
        property: &str,
        model: Option<&str>,
    ) -> AclResult<Vec<Record>> {
        let state = self.lock()?;
        let key = (property.to_string(), target.as_str().to_string());

        let Some(positions) = state.index.get(&key) else {
            return Ok(Vec::new());
        };

        Ok(positions
            .iter()
            .map(|&position| &state.records[position])
            .filter(|record| model.map_or(true, |m| record.model == m))
            .cloned()
            .collect())
    }
}
