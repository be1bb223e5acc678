//! Mock collaborators shared by the unit tests in this crate.

use std::sync::Mutex;

use warden_contracts::{
    access_control::{RecordId, ResourceId},
    error::{AclError, AclResult},
    permission::PermissionDiff,
    record::Record,
};

use crate::traits::{ChangeJournal, Persister, QueryService};

#[derive(Default)]
struct MockState {
    records: Vec<Record>,
    saves: usize,
    fail_saves: bool,
    garble_saves: bool,
    fail_queries: bool,
}

/// A persister and query service that records every write.
///
/// `new()` honours both filters of inverse-reference queries.
/// `unfiltered()` ignores the `model` filter, standing in for a query
/// service that returns anything with a matching attribute.
/// `ignoring_target()` ignores the attribute match instead and returns every
/// record of the requested model.
pub(crate) struct MockStore {
    state: Mutex<MockState>,
    filter_models: bool,
    filter_targets: bool,
}

impl MockStore {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            filter_models: true,
            filter_targets: true,
        }
    }

    pub(crate) fn unfiltered() -> Self {
        Self {
            filter_models: false,
            ..Self::new()
        }
    }

    pub(crate) fn ignoring_target() -> Self {
        Self {
            filter_targets: false,
            ..Self::new()
        }
    }

    pub(crate) fn save_count(&self) -> usize {
        self.state.lock().unwrap().saves
    }

    pub(crate) fn record_count(&self) -> usize {
        self.state.lock().unwrap().records.len()
    }

    pub(crate) fn fail_saves(&self, fail: bool) {
        self.state.lock().unwrap().fail_saves = fail;
    }

    /// Store records faithfully but hand back an undecodable copy from
    /// `save`.
    pub(crate) fn garble_saves(&self) {
        self.state.lock().unwrap().garble_saves = true;
    }

    pub(crate) fn fail_queries(&self) {
        self.state.lock().unwrap().fail_queries = true;
    }
}

impl Persister for MockStore {
    fn save(&self, record: &Record) -> AclResult<Record> {
        let mut state = self.state.lock().unwrap();
        if state.fail_saves {
            return Err(AclError::persistence("mock save failure"));
        }
        state.saves += 1;

        let mut stored = record.clone();
        let id = *stored.id.get_or_insert_with(RecordId::new);
        match state.records.iter_mut().find(|r| r.id == Some(id)) {
            Some(existing) => *existing = stored.clone(),
            None => state.records.push(stored.clone()),
        }
        if state.garble_saves {
            stored.model = "Garbled".to_string();
        }
        Ok(stored)
    }
}

impl QueryService for MockStore {
    fn find_by(&self, id: &RecordId) -> AclResult<Record> {
        let state = self.state.lock().unwrap();
        state
            .records
            .iter()
            .find(|r| r.id.as_ref() == Some(id))
            .cloned()
            .ok_or_else(|| AclError::not_found(format!("record {id}")))
    }

    fn find_inverse_references(
        &self,
        target: &ResourceId,
        property: &str,
        model: Option<&str>,
    ) -> AclResult<Vec<Record>> {
        let state = self.state.lock().unwrap();
        if state.fail_queries {
            return Err(AclError::persistence("mock query failure"));
        }
        Ok(state
            .records
            .iter()
            .filter(|r| {
                !self.filter_targets || r.string_attribute(property) == Some(target.as_str())
            })
            .filter(|r| !self.filter_models || model.map_or(true, |m| r.model == m))
            .cloned()
            .collect())
    }
}

/// A journal that keeps every recorded diff.
#[derive(Default)]
pub(crate) struct MockJournal {
    pub(crate) entries: Mutex<Vec<(ResourceId, PermissionDiff)>>,
}

impl ChangeJournal for MockJournal {
    fn record(&self, access_to: &ResourceId, diff: &PermissionDiff) -> AclResult<()> {
        self.entries
            .lock()
            .unwrap()
            .push((access_to.clone(), diff.clone()));
        Ok(())
    }
}
