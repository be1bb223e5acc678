//! The access-control-list facade.
//!
//! `AccessControlList` is the public API for one resource's grants. It
//! resolves the resource's `AccessControl` lazily, routes every mutation
//! through a `ChangeSet`, and writes only when that change set is dirty:
//!
//!   resolve → mutate (grant / revoke / add / delete) → save → discard
//!
//! ```rust,ignore
//! let mut acl = AccessControlList::new(&resource, &store, &store);
//! acl.grant(Mode::Read).to(&Agent::new("u1"))?
//!    .grant(Mode::Edit).to(&Group::new("public"))?;
//! acl.save()?;
//! ```

use std::collections::HashSet;

use tracing::{debug, info, warn};

use warden_contracts::{
    access_control::{AccessControl, ResourceId},
    agent::AgentKey,
    error::AclResult,
    permission::{Mode, Permission, PermissionDiff},
};

use crate::change_set::ChangeSet;
use crate::resolver::FindAccessControl;
use crate::traits::{ChangeJournal, Persister, QueryService, Resource};

/// Grants for one resource, with change tracking and save-if-dirty.
///
/// Create one per authorization-management interaction and drop it after
/// use. Two lists saving the same resource concurrently overwrite each
/// other; callers needing more must serialize access per resource.
pub struct AccessControlList<'a> {
    resource_id: ResourceId,
    persister: &'a dyn Persister,
    query_service: &'a dyn QueryService,
    change_set: Option<ChangeSet>,
}

impl<'a> AccessControlList<'a> {
    /// Bind a list to `resource`. Nothing is read until first use.
    pub fn new(
        resource: &dyn Resource,
        persister: &'a dyn Persister,
        query_service: &'a dyn QueryService,
    ) -> Self {
        Self {
            resource_id: resource.id().clone(),
            persister,
            query_service,
            change_set: None,
        }
    }

    /// Bind a list to an access control the caller already holds.
    ///
    /// The first session tracks changes against `access_control`; after a
    /// save the list re-resolves through the query service like any other.
    pub fn with_access_control(
        access_control: AccessControl,
        persister: &'a dyn Persister,
        query_service: &'a dyn QueryService,
    ) -> Self {
        Self {
            resource_id: access_control.access_to.clone(),
            persister,
            query_service,
            change_set: Some(ChangeSet::new(access_control)),
        }
    }

    /// The id of the governed resource.
    pub fn resource_id(&self) -> &ResourceId {
        &self.resource_id
    }

    /// Add `permission`, pinning its `access_to` to the bound resource.
    ///
    /// Whatever target the caller supplied is overwritten, so a list can
    /// never hold grants for another resource. Does not persist.
    pub fn add(&mut self, permission: Permission) -> AclResult<bool> {
        let permission = permission.pinned_to(&self.resource_id);
        debug!(resource = %self.resource_id, permission = %permission, "adding permission");
        self.change_set()?.add(permission);
        Ok(true)
    }

    /// Remove `permission` if present. Removing an absent grant is a no-op.
    pub fn delete(&mut self, permission: &Permission) -> AclResult<bool> {
        debug!(resource = %self.resource_id, permission = %permission, "deleting permission");
        self.change_set()?.remove(permission);
        Ok(true)
    }

    /// Start a grant: `acl.grant(Mode::Read).to(&agent)`.
    pub fn grant(&mut self, mode: Mode) -> ModeGrant<'_, 'a> {
        ModeGrant { acl: self, mode }
    }

    /// Start a revocation: `acl.revoke(Mode::Read).from(&agent)`.
    pub fn revoke(&mut self, mode: Mode) -> ModeRevoke<'_, 'a> {
        ModeRevoke { acl: self, mode }
    }

    /// True iff some current permission grants `mode` to `agent`.
    pub fn has_grant(&mut self, mode: Mode, agent: &(impl AgentKey + ?Sized)) -> AclResult<bool> {
        let key = agent.agent_key();
        Ok(self
            .change_set()?
            .permissions()
            .iter()
            .any(|p| p.mode == mode && p.agent == key))
    }

    pub fn has_discover(&mut self, agent: &(impl AgentKey + ?Sized)) -> AclResult<bool> {
        self.has_grant(Mode::Discover, agent)
    }

    pub fn has_read(&mut self, agent: &(impl AgentKey + ?Sized)) -> AclResult<bool> {
        self.has_grant(Mode::Read, agent)
    }

    pub fn has_edit(&mut self, agent: &(impl AgentKey + ?Sized)) -> AclResult<bool> {
        self.has_grant(Mode::Edit, agent)
    }

    /// A snapshot of the current permissions. Mutating it has no effect on
    /// the list.
    pub fn permissions(&mut self) -> AclResult<HashSet<Permission>> {
        Ok(self.change_set()?.permissions().clone())
    }

    /// True when there are unsaved changes.
    pub fn pending_changes(&mut self) -> AclResult<bool> {
        Ok(self.change_set()?.is_changed())
    }

    /// The grants the next `save` would add and remove.
    pub fn pending_diff(&mut self) -> AclResult<PermissionDiff> {
        Ok(self.change_set()?.diff())
    }

    /// Persist pending changes. See `save_with`.
    pub fn save(&mut self) -> AclResult<bool> {
        self.save_with(|_| {})
    }

    /// Persist pending changes, then call `on_success` with this list.
    ///
    /// With nothing pending this returns `Ok(true)` without touching the
    /// persister or calling `on_success`. Otherwise the change set is synced
    /// onto its access control, the access control is saved, `on_success`
    /// runs, and the change set is discarded so later reads re-resolve
    /// from storage.
    ///
    /// # Errors
    ///
    /// Persister errors are returned unchanged. The pending changes survive
    /// a failed save.
    pub fn save_with<F>(&mut self, on_success: F) -> AclResult<bool>
    where
        F: FnOnce(&mut Self),
    {
        if !self.pending_changes()? {
            debug!(resource = %self.resource_id, "no pending changes; skipping save");
            return Ok(true);
        }

        let mut change_set = self.change_set()?.clone();
        let diff = change_set.diff();
        let record = change_set.sync().to_record()?;

        let saved = match self.persister.save(&record) {
            Ok(saved) => saved,
            Err(e) => {
                warn!(resource = %self.resource_id, error = %e, "failed to save access control");
                return Err(e);
            }
        };

        info!(
            resource = %self.resource_id,
            record_id = ?saved.id,
            added = diff.added.len(),
            removed = diff.removed.len(),
            "access control saved"
        );

        let mut committed = change_set.into_resource();
        committed.id = saved.id;
        self.change_set = Some(ChangeSet::new(committed));
        on_success(self);
        self.change_set = None;

        Ok(true)
    }

    /// Persist pending changes and append the committed diff to `journal`.
    ///
    /// Nothing is journaled when there was nothing to save.
    pub fn save_journaled(&mut self, journal: &dyn ChangeJournal) -> AclResult<bool> {
        let diff = self.pending_diff()?;
        let mut journal_result = Ok(());
        let saved = self.save_with(|acl| {
            journal_result = journal.record(&acl.resource_id, &diff);
        })?;
        journal_result?;
        Ok(saved)
    }

    /// The current change set, resolving the access control on first use.
    fn change_set(&mut self) -> AclResult<&mut ChangeSet> {
        let change_set = match self.change_set.take() {
            Some(change_set) => change_set,
            None => ChangeSet::new(
                FindAccessControl::new(self.query_service)
                    .find_or_initialize_for(&self.resource_id)?,
            ),
        };
        Ok(self.change_set.insert(change_set))
    }
}

/// Short-lived builder for `acl.grant(mode).to(agent)`.
pub struct ModeGrant<'acl, 'a> {
    acl: &'acl mut AccessControlList<'a>,
    mode: Mode,
}

impl<'acl, 'a> ModeGrant<'acl, 'a> {
    /// Grant the mode to `agent` and return the list for chaining.
    pub fn to(self, agent: &(impl AgentKey + ?Sized)) -> AclResult<&'acl mut AccessControlList<'a>> {
        let permission = Permission::new(self.mode, agent.agent_key(), self.acl.resource_id.clone());
        self.acl.add(permission)?;
        Ok(self.acl)
    }
}

/// Short-lived builder for `acl.revoke(mode).from(agent)`.
pub struct ModeRevoke<'acl, 'a> {
    acl: &'acl mut AccessControlList<'a>,
    mode: Mode,
}

impl<'acl, 'a> ModeRevoke<'acl, 'a> {
    /// Remove the first permission granting the mode to `agent`, if any,
    /// and return the list for chaining.
    ///
    /// Matches on mode and agent key only; "first" is the lowest in
    /// `Permission` order.
    pub fn from(self, agent: &(impl AgentKey + ?Sized)) -> AclResult<&'acl mut AccessControlList<'a>> {
        let key = agent.agent_key();
        let mode = self.mode;

        let target = self
            .acl
            .change_set()?
            .permissions()
            .iter()
            .filter(|p| p.mode == mode && p.agent == key)
            .min()
            .cloned();

        match target {
            Some(permission) => {
                self.acl.delete(&permission)?;
            }
            None => {
                debug!(resource = %self.acl.resource_id, mode = %mode, agent = %key, "nothing to revoke");
            }
        }
        Ok(self.acl)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
