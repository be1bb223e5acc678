//! Change tracking for one `AccessControl`.
//!
//! A `ChangeSet` keeps two sets: the permissions last synced onto the
//! wrapped access control (`original`) and the working copy callers mutate.
//! Dirtiness is the inequality of those two sets, never a flag set by an
//! operation, so redundant adds and removals cannot make a clean set dirty.

use std::collections::HashSet;

use warden_contracts::{
    access_control::AccessControl,
    permission::{Permission, PermissionDiff},
};

/// Working copy of an access control's permissions, diffed against the
/// last synced state.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    resource: AccessControl,
    original: HashSet<Permission>,
    permissions: HashSet<Permission>,
}

impl ChangeSet {
    /// Start tracking changes against the current permissions of `resource`.
    pub fn new(resource: AccessControl) -> Self {
        let original = resource.permissions.clone();
        let permissions = original.clone();
        Self {
            resource,
            original,
            permissions,
        }
    }

    /// The working permission set.
    pub fn permissions(&self) -> &HashSet<Permission> {
        &self.permissions
    }

    /// Replace the working set. Duplicates collapse.
    pub fn set_permissions(&mut self, permissions: impl IntoIterator<Item = Permission>) {
        self.permissions = permissions.into_iter().collect();
    }

    /// Add `permission` to the working set. Returns false if it was
    /// already present.
    pub fn add(&mut self, permission: Permission) -> bool {
        self.permissions.insert(permission)
    }

    /// Remove `permission` from the working set. Returns false if it was
    /// absent.
    pub fn remove(&mut self, permission: &Permission) -> bool {
        self.permissions.remove(permission)
    }

    /// True iff the working set differs from the last synced set.
    pub fn is_changed(&self) -> bool {
        self.permissions != self.original
    }

    /// The grants `sync` would add and remove.
    pub fn diff(&self) -> PermissionDiff {
        PermissionDiff::new(
            self.permissions.difference(&self.original).cloned().collect(),
            self.original.difference(&self.permissions).cloned().collect(),
        )
    }

    /// Write the working set onto the wrapped access control and make it
    /// the new baseline. Returns the access control, ready to persist.
    pub fn sync(&mut self) -> &AccessControl {
        self.resource.permissions = self.permissions.clone();
        self.original = self.permissions.clone();
        &self.resource
    }

    /// The wrapped access control as of the last `sync`.
    pub fn resource(&self) -> &AccessControl {
        &self.resource
    }

    /// Consume the change set, returning the wrapped access control.
    pub fn into_resource(self) -> AccessControl {
        self.resource
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
