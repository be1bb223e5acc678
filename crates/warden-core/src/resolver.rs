//! Secure lookup of the access control governing a resource.
//!
//! Resolution is an inverse-reference query on `access_to`. Every record the
//! query service returns is re-checked here: it must carry the
//! `AccessControl` model discriminator and target the requested resource.
//! A record that only looks compatible is treated exactly like no record,
//! and individual permissions targeting another resource are dropped.

use tracing::{debug, warn};

use warden_contracts::{
    access_control::AccessControl,
    error::{AclError, AclResult},
};

use crate::traits::{QueryService, Resource};

/// Resolves a resource to its `AccessControl`.
pub struct FindAccessControl<'a> {
    query_service: &'a dyn QueryService,
}

impl<'a> FindAccessControl<'a> {
    pub fn new(query_service: &'a dyn QueryService) -> Self {
        Self { query_service }
    }

    /// Return the persisted access control for `resource`.
    ///
    /// # Errors
    ///
    /// - `NotFound` when no record, or only lookalike records, reference the
    ///   resource.
    /// - `Serialization` when a genuine `AccessControl` record is corrupt.
    /// - Any error from the query service, unchanged.
    ///
    /// When several access controls target the same resource the first in
    /// query order wins and a warning is logged.
    pub fn find_access_control_for(&self, resource: &dyn Resource) -> AclResult<AccessControl> {
        let target = resource.id();

        let records = self.query_service.find_inverse_references(
            target,
            AccessControl::ACCESS_TO,
            Some(AccessControl::MODEL),
        )?;

        let mut found = Vec::with_capacity(records.len());
        for record in &records {
            let access_control = match AccessControl::from_record(record) {
                Ok(access_control) => access_control,
                Err(AclError::UnexpectedModel { found: model, .. }) => {
                    warn!(
                        record_id = ?record.id,
                        model = %model,
                        resource = %target,
                        "rejected non-AccessControl record referencing resource"
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };

            if &access_control.access_to != target {
                warn!(
                    record_id = ?record.id,
                    resource = %target,
                    access_to = %access_control.access_to,
                    "rejected access control targeting a different resource"
                );
                continue;
            }

            found.push(scrub_foreign_permissions(access_control));
        }

        if found.len() > 1 {
            warn!(
                resource = %target,
                count = found.len(),
                "multiple access controls reference resource; using the first"
            );
        }

        match found.into_iter().next() {
            Some(access_control) => {
                debug!(
                    resource = %target,
                    record_id = ?access_control.id,
                    permissions = access_control.permissions.len(),
                    "resolved access control"
                );
                Ok(access_control)
            }
            None => Err(AclError::not_found(format!(
                "access control for resource '{}'",
                target
            ))),
        }
    }

    /// Like `find_access_control_for`, but a missing access control yields a
    /// fresh, unpersisted one with no grants.
    pub fn find_or_initialize_for(&self, resource: &dyn Resource) -> AclResult<AccessControl> {
        match self.find_access_control_for(resource) {
            Err(e) if e.is_not_found() => {
                debug!(resource = %resource.id(), "no access control yet; starting empty");
                Ok(AccessControl::new(resource.id().clone()))
            }
            other => other,
        }
    }
}

/// Drop stored permissions that target a resource other than the access
/// control's own. They never authorize anything on this resource.
fn scrub_foreign_permissions(mut access_control: AccessControl) -> AccessControl {
    let before = access_control.permissions.len();
    let access_to = access_control.access_to.clone();
    access_control.permissions.retain(|p| p.access_to == access_to);

    let dropped = before - access_control.permissions.len();
    if dropped > 0 {
        warn!(
            record_id = ?access_control.id,
            resource = %access_to,
            dropped,
            "ignored stored permissions targeting another resource"
        );
    }
    access_control
}

// ── Tests ────────────────────────────────────────────────────────────────────
