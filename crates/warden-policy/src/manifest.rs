//! Loading and applying grant manifests.
//!
//! Application algorithm:
//!
//! 1. Validate every rule; one bad rule rejects the whole manifest before
//!    anything is written.
//! 2. Group rules by resource (sorted by resource id).
//! 3. For each resource, open one `AccessControlList`, apply its grants,
//!    then its revocations, and save once. Resources whose grants already
//!    match are not written.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use warden_contracts::{
    access_control::ResourceId,
    agent::Principal,
    error::{AclError, AclResult},
    permission::Mode,
};
use warden_core::{
    traits::{ChangeJournal, Persister, QueryService},
    AccessControlList,
};

use crate::rule::GrantManifest;

/// Counts reported by `GrantManifest::apply`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Distinct resources named by the manifest.
    pub resources: usize,
    /// Resources whose access control was written.
    pub saved: usize,
    /// Resources that already matched the manifest.
    pub unchanged: usize,
}

/// Validated rules for one resource.
#[derive(Default)]
struct ResourcePlan {
    grants: Vec<(Mode, Principal)>,
    revocations: Vec<(Mode, Principal)>,
}

impl GrantManifest {
    /// Parse `s` as a TOML grant manifest.
    ///
    /// Returns `AclError::ConfigError` if the TOML is malformed, names an
    /// unknown mode, or does not match the manifest schema.
    pub fn from_toml_str(s: &str) -> AclResult<Self> {
        toml::from_str(s).map_err(|e| AclError::ConfigError {
            reason: format!("failed to parse grant manifest: {}", e),
        })
    }

    /// Read the file at `path` and parse it as a grant manifest.
    pub fn from_file(path: &Path) -> AclResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AclError::ConfigError {
            reason: format!("failed to read grant manifest '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check every rule names exactly one principal and a resource.
    pub fn validate(&self) -> AclResult<()> {
        self.plan().map(|_| ())
    }

    /// Apply the manifest, saving each changed access control.
    ///
    /// When `journal` is given, every committed diff is appended to it.
    pub fn apply(
        &self,
        persister: &dyn Persister,
        query_service: &dyn QueryService,
        journal: Option<&dyn ChangeJournal>,
    ) -> AclResult<ApplySummary> {
        let plan = self.plan()?;
        let mut summary = ApplySummary {
            resources: plan.len(),
            ..ApplySummary::default()
        };

        for (resource, rules) in &plan {
            let mut acl = AccessControlList::new(resource, persister, query_service);

            for (mode, principal) in &rules.grants {
                acl.grant(*mode).to(principal)?;
            }
            for (mode, principal) in &rules.revocations {
                acl.revoke(*mode).from(principal)?;
            }

            if !acl.pending_changes()? {
                debug!(resource = %resource, "access control already matches manifest");
                summary.unchanged += 1;
                continue;
            }

            match journal {
                Some(journal) => acl.save_journaled(journal)?,
                None => acl.save()?,
            };
            summary.saved += 1;
        }

        info!(
            resources = summary.resources,
            saved = summary.saved,
            unchanged = summary.unchanged,
            "grant manifest applied"
        );
        Ok(summary)
    }

    fn plan(&self) -> AclResult<BTreeMap<ResourceId, ResourcePlan>> {
        let mut plan: BTreeMap<ResourceId, ResourcePlan> = BTreeMap::new();

        for rule in &self.grants {
            let principal = rule.principal()?;
            plan.entry(rule.resource.clone())
                .or_default()
                .grants
                .push((rule.mode, principal));
        }
        for rule in &self.revocations {
            let principal = rule.principal()?;
            plan.entry(rule.resource.clone())
                .or_default()
                .revocations
                .push((rule.mode, principal));
        }

        Ok(plan)
    }
}
