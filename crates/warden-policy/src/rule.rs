//! Grant rule types and the manifest schema.
//!
//! A `GrantManifest` is deserialized from TOML and holds two lists of
//! `GrantRule`s: grants to add and grants to revoke. Each rule names
//! exactly one principal, either an individual `agent` or a `group`.

use serde::{Deserialize, Serialize};

use warden_contracts::{
    access_control::ResourceId,
    agent::{Agent, Group, Principal},
    error::{AclError, AclResult},
    permission::Mode,
};

/// One `(resource, mode, principal)` line of a manifest.
///
/// Example in TOML:
/// ```toml
/// [[grants]]
/// resource = "etaoin"
/// mode = "read"
/// agent = "u1"
///
/// [[grants]]
/// resource = "etaoin"
/// mode = "edit"
/// group = "public"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRule {
    /// Id of the governed resource.
    pub resource: ResourceId,

    /// Mode to grant or revoke. Unknown names fail to parse.
    pub mode: Mode,

    /// Individual agent name. Mutually exclusive with `group`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    /// Group name, without the `group/` prefix. Mutually exclusive with
    /// `agent`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl GrantRule {
    /// The principal this rule names.
    ///
    /// Requires exactly one of `agent` or `group`, and a non-empty
    /// resource id.
    pub fn principal(&self) -> AclResult<Principal> {
        if self.resource.as_str().is_empty() {
            return Err(AclError::validation("grant rule has an empty resource id"));
        }
        match (&self.agent, &self.group) {
            (Some(agent), None) if !agent.is_empty() => Ok(Agent::new(agent.as_str()).into()),
            (None, Some(group)) if !group.is_empty() => Ok(Group::new(group.as_str()).into()),
            (Some(_), Some(_)) => Err(AclError::validation(format!(
                "rule for {} on '{}' sets both agent and group",
                self.mode, self.resource
            ))),
            _ => Err(AclError::validation(format!(
                "rule for {} on '{}' names no agent or group",
                self.mode, self.resource
            ))),
        }
    }
}

/// The top-level structure deserialized from a TOML grant manifest.
///
/// Grants are applied before revocations, so a manifest that both grants
/// and revokes the same permission leaves it revoked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantManifest {
    #[serde(default)]
    pub grants: Vec<GrantRule>,

    #[serde(default)]
    pub revocations: Vec<GrantRule>,
}
