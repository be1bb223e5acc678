//! Permission modes and grants.
//!
//! A `Permission` has no identity beyond its three fields. The change-set
//! diff relies on this: two grants with equal fields are the same grant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::access_control::ResourceId;
use crate::error::AclError;

/// A named permission level.
///
/// Modes are flat; `Edit` does not imply `Read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Mode {
    Discover,
    Read,
    Edit,
}

impl Mode {
    /// Every recognized mode, in ascending order.
    pub const ALL: [Mode; 3] = [Mode::Discover, Mode::Read, Mode::Edit];

    /// The lowercase name used in records, manifests and the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Discover => "discover",
            Mode::Read => "read",
            Mode::Edit => "edit",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| AclError::validation(format!("unrecognized permission mode '{s}'")))
    }
}

/// One grant of `mode` to `agent` on the resource `access_to`.
///
/// `agent` is an agent key as produced by `AgentKey::agent_key()`, so user
/// and group grants share one namespace without colliding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Permission {
    pub mode: Mode,
    pub agent: String,
    pub access_to: ResourceId,
}

impl Permission {
    pub fn new(mode: Mode, agent: impl Into<String>, access_to: impl Into<ResourceId>) -> Self {
        Self {
            mode,
            agent: agent.into(),
            access_to: access_to.into(),
        }
    }

    /// Return a copy of this permission targeting `access_to` instead.
    pub fn pinned_to(self, access_to: &ResourceId) -> Self {
        Self {
            access_to: access_to.clone(),
            ..self
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} on {}", self.mode, self.agent, self.access_to)
    }
}

/// The minimal update that turns one permission set into another.
///
/// Both lists are sorted so diffs print and hash deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDiff {
    /// Grants present in the new set but not the old one.
    pub added: Vec<Permission>,
    /// Grants present in the old set but not the new one.
    pub removed: Vec<Permission>,
}

impl PermissionDiff {
    /// Build a diff from unsorted additions and removals.
    pub fn new(mut added: Vec<Permission>, mut removed: Vec<Permission>) -> Self {
        added.sort();
        removed.sort();
        Self { added, removed }
    }

    /// True when applying the diff would change nothing.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
