//! Principal identity types.
//!
//! Permissions refer to principals by agent key. Individual agents use
//! their name as-is; groups are namespaced under `Group::NAME_PREFIX` so an
//! agent and a group with the same name never collide.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AclError, AclResult};

/// Anything that can be named in a `Permission`.
pub trait AgentKey {
    /// The stable key stored in `Permission::agent`.
    fn agent_key(&self) -> String;
}

/// An individual principal.
///
/// Example: Agent("moomin")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
}

impl Agent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl AgentKey for Agent {
    fn agent_key(&self) -> String {
        self.name.clone()
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A collective principal.
///
/// Two groups are equal iff their names are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
}

impl Group {
    /// Prefix that namespaces group keys.
    pub const NAME_PREFIX: &'static str = "group/";

    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Rebuild a group from its agent key.
    ///
    /// Returns `Validation` when `key` does not carry `NAME_PREFIX`; such a
    /// key names an individual agent, not a group.
    pub fn from_agent_key(key: &str) -> AclResult<Self> {
        key.strip_prefix(Self::NAME_PREFIX)
            .map(Self::new)
            .ok_or_else(|| {
                AclError::validation(format!(
                    "agent key '{key}' is not a group key (missing '{}' prefix)",
                    Self::NAME_PREFIX
                ))
            })
    }

    /// True when `key` is in the group namespace.
    pub fn is_group_key(key: &str) -> bool {
        key.starts_with(Self::NAME_PREFIX)
    }
}

impl AgentKey for Group {
    fn agent_key(&self) -> String {
        format!("{}{}", Self::NAME_PREFIX, self.name)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.agent_key())
    }
}

/// Either kind of principal, recovered from a stored agent key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Principal {
    Agent(Agent),
    Group(Group),
}

impl Principal {
    /// Classify a stored key: prefixed keys are groups, everything else is
    /// an individual agent.
    pub fn from_agent_key(key: &str) -> Self {
        match Group::from_agent_key(key) {
            Ok(group) => Principal::Group(group),
            Err(_) => Principal::Agent(Agent::new(key)),
        }
    }
}

impl AgentKey for Principal {
    fn agent_key(&self) -> String {
        match self {
            Principal::Agent(agent) => agent.agent_key(),
            Principal::Group(group) => group.agent_key(),
        }
    }
}

impl From<Agent> for Principal {
    fn from(agent: Agent) -> Self {
        Principal::Agent(agent)
    }
}

impl From<Group> for Principal {
    fn from(group: Group) -> Self {
        Principal::Group(group)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.agent_key())
    }
}
