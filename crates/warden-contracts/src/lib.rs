//! # warden-contracts
//!
//! Shared types, identity keys, and errors for the WARDEN access-control
//! subsystem.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and the errors they raise.

pub mod access_control;
pub mod agent;
pub mod error;
pub mod permission;
pub mod record;

pub use access_control::{AccessControl, RecordId, ResourceId};
pub use agent::{Agent, AgentKey, Group, Principal};
pub use error::{AclError, AclResult};
pub use permission::{Mode, Permission, PermissionDiff};
pub use record::Record;
