//! # warden-core
//!
//! Change tracking, secure ACL resolution, and the grant/revoke facade for
//! WARDEN.
//!
//! This crate provides:
//! - The collaborator traits (`Persister`, `QueryService`, `Resource`,
//!   `ChangeJournal`)
//! - `ChangeSet`, which diffs a working permission set against its last
//!   synced state
//! - `FindAccessControl`, which resolves a resource to its access control
//!   and rejects lookalike records
//! - `AccessControlList`, the grant/revoke facade that saves only when
//!   something changed
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warden_core::{AccessControlList, traits::{Persister, QueryService}};
//! ```

pub mod acl;
pub mod change_set;
pub mod resolver;
pub mod traits;

#[cfg(test)]
mod testing;

pub use acl::{AccessControlList, ModeGrant, ModeRevoke};
pub use change_set::ChangeSet;
pub use resolver::FindAccessControl;
