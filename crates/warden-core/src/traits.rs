//! Collaborator trait definitions for WARDEN.
//!
//! These traits are the boundary between the ACL core and everything it
//! does not own:
//!
//! - `Persister`: durable record writes
//! - `QueryService`: record lookups, including inverse references
//! - `Resource`: anything with a stable id that can be access-controlled
//! - `ChangeJournal`: an append-only sink for committed permission diffs
//!
//! The facade never reaches for a default implementation; callers always
//! pass collaborators in.

use warden_contracts::{
    access_control::{RecordId, ResourceId},
    error::AclResult,
    permission::PermissionDiff,
    record::Record,
};

/// Durable storage for records.
pub trait Persister: Send + Sync {
    /// Store `record` and return the stored copy.
    ///
    /// The returned record always has an `id`: implementations assign one
    /// when `record.id` is `None` and overwrite the existing record
    /// otherwise. After this returns, the record is visible to
    /// `QueryService::find_by` and `find_inverse_references`.
    fn save(&self, record: &Record) -> AclResult<Record>;
}

/// Read access to stored records.
pub trait QueryService: Send + Sync {
    /// Fetch one record by id. Unknown ids are `AclError::NotFound`.
    fn find_by(&self, id: &RecordId) -> AclResult<Record>;

    /// Return every record whose top-level `property` attribute equals
    /// `target`, optionally restricted to records of `model`.
    ///
    /// Implementations should answer from an index rather than a scan.
    /// Results are in the order the records were first saved.
    fn find_inverse_references(
        &self,
        target: &ResourceId,
        property: &str,
        model: Option<&str>,
    ) -> AclResult<Vec<Record>>;
}

/// Something that can be governed by an access control.
pub trait Resource {
    /// The stable identifier permissions refer to.
    fn id(&self) -> &ResourceId;
}

impl Resource for ResourceId {
    fn id(&self) -> &ResourceId {
        self
    }
}

/// An append-only log of committed ACL changes.
pub trait ChangeJournal: Send + Sync {
    /// Append one committed diff for the resource `access_to`.
    fn record(&self, access_to: &ResourceId, diff: &PermissionDiff) -> AclResult<()>;
}
