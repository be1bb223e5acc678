//! Journal entry type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_contracts::{access_control::ResourceId, permission::PermissionDiff};

/// One committed permission change, linked into the hash chain.
///
/// Modifying any field invalidates `this_hash` and every later
/// `prev_hash`, which `verify_chain` detects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    /// The resource whose access control changed.
    pub access_to: ResourceId,

    /// The grants added and removed by the save.
    pub diff: PermissionDiff,

    /// Wall-clock time (UTC) the entry was appended.
    pub recorded_at: DateTime<Utc>,

    /// `this_hash` of the previous entry, or `GENESIS_HASH`.
    pub prev_hash: String,

    /// SHA-256 (hex) over this entry's content and `prev_hash`.
    pub this_hash: String,
}

impl JournalEntry {
    /// The `prev_hash` of the first entry in every chain.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}
