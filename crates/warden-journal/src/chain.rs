//! Hash-chain primitives: hashing and chain integrity verification.
//!
//! Hash input layout (bytes, in order):
//!   1. sequence as 8-byte little-endian
//!   2. access_to byte length as 8-byte little-endian, then its UTF-8 bytes
//!   3. recorded_at as RFC 3339 UTF-8 bytes
//!   4. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   5. canonical JSON of the diff (serde_json, no pretty-printing)

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use warden_contracts::{
    access_control::ResourceId, error::AclResult, permission::PermissionDiff,
};

use crate::entry::JournalEntry;

/// Compute the SHA-256 hash for a single journal entry.
///
/// Returns a lowercase 64-character hex string.
pub fn hash_entry(
    sequence: u64,
    access_to: &ResourceId,
    recorded_at: &DateTime<Utc>,
    diff: &PermissionDiff,
    prev_hash: &str,
) -> AclResult<String> {
    // PermissionDiff keeps its lists sorted, so equal diffs serialize to
    // equal bytes.
    let diff_json = serde_json::to_vec(diff)?;

    let mut hasher = Sha256::new();
    hasher.update(sequence.to_le_bytes());
    let access_to = access_to.as_str().as_bytes();
    hasher.update((access_to.len() as u64).to_le_bytes());
    hasher.update(access_to);
    hasher.update(
        recorded_at
            .to_rfc3339_opts(SecondsFormat::Nanos, true)
            .as_bytes(),
    );
    hasher.update(prev_hash.as_bytes());
    hasher.update(&diff_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Verify the integrity of a journal chain.
///
/// Returns `true` when every entry links to its predecessor (or to
/// `GENESIS_HASH` for the first), carries the expected sequence number, and
/// its `this_hash` matches the value recomputed from its fields. An empty
/// chain is valid.
pub fn verify_chain(entries: &[JournalEntry]) -> bool {
    let mut expected_prev = JournalEntry::GENESIS_HASH.to_string();

    for (position, entry) in entries.iter().enumerate() {
        if entry.sequence != position as u64 || entry.prev_hash != expected_prev {
            return false;
        }

        let recomputed = match hash_entry(
            entry.sequence,
            &entry.access_to,
            &entry.recorded_at,
            &entry.diff,
            &entry.prev_hash,
        ) {
            Ok(hash) => hash,
            Err(_) => return false,
        };
        if entry.this_hash != recomputed {
            return false;
        }

        expected_prev = entry.this_hash.clone();
    }

    true
}
