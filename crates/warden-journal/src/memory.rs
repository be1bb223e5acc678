//! In-memory implementation of `ChangeJournal`.
//!
//! `InMemoryJournal` keeps all entries in a `Vec` protected by a `Mutex`.
//! Use `entries()` to read the chain, `verify_integrity()` to confirm it has
//! not been altered, and `flush()`/`open()` to keep it in a JSON file.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info};

use warden_contracts::{
    access_control::ResourceId,
    error::{AclError, AclResult},
    permission::PermissionDiff,
};
use warden_core::traits::ChangeJournal;

use crate::{
    chain::{hash_entry, verify_chain},
    entry::JournalEntry,
};

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct JournalState {
    /// All entries appended so far, in chain order.
    pub(crate) entries: Vec<JournalEntry>,

    /// `this_hash` of the last entry, or `GENESIS_HASH` when empty.
    last_hash: String,
}

impl JournalState {
    fn from_entries(entries: Vec<JournalEntry>) -> Self {
        let last_hash = entries
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_else(|| JournalEntry::GENESIS_HASH.to_string());
        Self { entries, last_hash }
    }
}

// ── Public journal ────────────────────────────────────────────────────────────

/// An in-memory, append-only change journal backed by a SHA-256 hash chain.
#[derive(Clone)]
pub struct InMemoryJournal {
    pub(crate) state: Arc<Mutex<JournalState>>,
}

impl InMemoryJournal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(JournalState::from_entries(Vec::new()))),
        }
    }

    /// Load a journal from the JSON file at `path`. A missing file yields
    /// an empty journal.
    ///
    /// The chain is loaded as-is; call `verify_integrity()` to check it.
    pub fn open(path: &Path) -> AclResult<Self> {
        let entries: Vec<JournalEntry> = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                AclError::persistence(format!("failed to read journal '{}': {}", path.display(), e))
            })?;
            serde_json::from_str(&contents)?
        } else {
            Vec::new()
        };

        debug!(path = %path.display(), entries = entries.len(), "journal loaded");
        Ok(Self {
            state: Arc::new(Mutex::new(JournalState::from_entries(entries))),
        })
    }

    /// Write every entry to `path` as a JSON array.
    pub fn flush(&self, path: &Path) -> AclResult<()> {
        let state = self.lock()?;
        let contents = serde_json::to_string_pretty(&state.entries)?;
        std::fs::write(path, contents).map_err(|e| AclError::JournalWriteFailed {
            reason: format!("failed to write journal '{}': {}", path.display(), e),
        })
    }

    /// A copy of every entry, in chain order.
    pub fn entries(&self) -> AclResult<Vec<JournalEntry>> {
        Ok(self.lock()?.entries.clone())
    }

    /// Verify that the chain has not been tampered with.
    pub fn verify_integrity(&self) -> bool {
        match self.lock() {
            Ok(state) => verify_chain(&state.entries),
            Err(_) => false,
        }
    }

    fn lock(&self) -> AclResult<MutexGuard<'_, JournalState>> {
        self.state.lock().map_err(|e| AclError::JournalWriteFailed {
            reason: format!("journal state lock poisoned: {}", e),
        })
    }
}

impl Default for InMemoryJournal {
    fn default() -> Self {
        Self::new()
    }
}

// ── ChangeJournal impl ────────────────────────────────────────────────────────

impl ChangeJournal for InMemoryJournal {
    /// Append one committed diff to the chain. Empty diffs are skipped.
    fn record(&self, access_to: &ResourceId, diff: &PermissionDiff) -> AclResult<()> {
        if diff.is_empty() {
            debug!(resource = %access_to, "empty diff; nothing to journal");
            return Ok(());
        }

        let mut state = self.lock()?;

        let sequence = state.entries.len() as u64;
        let prev_hash = state.last_hash.clone();
        let recorded_at = Utc::now();
        let this_hash = hash_entry(sequence, access_to, &recorded_at, diff, &prev_hash)?;

        state.entries.push(JournalEntry {
            sequence,
            access_to: access_to.clone(),
            diff: diff.clone(),
            recorded_at,
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.last_hash = this_hash;

        info!(
            resource = %access_to,
            sequence,
            added = diff.added.len(),
            removed = diff.removed.len(),
            "permission change journaled"
        );

        Ok(())
    }
}
