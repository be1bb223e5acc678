//! # warden-journal
//!
//! Append-only, SHA-256 hash-chained journal of committed WARDEN
//! permission changes.
//!
//! ## Overview
//!
//! Every diff committed through
//! [`AccessControlList::save_journaled`](warden_core::AccessControlList::save_journaled)
//! is wrapped in a [`JournalEntry`] linked to the previous entry by hash.
//! Altering any entry breaks the chain, which [`verify_chain`] detects.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warden_journal::InMemoryJournal;
//!
//! let journal = InMemoryJournal::new();
//! acl.save_journaled(&journal)?;
//! assert!(journal.verify_integrity());
//! ```

pub mod chain;
pub mod entry;
pub mod memory;

pub use chain::{hash_entry, verify_chain};
pub use entry::JournalEntry;
pub use memory::InMemoryJournal;

// ── Tests ─────────────────────────────────────────────────────────────────────
