//! # warden-store
//!
//! In-memory, indexed record store implementing the WARDEN persistence
//! traits.
//!
//! ## Overview
//!
//! [`InMemoryStore`] implements both
//! [`Persister`](warden_core::traits::Persister) and
//! [`QueryService`](warden_core::traits::QueryService). Records are kept in
//! first-save order; an index over top-level string attributes answers
//! inverse-reference queries without scanning. The store can be loaded from
//! and flushed to a JSON snapshot file.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warden_core::AccessControlList;
//! use warden_store::InMemoryStore;
//!
//! let store = InMemoryStore::open(Path::new("warden-store.json"))?;
//! let mut acl = AccessControlList::new(&resource_id, &store, &store);
//! acl.grant(Mode::Read).to(&Agent::new("u1"))?;
//! acl.save()?;
//! store.flush(Path::new("warden-store.json"))?;
//! ```

pub mod memory;
mod snapshot;

pub use memory::InMemoryStore;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use warden_contracts::{
        access_control::{AccessControl, RecordId, ResourceId},
        agent::{Agent, Group},
        error::AclError,
        permission::{Mode, Permission},
        record::Record,
    };
    use warden_core::{
        traits::{Persister, QueryService},
        AccessControlList, FindAccessControl,
    };

    use super::InMemoryStore;

    fn resource() -> ResourceId {
        ResourceId::from("etaoin")
    }

    // ── Persister / QueryService ──────────────────────────────────────────────

    #[test]
    fn test_save_assigns_id_and_timestamp() {
        let store = InMemoryStore::new();
        let saved = store.save(&AccessControl::new(resource()).to_record().unwrap()).unwrap();

        assert!(saved.is_persisted());
        assert!(saved.updated_at.is_some());
        assert_eq!(store.find_by(&saved.id.unwrap()).unwrap(), saved);
    }

    #[test]
    fn test_saves_an_empty_set_of_permissions_by_default() {
        let store = InMemoryStore::new();
        let saved = store.save(&AccessControl::new(resource()).to_record().unwrap()).unwrap();

        let reloaded = AccessControl::from_record(&store.find_by(&saved.id.unwrap()).unwrap()).unwrap();
        assert!(reloaded.permissions.is_empty());
    }

    #[test]
    fn test_find_by_unknown_id_is_not_found() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.find_by(&RecordId::new()),
            Err(AclError::NotFound { .. })
        ));
    }

    #[test]
    fn test_resave_replaces_record_in_place() {
        let store = InMemoryStore::new();
        let permission = Permission::new(Mode::Read, "moomin", resource());
        let ac = AccessControl::new(resource()).with_permissions([permission]);
        let saved = store.save(&ac.to_record().unwrap()).unwrap();

        let mut updated = AccessControl::from_record(&saved).unwrap();
        updated.permissions.clear();
        store.save(&updated.to_record().unwrap()).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        let reloaded = AccessControl::from_record(&store.find_by(&saved.id.unwrap()).unwrap()).unwrap();
        assert!(reloaded.permissions.is_empty());
    }

    #[test]
    fn test_inverse_references_follow_attribute_changes() {
        let store = InMemoryStore::new();
        let saved = store.save(&AccessControl::new("first").to_record().unwrap()).unwrap();

        let mut moved = AccessControl::from_record(&saved).unwrap();
        moved.access_to = ResourceId::from("second");
        store.save(&moved.to_record().unwrap()).unwrap();

        let first = store
            .find_inverse_references(&ResourceId::from("first"), "access_to", None)
            .unwrap();
        let second = store
            .find_inverse_references(&ResourceId::from("second"), "access_to", None)
            .unwrap();
        assert!(first.is_empty());
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_inverse_references_filter_by_model() {
        let store = InMemoryStore::new();
        store
            .save(&Record::new("Lookalike").with_attribute("access_to", json!("etaoin")))
            .unwrap();
        store.save(&AccessControl::new(resource()).to_record().unwrap()).unwrap();

        let all = store
            .find_inverse_references(&resource(), "access_to", None)
            .unwrap();
        let acls = store
            .find_inverse_references(&resource(), "access_to", Some(AccessControl::MODEL))
            .unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].model, "Lookalike", "results keep first-save order");
        assert_eq!(acls.len(), 1);
        assert_eq!(acls[0].model, AccessControl::MODEL);
    }

    // ── Facade over the store ────────────────────────────────────────────────

    /// Grants saved through one list are visible to a fresh list.
    #[test]
    fn test_round_trip_through_store() {
        let store = InMemoryStore::new();
        let user = Agent::new("u1");
        let public = Group::new("public");

        let mut acl = AccessControlList::new(&resource(), &store, &store);
        acl.grant(Mode::Read)
            .to(&user)
            .unwrap()
            .grant(Mode::Edit)
            .to(&public)
            .unwrap();
        acl.save().unwrap();

        let mut fresh = AccessControlList::new(&resource(), &store, &store);
        assert!(fresh.has_read(&user).unwrap());
        assert!(fresh.has_edit(&public).unwrap());
        assert!(!fresh.has_discover(&user).unwrap());
        assert!(!fresh.pending_changes().unwrap());
    }

    /// A non-AccessControl record with a matching `access_to` must be
    /// treated as if no ACL exists.
    #[test]
    fn test_lookalike_record_yields_empty_access_control() {
        let store = InMemoryStore::new();
        store
            .save(
                &Record::new("Lookalike")
                    .with_attribute("access_to", json!("etaoin"))
                    .with_attribute(
                        "permissions",
                        json!([{ "mode": "edit", "agent": "mallory", "access_to": "etaoin" }]),
                    ),
            )
            .unwrap();

        let ac = FindAccessControl::new(&store)
            .find_or_initialize_for(&resource())
            .unwrap();
        assert!(ac.permissions.is_empty());
        assert!(!ac.is_persisted());

        let mut acl = AccessControlList::new(&resource(), &store, &store);
        assert!(!acl.has_edit(&Agent::new("mallory")).unwrap());
    }

    #[test]
    fn test_grant_stored_for_another_resource_is_ignored() {
        let store = InMemoryStore::new();
        store
            .save(
                &AccessControl::new("etaoin")
                    .with_permissions([Permission::new(Mode::Edit, "mallory", "other-resource")])
                    .to_record()
                    .unwrap(),
            )
            .unwrap();

        let mut acl = AccessControlList::new(&resource(), &store, &store);
        assert!(!acl.has_edit(&Agent::new("mallory")).unwrap());
        assert!(!acl.pending_changes().unwrap());
    }

    #[test]
    fn test_clean_save_writes_nothing() {
        let store = InMemoryStore::new();
        let mut acl = AccessControlList::new(&resource(), &store, &store);

        acl.revoke(Mode::Read).from(&Agent::new("u1")).unwrap();
        acl.save().unwrap();

        assert!(store.is_empty().unwrap(), "no record may be written for an unchanged ACL");
    }

    #[test]
    fn test_saving_twice_updates_one_access_control() {
        let store = InMemoryStore::new();

        let mut acl = AccessControlList::new(&resource(), &store, &store);
        acl.grant(Mode::Read).to(&Agent::new("u1")).unwrap();
        acl.save().unwrap();
        acl.grant(Mode::Edit).to(&Agent::new("u2")).unwrap();
        acl.save().unwrap();

        assert_eq!(store.len().unwrap(), 1);
        let ac = FindAccessControl::new(&store)
            .find_access_control_for(&resource())
            .unwrap();
        assert_eq!(ac.permissions.len(), 2);
    }

    // ── Snapshots ────────────────────────────────────────────────────────────

    #[test]
    fn test_flush_and_open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = InMemoryStore::new();
        let mut acl = AccessControlList::new(&resource(), &store, &store);
        acl.grant(Mode::Discover).to(&Group::new("public")).unwrap();
        acl.save().unwrap();
        store.flush(&path).unwrap();

        let reopened = InMemoryStore::open(&path).unwrap();
        assert_eq!(reopened.len().unwrap(), 1);

        let mut acl = AccessControlList::new(&resource(), &reopened, &reopened);
        assert!(acl.has_discover(&Group::new("public")).unwrap());
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryStore::open(&dir.path().join("absent.json")).unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_poisoned_store_reports_an_error() {
        let store = InMemoryStore::new();
        let holder = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.state.lock().unwrap();
            panic!("poison the store lock");
        })
        .join();

        assert!(matches!(store.len(), Err(AclError::Persistence { .. })));
        assert!(store.is_empty().is_err());
    }

    #[test]
    fn test_open_corrupt_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            InMemoryStore::open(&path),
            Err(AclError::Serialization { .. })
        ));
    }
}
