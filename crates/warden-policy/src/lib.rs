//! # warden-policy
//!
//! TOML grant manifests applied through the WARDEN access-control facade.
//!
//! ## Overview
//!
//! A manifest lists grants and revocations per resource. [`GrantManifest`]
//! parses and validates it, then applies it through one
//! [`AccessControlList`](warden_core::AccessControlList) per resource, so
//! re-applying an unchanged manifest writes nothing.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use warden_policy::GrantManifest;
//!
//! let manifest = GrantManifest::from_file(Path::new("grants.toml"))?;
//! let summary = manifest.apply(&store, &store, Some(&journal))?;
//! ```

pub mod manifest;
pub mod rule;

pub use manifest::ApplySummary;
pub use rule::{GrantManifest, GrantRule};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use warden_contracts::{
        access_control::ResourceId,
        agent::{Agent, Group},
        error::AclError,
    };
    use warden_core::AccessControlList;
    use warden_journal::InMemoryJournal;
    use warden_store::InMemoryStore;

    use crate::{ApplySummary, GrantManifest};

    const MANIFEST: &str = r#"
        [[grants]]
        resource = "etaoin"
        mode = "read"
        agent = "u1"

        [[grants]]
        resource = "etaoin"
        mode = "edit"
        group = "public"

        [[grants]]
        resource = "shrdlu"
        mode = "discover"
        agent = "u2"
    "#;

    // ── Parsing ───────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_manifest() {
        let manifest = GrantManifest::from_toml_str(MANIFEST).unwrap();

        assert_eq!(manifest.grants.len(), 3);
        assert!(manifest.revocations.is_empty());
        assert_eq!(manifest.grants[1].group.as_deref(), Some("public"));
        manifest.validate().unwrap();
    }

    #[test]
    fn test_unknown_mode_is_a_config_error() {
        let toml = r#"
            [[grants]]
            resource = "etaoin"
            mode = "admin"
            agent = "u1"
        "#;

        match GrantManifest::from_toml_str(toml) {
            Err(AclError::ConfigError { reason }) => {
                assert!(
                    reason.contains("failed to parse grant manifest"),
                    "unexpected reason: {reason}"
                );
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_rule_needs_exactly_one_principal() {
        let both = r#"
            [[grants]]
            resource = "etaoin"
            mode = "read"
            agent = "u1"
            group = "public"
        "#;
        let neither = r#"
            [[revocations]]
            resource = "etaoin"
            mode = "read"
        "#;

        for toml in [both, neither] {
            let manifest = GrantManifest::from_toml_str(toml).unwrap();
            assert!(matches!(
                manifest.validate(),
                Err(AclError::Validation { .. })
            ));
        }
    }

    #[test]
    fn test_invalid_manifest_writes_nothing() {
        let toml = r#"
            [[grants]]
            resource = "etaoin"
            mode = "read"
            agent = "u1"

            [[grants]]
            resource = ""
            mode = "read"
            agent = "u2"
        "#;
        let store = InMemoryStore::new();
        let manifest = GrantManifest::from_toml_str(toml).unwrap();

        assert!(manifest.apply(&store, &store, None).is_err());
        assert!(store.is_empty().unwrap());
    }

    // ── Application ──────────────────────────────────────────────────────────

    #[test]
    fn test_apply_grants_per_resource() {
        let store = InMemoryStore::new();
        let manifest = GrantManifest::from_toml_str(MANIFEST).unwrap();

        let summary = manifest.apply(&store, &store, None).unwrap();
        assert_eq!(
            summary,
            ApplySummary {
                resources: 2,
                saved: 2,
                unchanged: 0
            }
        );

        let etaoin = ResourceId::from("etaoin");
        let mut acl = AccessControlList::new(&etaoin, &store, &store);
        assert!(acl.has_read(&Agent::new("u1")).unwrap());
        assert!(acl.has_edit(&Group::new("public")).unwrap());

        let shrdlu = ResourceId::from("shrdlu");
        let mut acl = AccessControlList::new(&shrdlu, &store, &store);
        assert!(acl.has_discover(&Agent::new("u2")).unwrap());
    }

    #[test]
    fn test_reapplying_is_a_noop() {
        let store = InMemoryStore::new();
        let journal = InMemoryJournal::new();
        let manifest = GrantManifest::from_toml_str(MANIFEST).unwrap();

        manifest.apply(&store, &store, Some(&journal)).unwrap();
        let again = manifest.apply(&store, &store, Some(&journal)).unwrap();

        assert_eq!(again.saved, 0);
        assert_eq!(again.unchanged, 2);
        assert_eq!(journal.entries().unwrap().len(), 2);
    }

    #[test]
    fn test_revocations_apply_after_grants() {
        let store = InMemoryStore::new();
        GrantManifest::from_toml_str(MANIFEST)
            .unwrap()
            .apply(&store, &store, None)
            .unwrap();

        let revoke = r#"
            [[revocations]]
            resource = "etaoin"
            mode = "edit"
            group = "public"
        "#;
        GrantManifest::from_toml_str(revoke)
            .unwrap()
            .apply(&store, &store, None)
            .unwrap();

        let etaoin = ResourceId::from("etaoin");
        let mut acl = AccessControlList::new(&etaoin, &store, &store);
        assert!(!acl.has_edit(&Group::new("public")).unwrap());
        assert!(acl.has_read(&Agent::new("u1")).unwrap());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grants.toml");
        std::fs::write(&path, MANIFEST).unwrap();

        let manifest = GrantManifest::from_file(&path).unwrap();
        assert_eq!(manifest.grants.len(), 3);

        let missing = GrantManifest::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(AclError::ConfigError { .. })));
    }
}
