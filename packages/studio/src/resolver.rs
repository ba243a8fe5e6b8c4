//! # Role resolution for the signed-in user
//!
//! [`RoleResolver::resolve`] runs whenever the session changes (and on manual
//! refresh). For a signed-in user it reads the role record keyed by the
//! account id; when none exists it bootstraps one:
//!
//! 1. ask the store whether *any* role record exists (a limit-1 lookup);
//! 2. none at all → the user becomes [`RoleName::PRIVILEGED`], otherwise
//!    [`RoleName::LEAST_PRIVILEGED`];
//! 3. persist with an insert-if-absent before reporting the role.
//!
//! Step 1 and step 3 are not atomic. Two *different* accounts signing in for
//! the very first time at the same moment can both observe an empty store and
//! both become admin; that first-writer-wins behaviour is accepted. Two
//! concurrent resolutions for the *same* account cannot create two records:
//! the loser of the insert re-reads and reports the stored role.

use std::future::Future;

use chrono::Utc;

use crate::error::StoreError;
use crate::role::{RoleName, RoleState, UserRoleRecord};
use crate::session::SessionUser;

/// Persistence for [`UserRoleRecord`]s.
pub trait RoleRecordStore {
    fn find_role_record(
        &self,
        uid: &str,
    ) -> impl Future<Output = Result<Option<UserRoleRecord>, StoreError>> + Send;

    /// Whether at least one role record exists anywhere.
    fn has_any_role_record(&self) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Insert `record` unless one already exists for its uid.
    /// Returns `true` when this call created the record.
    fn insert_role_record_if_absent(
        &self,
        record: &UserRoleRecord,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// All records, oldest first.
    fn list_role_records(
        &self,
    ) -> impl Future<Output = Result<Vec<UserRoleRecord>, StoreError>> + Send;

    fn set_role(
        &self,
        uid: &str,
        role: RoleName,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Resolves (and lazily bootstraps) the role of a session user.
#[derive(Debug, Clone)]
pub struct RoleResolver<S> {
    store: S,
}

impl<S: RoleRecordStore> RoleResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve the role for `identity`. `None` resolves to no role.
    pub async fn resolve(&self, identity: Option<&SessionUser>) -> Result<RoleState, StoreError> {
        let Some(user) = identity else {
            return Ok(RoleState::resolved(None));
        };

        if let Some(record) = self.store.find_role_record(&user.id).await? {
            return Ok(RoleState::resolved(Some(record.role)));
        }

        let role = if self.store.has_any_role_record().await? {
            RoleName::LEAST_PRIVILEGED
        } else {
            RoleName::PRIVILEGED
        };

        let record = UserRoleRecord {
            uid: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone().unwrap_or_default(),
            role,
            created_at: Utc::now(),
        };

        if self.store.insert_role_record_if_absent(&record).await? {
            tracing::info!(uid = %user.id, %role, "Created role record");
            return Ok(RoleState::resolved(Some(role)));
        }

        // Another resolution for this account won the insert.
        let stored = self
            .store
            .find_role_record(&user.id)
            .await?
            .map(|r| r.role)
            .unwrap_or(RoleName::LEAST_PRIVILEGED);
        Ok(RoleState::resolved(Some(stored)))
    }

    /// Re-run resolution without waiting for a session change, e.g. after an
    /// admin edited roles.
    pub async fn refresh(&self, identity: Option<&SessionUser>) -> Result<RoleState, StoreError> {
        self.resolve(identity).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn user(id: &str) -> SessionUser {
        SessionUser {
            id: id.to_string(),
            email: format!("{id}@victimsofink.test"),
            name: Some(id.to_uppercase()),
            avatar_url: None,
            provider: "local".to_string(),
        }
    }

    /// Wraps a [`MemoryStore`] and counts insert attempts.
    #[derive(Clone, Default)]
    struct CountingStore {
        inner: MemoryStore,
        inserts: Arc<AtomicUsize>,
    }

    impl RoleRecordStore for CountingStore {
        async fn find_role_record(&self, uid: &str) -> Result<Option<UserRoleRecord>, StoreError> {
            self.inner.find_role_record(uid).await
        }

        async fn has_any_role_record(&self) -> Result<bool, StoreError> {
            self.inner.has_any_role_record().await
        }

        async fn insert_role_record_if_absent(
            &self,
            record: &UserRoleRecord,
        ) -> Result<bool, StoreError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            self.inner.insert_role_record_if_absent(record).await
        }

        async fn list_role_records(&self) -> Result<Vec<UserRoleRecord>, StoreError> {
            self.inner.list_role_records().await
        }

        async fn set_role(&self, uid: &str, role: RoleName) -> Result<(), StoreError> {
            self.inner.set_role(uid, role).await
        }
    }

    /// Fails the chosen calls with a backend error; everything else goes to
    /// a [`MemoryStore`].
    #[derive(Clone, Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_find: bool,
        fail_insert: bool,
    }

    fn unavailable() -> StoreError {
        StoreError::backend("database unavailable")
    }

    impl RoleRecordStore for FlakyStore {
        async fn find_role_record(&self, uid: &str) -> Result<Option<UserRoleRecord>, StoreError> {
            if self.fail_find {
                return Err(unavailable());
            }
            self.inner.find_role_record(uid).await
        }

        async fn has_any_role_record(&self) -> Result<bool, StoreError> {
            self.inner.has_any_role_record().await
        }

        async fn insert_role_record_if_absent(
            &self,
            record: &UserRoleRecord,
        ) -> Result<bool, StoreError> {
            if self.fail_insert {
                return Err(unavailable());
            }
            self.inner.insert_role_record_if_absent(record).await
        }

        async fn list_role_records(&self) -> Result<Vec<UserRoleRecord>, StoreError> {
            self.inner.list_role_records().await
        }

        async fn set_role(&self, uid: &str, role: RoleName) -> Result<(), StoreError> {
            self.inner.set_role(uid, role).await
        }
    }

    #[tokio::test]
    async fn lookup_failure_is_returned_not_guessed() {
        let store = FlakyStore {
            fail_find: true,
            ..FlakyStore::default()
        };
        store
            .inner
            .seed_role_record("desk", "desk@victimsofink.test", Some("reception"));
        let resolver = RoleResolver::new(store.clone());

        let err = resolver.resolve(Some(&user("desk"))).await.unwrap_err();
        assert_eq!(err, unavailable());
        assert_eq!(store.inner.list_role_records().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_bootstrap_insert_leaves_no_record() {
        let store = FlakyStore {
            fail_insert: true,
            ..FlakyStore::default()
        };
        let resolver = RoleResolver::new(store.clone());

        let err = resolver.resolve(Some(&user("first"))).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        assert!(!store.inner.has_any_role_record().await.unwrap());
    }

    #[tokio::test]
    async fn no_identity_resolves_to_no_role() {
        let resolver = RoleResolver::new(MemoryStore::new());
        let state = resolver.resolve(None).await.unwrap();
        assert_eq!(state, RoleState::resolved(None));
        assert!(resolver.store().list_role_records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn first_user_ever_becomes_admin() {
        let resolver = RoleResolver::new(MemoryStore::new());

        let state = resolver.resolve(Some(&user("ink"))).await.unwrap();
        assert_eq!(state.role, Some(RoleName::Admin));
        assert!(!state.loading);

        let record = resolver.store().find_role_record("ink").await.unwrap().unwrap();
        assert_eq!(record.role, RoleName::Admin);
        assert_eq!(record.email, "ink@victimsofink.test");
        assert_eq!(record.name, "INK");
    }

    #[tokio::test]
    async fn later_first_time_users_default_to_artist() {
        let resolver = RoleResolver::new(MemoryStore::new());

        resolver.resolve(Some(&user("first"))).await.unwrap();
        let second = resolver.resolve(Some(&user("second"))).await.unwrap();
        let third = resolver.resolve(Some(&user("third"))).await.unwrap();

        assert_eq!(second.role, Some(RoleName::Artist));
        assert_eq!(third.role, Some(RoleName::Artist));
        assert_eq!(resolver.store().list_role_records().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn existing_record_is_reported_verbatim_without_writing() {
        let store = CountingStore::default();
        store
            .inner
            .seed_role_record("desk", "desk@victimsofink.test", Some("reception"));
        let resolver = RoleResolver::new(store.clone());

        for _ in 0..3 {
            let state = resolver.resolve(Some(&user("desk"))).await.unwrap();
            assert_eq!(state.role, Some(RoleName::Reception));
        }
        assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unrecognised_stored_role_defaults_to_artist() {
        let store = MemoryStore::new();
        store.seed_role_record("legacy", "legacy@victimsofink.test", Some("owner"));
        store.seed_role_record("blank", "blank@victimsofink.test", None);
        let resolver = RoleResolver::new(store);

        let legacy = resolver.resolve(Some(&user("legacy"))).await.unwrap();
        let blank = resolver.resolve(Some(&user("blank"))).await.unwrap();
        assert_eq!(legacy.role, Some(RoleName::Artist));
        assert_eq!(blank.role, Some(RoleName::Artist));
    }

    #[tokio::test]
    async fn repeated_resolution_keeps_one_record_per_identity() {
        let store = CountingStore::default();
        let resolver = RoleResolver::new(store.clone());

        let first = resolver.resolve(Some(&user("solo"))).await.unwrap();
        let again = resolver.refresh(Some(&user("solo"))).await.unwrap();

        assert_eq!(first, again);
        assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
        assert_eq!(store.list_role_records().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn refresh_picks_up_role_changes() {
        let resolver = RoleResolver::new(MemoryStore::new());
        resolver.resolve(Some(&user("boss"))).await.unwrap();
        resolver.resolve(Some(&user("mara"))).await.unwrap();

        resolver
            .store()
            .set_role("mara", RoleName::Reception)
            .await
            .unwrap();

        let state = resolver.refresh(Some(&user("mara"))).await.unwrap();
        assert_eq!(state.role, Some(RoleName::Reception));
    }

    #[tokio::test]
    async fn lost_insert_race_reports_stored_role() {
        let store = MemoryStore::new();
        let resolver = RoleResolver::new(store.clone());

        // Simulate a concurrent resolution having written between our
        // lookup and insert.
        let record = UserRoleRecord {
            uid: "racer".to_string(),
            email: "racer@victimsofink.test".to_string(),
            name: String::new(),
            role: RoleName::Reception,
            created_at: Utc::now(),
        };
        assert!(store.insert_role_record_if_absent(&record).await.unwrap());
        assert!(!store.insert_role_record_if_absent(&record).await.unwrap());

        let state = resolver.resolve(Some(&user("racer"))).await.unwrap();
        assert_eq!(state.role, Some(RoleName::Reception));
        assert_eq!(store.list_role_records().await.unwrap().len(), 1);
    }
}
