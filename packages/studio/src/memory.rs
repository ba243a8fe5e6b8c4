use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::artist::{ArtistDraft, ArtistPatch, ArtistProfile};
use crate::directory::ArtistStore;
use crate::error::StoreError;
use crate::resolver::RoleRecordStore;
use crate::role::{RoleName, UserRoleRecord};
use crate::watch::{Subscription, Watchers};

/// Role record as persisted: the role is kept as raw text, like a database
/// column, and interpreted on read.
#[derive(Clone, Debug)]
struct StoredRole {
    uid: String,
    email: String,
    name: String,
    role: Option<String>,
    created_at: DateTime<Utc>,
}

impl StoredRole {
    fn to_record(&self) -> UserRoleRecord {
        UserRoleRecord {
            uid: self.uid.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: RoleName::from_stored(self.role.as_deref()),
            created_at: self.created_at,
        }
    }
}

/// In-memory role and artist store for tests and local development.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    roles: Arc<Mutex<Vec<StoredRole>>>,
    artists: Arc<Mutex<BTreeMap<String, ArtistProfile>>>,
    next_artist_id: Arc<AtomicU64>,
    artist_watchers: Watchers<[ArtistProfile]>,
    publishing: Arc<Mutex<()>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a role record with an arbitrary stored role value.
    pub fn seed_role_record(&self, uid: &str, email: &str, role: Option<&str>) {
        lock(&self.roles).push(StoredRole {
            uid: uid.to_string(),
            email: email.to_string(),
            name: String::new(),
            role: role.map(str::to_string),
            created_at: Utc::now(),
        });
    }

    pub fn artist_watcher_count(&self) -> usize {
        self.artist_watchers.len()
    }

    fn active_artists(&self) -> Vec<ArtistProfile> {
        let mut rows: Vec<ArtistProfile> = lock(&self.artists)
            .values()
            .filter(|a| a.is_active())
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }

    /// Snapshot and notify under one lock, so watchers never receive an
    /// older list after a newer one. Callbacks must not write to the store.
    fn publish_artists(&self) {
        let _publishing = lock(&self.publishing);
        let rows = self.active_artists();
        self.artist_watchers.notify(&rows);
    }
}

impl RoleRecordStore for MemoryStore {
    async fn find_role_record(&self, uid: &str) -> Result<Option<UserRoleRecord>, StoreError> {
        Ok(lock(&self.roles)
            .iter()
            .find(|r| r.uid == uid)
            .map(StoredRole::to_record))
    }

    async fn has_any_role_record(&self) -> Result<bool, StoreError> {
        Ok(!lock(&self.roles).is_empty())
    }

    async fn insert_role_record_if_absent(&self, record: &UserRoleRecord) -> Result<bool, StoreError> {
        let mut roles = lock(&self.roles);
        if roles.iter().any(|r| r.uid == record.uid) {
            return Ok(false);
        }
        roles.push(StoredRole {
            uid: record.uid.clone(),
            email: record.email.clone(),
            name: record.name.clone(),
            role: Some(record.role.as_str().to_string()),
            created_at: record.created_at,
        });
        Ok(true)
    }

    async fn list_role_records(&self) -> Result<Vec<UserRoleRecord>, StoreError> {
        let mut records: Vec<UserRoleRecord> =
            lock(&self.roles).iter().map(StoredRole::to_record).collect();
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }

    async fn set_role(&self, uid: &str, role: RoleName) -> Result<(), StoreError> {
        let mut roles = lock(&self.roles);
        let record = roles
            .iter_mut()
            .find(|r| r.uid == uid)
            .ok_or_else(|| StoreError::NotFound(uid.to_string()))?;
        record.role = Some(role.as_str().to_string());
        Ok(())
    }
}

impl ArtistStore for MemoryStore {
    async fn list_active_artists(&self) -> Result<Vec<ArtistProfile>, StoreError> {
        Ok(self.active_artists())
    }

    async fn get_artist(&self, id: &str) -> Result<Option<ArtistProfile>, StoreError> {
        Ok(lock(&self.artists).get(id).cloned())
    }

    async fn insert_artist(&self, draft: &ArtistDraft) -> Result<String, StoreError> {
        let id = format!(
            "artist-{}",
            self.next_artist_id.fetch_add(1, Ordering::SeqCst) + 1
        );
        let profile = draft.clone().into_profile(id.clone(), Utc::now());
        lock(&self.artists).insert(id.clone(), profile);
        self.publish_artists();
        Ok(id)
    }

    async fn update_artist(&self, id: &str, patch: &ArtistPatch) -> Result<(), StoreError> {
        {
            let mut artists = lock(&self.artists);
            let profile = artists
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            patch.apply_to(profile);
            profile.updated_at = Some(Utc::now());
        }
        self.publish_artists();
        Ok(())
    }

    async fn delete_artist(&self, id: &str) -> Result<(), StoreError> {
        lock(&self.artists).remove(id);
        self.publish_artists();
        Ok(())
    }

    fn watch_active_artists(
        &self,
        callback: impl Fn(&[ArtistProfile]) + Send + Sync + 'static,
    ) -> Subscription {
        self.artist_watchers.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artist::{ArtistInput, ArtistStatus};

    fn draft(name: &str) -> ArtistDraft {
        ArtistInput {
            name: name.to_string(),
            ..ArtistInput::default()
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn role_records_are_unique_per_uid() {
        let store = MemoryStore::new();
        assert!(!store.has_any_role_record().await.unwrap());

        let record = UserRoleRecord {
            uid: "u1".to_string(),
            email: "u1@victimsofink.test".to_string(),
            name: "U1".to_string(),
            role: RoleName::Admin,
            created_at: Utc::now(),
        };
        assert!(store.insert_role_record_if_absent(&record).await.unwrap());
        assert!(!store
            .insert_role_record_if_absent(&UserRoleRecord {
                role: RoleName::Artist,
                ..record.clone()
            })
            .await
            .unwrap());

        assert!(store.has_any_role_record().await.unwrap());
        let stored = store.find_role_record("u1").await.unwrap().unwrap();
        assert_eq!(stored.role, RoleName::Admin);
    }

    #[tokio::test]
    async fn set_role_on_missing_record_fails() {
        let store = MemoryStore::new();
        assert_eq!(
            store.set_role("nobody", RoleName::Admin).await,
            Err(StoreError::NotFound("nobody".to_string()))
        );
    }

    #[tokio::test]
    async fn watchers_receive_sorted_active_rows() {
        let store = MemoryStore::new();
        let seen = Arc::new(Mutex::new(Vec::<Vec<String>>::new()));

        let sink = Arc::clone(&seen);
        let _sub = store.watch_active_artists(move |rows| {
            lock(&sink).push(rows.iter().map(|a| a.name.clone()).collect());
        });

        store.insert_artist(&draft("Zed")).await.unwrap();
        let alma = store.insert_artist(&draft("Alma")).await.unwrap();
        store
            .update_artist(
                &alma,
                &ArtistPatch {
                    status: Some(ArtistStatus::Inactive),
                    ..ArtistPatch::default()
                },
            )
            .await
            .unwrap();
        store.delete_artist(&alma).await.unwrap();

        let seen = lock(&seen).clone();
        assert_eq!(
            seen,
            vec![
                vec!["Zed".to_string()],
                vec!["Alma".to_string(), "Zed".to_string()],
                vec!["Zed".to_string()],
                vec!["Zed".to_string()],
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_never_publish_a_stale_list() {
        let store = MemoryStore::new();
        let sizes = Arc::new(Mutex::new(Vec::<usize>::new()));

        let sink = Arc::clone(&sizes);
        let _sub = store.watch_active_artists(move |rows| lock(&sink).push(rows.len()));

        let writers: Vec<_> = (0..8)
            .map(|w| {
                let store = store.clone();
                tokio::spawn(async move {
                    for i in 0..25 {
                        store.insert_artist(&draft(&format!("w{w}-{i}"))).await.unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap();
        }

        let sizes = lock(&sizes).clone();
        assert_eq!(sizes.len(), 200);
        assert!(sizes.windows(2).all(|pair| pair[0] <= pair[1]), "{sizes:?}");
        assert_eq!(sizes.last(), Some(&200));
    }

    #[tokio::test]
    async fn generated_ids_are_distinct() {
        let store = MemoryStore::new();
        let a = store.insert_artist(&draft("A")).await.unwrap();
        let b = store.insert_artist(&draft("B")).await.unwrap();
        assert_ne!(a, b);
    }
}
