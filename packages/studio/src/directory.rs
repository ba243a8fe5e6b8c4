//! # Artist directory — create, edit, delete and the live active list
//!
//! [`ArtistStore`] is the persistence seam (PostgreSQL on the server,
//! [`crate::MemoryStore`] in tests). [`ArtistDirectory`] layers the
//! form-level rules on top of it:
//!
//! - validation runs before any store call and fails fast;
//! - edits load a fresh single-record snapshot instead of trusting the list;
//! - deletes go through a [`PendingDelete`] that must be confirmed.
//!
//! [`LiveArtists`] keeps the active-artist list current by subscribing to
//! the store's watch API; dropping it releases the subscription.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::artist::{ArtistDraft, ArtistInput, ArtistPatch, ArtistProfile, ValidationError};
use crate::error::StoreError;
use crate::watch::Subscription;

/// Persistence for artist profiles.
pub trait ArtistStore {
    /// Active artists ordered by name ascending.
    fn list_active_artists(
        &self,
    ) -> impl Future<Output = Result<Vec<ArtistProfile>, StoreError>> + Send;

    fn get_artist(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<ArtistProfile>, StoreError>> + Send;

    /// Insert a new record with store-assigned id and timestamps. Returns the id.
    fn insert_artist(
        &self,
        draft: &ArtistDraft,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;

    /// Apply `patch` and refresh the update timestamp.
    fn update_artist(
        &self,
        id: &str,
        patch: &ArtistPatch,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn delete_artist(&self, id: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Register `callback` to receive the full active list after every change.
    fn watch_active_artists(
        &self,
        callback: impl Fn(&[ArtistProfile]) + Send + Sync + 'static,
    ) -> Subscription;
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DirectoryError {
    /// Text shown inline next to the form.
    ///
    /// Validation messages are specific; store failures are reported
    /// generically and their details only go to the log.
    pub fn user_message(&self) -> String {
        match self {
            DirectoryError::Validation(err) => err.to_string(),
            DirectoryError::Store(StoreError::NotFound(_)) => {
                "This artist no longer exists.".to_string()
            }
            DirectoryError::Store(StoreError::Backend(_)) => {
                "Failed to save artist. Please try again.".to_string()
            }
        }
    }
}

/// Form-level operations over an [`ArtistStore`].
#[derive(Debug, Clone)]
pub struct ArtistDirectory<S> {
    store: S,
}

impl<S: ArtistStore> ArtistDirectory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn list_active(&self) -> Result<Vec<ArtistProfile>, DirectoryError> {
        Ok(self.store.list_active_artists().await?)
    }

    /// Validate `input` and insert a new artist.
    pub async fn create(&self, input: &ArtistInput) -> Result<String, DirectoryError> {
        let draft = input.validate()?;
        let id = self.store.insert_artist(&draft).await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to create artist");
        })?;
        tracing::info!(%id, name = %draft.name, "Created artist");
        Ok(id)
    }

    /// Load a fresh copy of one artist to pre-populate the edit form.
    pub async fn load_for_edit(&self, id: &str) -> Result<ArtistInput, DirectoryError> {
        let profile = self
            .store
            .get_artist(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(ArtistInput::from_profile(&profile))
    }

    /// Validate `input` and apply it to `id` as a partial update.
    pub async fn save_edit(&self, id: &str, input: &ArtistInput) -> Result<(), DirectoryError> {
        let patch = input.validate()?.into_patch();
        self.store.update_artist(id, &patch).await.inspect_err(|e| {
            tracing::error!(%id, error = %e, "Failed to update artist");
        })?;
        Ok(())
    }

    /// Start a delete. Nothing happens unless [`PendingDelete::confirm`] is called.
    pub fn request_delete(&self, id: impl Into<String>) -> PendingDelete<'_, S> {
        PendingDelete {
            store: &self.store,
            id: id.into(),
        }
    }

    /// Open a live view of active artists.
    pub async fn live(&self) -> Result<LiveArtists, DirectoryError> {
        self.live_with(|| {}).await
    }

    /// Open a live view that also calls `on_change` after every pushed
    /// update has been applied to it.
    pub async fn live_with(
        &self,
        on_change: impl Fn() + Send + Sync + 'static,
    ) -> Result<LiveArtists, DirectoryError> {
        let shared = Arc::new(Mutex::new(LiveState::default()));

        let pushed = Arc::clone(&shared);
        let subscription = self.store.watch_active_artists(move |rows| {
            {
                let mut state = lock(&pushed);
                state.rows = rows.to_vec();
                state.pushed = true;
                state.revision += 1;
            }
            on_change();
        });

        let initial = self.store.list_active_artists().await?;
        {
            let mut state = lock(&shared);
            // A push that landed while the initial read was in flight is newer.
            if !state.pushed {
                state.rows = initial;
                state.revision += 1;
            }
        }

        Ok(LiveArtists {
            state: shared,
            _subscription: subscription,
        })
    }
}

/// A delete waiting for explicit confirmation. Dropping it cancels.
#[must_use = "a pending delete does nothing until confirmed"]
#[derive(Debug)]
pub struct PendingDelete<'a, S> {
    store: &'a S,
    id: String,
}

impl<S: ArtistStore> PendingDelete<'_, S> {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Permanently remove the artist.
    pub async fn confirm(self) -> Result<(), DirectoryError> {
        self.store.delete_artist(&self.id).await.inspect_err(|e| {
            tracing::error!(id = %self.id, error = %e, "Failed to delete artist");
        })?;
        tracing::info!(id = %self.id, "Deleted artist");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct LiveState {
    rows: Vec<ArtistProfile>,
    pushed: bool,
    revision: u64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Continuously updated list of active artists.
#[derive(Debug)]
pub struct LiveArtists {
    state: Arc<Mutex<LiveState>>,
    _subscription: Subscription,
}

impl LiveArtists {
    /// Current rows, ordered by name.
    pub fn rows(&self) -> Vec<ArtistProfile> {
        lock(&self.state).rows.clone()
    }

    /// Increments on every update.
    pub fn revision(&self) -> u64 {
        lock(&self.state).revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artist::{ArtistStatus, Service};
    use crate::memory::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Reads go to a [`MemoryStore`]; every write fails like a lost
    /// database connection.
    #[derive(Clone, Default)]
    struct BrokenWrites {
        inner: MemoryStore,
    }

    fn connection_lost() -> StoreError {
        StoreError::backend("connection reset by peer")
    }

    impl ArtistStore for BrokenWrites {
        async fn list_active_artists(&self) -> Result<Vec<ArtistProfile>, StoreError> {
            self.inner.list_active_artists().await
        }

        async fn get_artist(&self, id: &str) -> Result<Option<ArtistProfile>, StoreError> {
            self.inner.get_artist(id).await
        }

        async fn insert_artist(&self, _draft: &ArtistDraft) -> Result<String, StoreError> {
            Err(connection_lost())
        }

        async fn update_artist(&self, _id: &str, _patch: &ArtistPatch) -> Result<(), StoreError> {
            Err(connection_lost())
        }

        async fn delete_artist(&self, _id: &str) -> Result<(), StoreError> {
            Err(connection_lost())
        }

        fn watch_active_artists(
            &self,
            callback: impl Fn(&[ArtistProfile]) + Send + Sync + 'static,
        ) -> Subscription {
            self.inner.watch_active_artists(callback)
        }
    }

    fn input(name: &str) -> ArtistInput {
        ArtistInput {
            name: name.to_string(),
            ..ArtistInput::default()
        }
    }

    fn names(rows: &[ArtistProfile]) -> Vec<String> {
        rows.iter().map(|a| a.name.clone()).collect()
    }

    #[tokio::test]
    async fn create_stores_validated_record_with_timestamps() {
        let directory = ArtistDirectory::new(MemoryStore::new());
        let mut form = input(" Rosa Vex ");
        form.commission = "45.5".to_string();
        form.services = vec![Service::Tattoo, Service::Consultation];

        let id = directory.create(&form).await.unwrap();
        let stored = directory.store().get_artist(&id).await.unwrap().unwrap();

        assert_eq!(stored.name, "Rosa Vex");
        assert_eq!(stored.commission_percent, Some(45.5));
        assert_eq!(stored.status, ArtistStatus::Active);
        assert_eq!(stored.services, vec![Service::Tattoo, Service::Consultation]);
        assert!(stored.created_at.is_some());
        assert_eq!(stored.created_at, stored.updated_at);
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_store() {
        let directory = ArtistDirectory::new(MemoryStore::new());
        let mut form = input("Rosa");
        form.commission = "150".to_string();

        let err = directory.create(&form).await.unwrap_err();
        assert_eq!(
            err,
            DirectoryError::Validation(ValidationError::CommissionOutOfRange)
        );
        assert_eq!(err.user_message(), "Commission % must be between 0 and 100.");

        form.commission = String::new();
        form.tax_id = "1234567890".to_string();
        assert!(matches!(
            directory.create(&form).await,
            Err(DirectoryError::Validation(ValidationError::InvalidTaxId))
        ));

        assert!(directory.list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn edit_applies_partial_update() {
        let directory = ArtistDirectory::new(MemoryStore::new());
        let mut form = input("Rosa");
        form.phone = "0400 111 222".to_string();
        form.commission = "40".to_string();
        let id = directory.create(&form).await.unwrap();

        let mut edit = directory.load_for_edit(&id).await.unwrap();
        assert_eq!(edit.phone, "0400 111 222");
        edit.phone = String::new();
        edit.commission = String::new();
        edit.specialty = "Blackwork".to_string();
        directory.save_edit(&id, &edit).await.unwrap();

        let stored = directory.store().get_artist(&id).await.unwrap().unwrap();
        assert_eq!(stored.phone.as_deref(), Some("0400 111 222"));
        assert_eq!(stored.commission_percent, None);
        assert_eq!(stored.specialty.as_deref(), Some("Blackwork"));
        assert!(stored.updated_at >= stored.created_at);
    }

    #[tokio::test]
    async fn editing_a_missing_artist_reports_not_found() {
        let directory = ArtistDirectory::new(MemoryStore::new());
        let err = directory.load_for_edit("ghost").await.unwrap_err();
        assert!(matches!(err, DirectoryError::Store(StoreError::NotFound(_))));
        assert_eq!(err.user_message(), "This artist no longer exists.");

        let err = directory.save_edit("ghost", &input("Ghost")).await.unwrap_err();
        assert!(matches!(err, DirectoryError::Store(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let directory = ArtistDirectory::new(MemoryStore::new());
        let id = directory.create(&input("Rosa")).await.unwrap();

        let pending = directory.request_delete(id.clone());
        assert_eq!(pending.id(), id);
        drop(pending);
        assert!(directory.store().get_artist(&id).await.unwrap().is_some());

        directory.request_delete(id.clone()).confirm().await.unwrap();
        assert!(directory.store().get_artist(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn live_view_tracks_active_artists_by_name() {
        let directory = ArtistDirectory::new(MemoryStore::new());
        directory.create(&input("Zed")).await.unwrap();

        let live = directory.live().await.unwrap();
        assert_eq!(names(&live.rows()), vec!["Zed"]);
        let start = live.revision();

        let alma = directory.create(&input("Alma")).await.unwrap();
        let mut hidden = input("Mika");
        hidden.status = ArtistStatus::Inactive;
        directory.create(&hidden).await.unwrap();

        assert_eq!(names(&live.rows()), vec!["Alma", "Zed"]);
        assert!(live.revision() > start);

        let mut retire = directory.load_for_edit(&alma).await.unwrap();
        retire.status = ArtistStatus::Inactive;
        directory.save_edit(&alma, &retire).await.unwrap();
        assert_eq!(names(&live.rows()), vec!["Zed"]);
    }

    #[tokio::test]
    async fn dropping_live_view_releases_subscription() {
        let store = MemoryStore::new();
        let directory = ArtistDirectory::new(store.clone());

        let live = directory.live().await.unwrap();
        assert_eq!(store.artist_watcher_count(), 1);
        drop(live);
        assert_eq!(store.artist_watcher_count(), 0);

        directory.create(&input("Rosa")).await.unwrap();
    }

    #[tokio::test]
    async fn failed_create_reports_generic_message_and_stores_nothing() {
        let store = BrokenWrites::default();
        let directory = ArtistDirectory::new(store.clone());

        let err = directory.create(&input("Rosa")).await.unwrap_err();
        assert!(matches!(err, DirectoryError::Store(StoreError::Backend(_))));
        assert_eq!(err.user_message(), "Failed to save artist. Please try again.");
        assert!(!err.user_message().contains("connection reset"));

        assert!(directory.list_active().await.unwrap().is_empty());
        assert!(store.inner.get_artist("artist-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_edit_leaves_the_record_unchanged() {
        let store = BrokenWrites::default();
        let id = ArtistDirectory::new(store.inner.clone())
            .create(&input("Rosa"))
            .await
            .unwrap();
        let directory = ArtistDirectory::new(store.clone());

        let mut edit = directory.load_for_edit(&id).await.unwrap();
        edit.name = "Rosa Vex".to_string();
        edit.specialty = "Blackwork".to_string();
        let err = directory.save_edit(&id, &edit).await.unwrap_err();
        assert_eq!(err.user_message(), "Failed to save artist. Please try again.");

        let stored = store.inner.get_artist(&id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Rosa");
        assert_eq!(stored.specialty, None);
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_record() {
        let store = BrokenWrites::default();
        let id = ArtistDirectory::new(store.inner.clone())
            .create(&input("Rosa"))
            .await
            .unwrap();
        let directory = ArtistDirectory::new(store.clone());

        let err = directory.request_delete(id.clone()).confirm().await.unwrap_err();
        assert!(matches!(err, DirectoryError::Store(StoreError::Backend(_))));
        assert!(store.inner.get_artist(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn change_hook_fires_after_each_push_until_dropped() {
        let store = MemoryStore::new();
        let directory = ArtistDirectory::new(store.clone());
        let changes = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&changes);
        let live = directory
            .live_with(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await
            .unwrap();
        assert_eq!(changes.load(Ordering::SeqCst), 0);

        directory.create(&input("Rosa")).await.unwrap();
        assert_eq!(changes.load(Ordering::SeqCst), 1);
        assert_eq!(names(&live.rows()), vec!["Rosa"]);

        drop(live);
        directory.create(&input("Zed")).await.unwrap();
        assert_eq!(changes.load(Ordering::SeqCst), 1);
    }
}
