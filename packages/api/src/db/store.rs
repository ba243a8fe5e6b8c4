//! PostgreSQL implementation of the role and artist stores.
//!
//! Role records live in `user_roles`, artists in `artists`. Every artist
//! write pushes the fresh active list to the registered watchers and then
//! bumps [`PgStore::revision`]. Watchers are process-local: a write made by
//! another server process is only seen on the next read.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use studio::{
    ArtistDraft, ArtistPatch, ArtistProfile, ArtistStatus, ArtistStore, RoleName,
    RoleRecordStore, Service, StoreError, Subscription, UserRoleRecord, Watchers,
};
use tokio::sync::{Mutex, OnceCell};

use super::get_pool;

static STORE: OnceCell<PgStore> = OnceCell::const_new();

/// The store shared by every server function in this process.
pub async fn get_store() -> Result<&'static PgStore, sqlx::Error> {
    STORE
        .get_or_try_init(|| async { Ok(PgStore::new(get_pool().await?.clone())) })
        .await
}

const ARTIST_COLUMNS: &str = "id, name, email, phone, instagram, specialty, bio, status, \
     tax_id, gst_registered, commission_percent, start_date, end_date, services, \
     created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
    artist_watchers: Watchers<[ArtistProfile]>,
    revision: Arc<AtomicU64>,
    publishing: Arc<Mutex<()>>,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            artist_watchers: Watchers::new(),
            revision: Arc::new(AtomicU64::new(0)),
            publishing: Arc::new(Mutex::new(())),
        }
    }

    /// Number of artist writes published by this process. Long-poll clients
    /// echo it back to wait for the next change. Watchers have already
    /// received the list for revision `n` by the time `n` is visible here.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Reload, notify and bump one write at a time, so watchers never receive
    /// an older list after a newer one.
    async fn publish_artists(&self) {
        let _publishing = self.publishing.lock().await;
        match self.list_active_artists().await {
            Ok(rows) => self.artist_watchers.notify(&rows),
            Err(e) => tracing::warn!(error = %e, "Failed to reload active artists for watchers"),
        }
        self.revision.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(FromRow)]
struct RoleRow {
    uid: String,
    email: String,
    name: String,
    role: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<RoleRow> for UserRoleRecord {
    fn from(row: RoleRow) -> Self {
        UserRoleRecord {
            uid: row.uid,
            email: row.email,
            name: row.name,
            role: RoleName::from_stored(row.role.as_deref()),
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct ArtistRow {
    id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    instagram: Option<String>,
    specialty: Option<String>,
    bio: Option<String>,
    status: String,
    tax_id: Option<String>,
    gst_registered: bool,
    commission_percent: Option<f64>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    services: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ArtistRow> for ArtistProfile {
    fn from(row: ArtistRow) -> Self {
        let services = row
            .services
            .iter()
            .filter_map(|raw| {
                raw.parse::<Service>()
                    .inspect_err(|e| tracing::warn!(id = %row.id, "{e}"))
                    .ok()
            })
            .collect();

        ArtistProfile {
            status: row.status.parse().unwrap_or(ArtistStatus::Inactive),
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            instagram: row.instagram,
            specialty: row.specialty,
            bio: row.bio,
            tax_id: row.tax_id,
            gst_registered: row.gst_registered,
            commission_percent: row.commission_percent,
            start_date: row.start_date,
            end_date: row.end_date,
            services,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

fn service_names(services: &[Service]) -> Vec<String> {
    services.iter().map(|s| s.as_str().to_string()).collect()
}

/// Append `, column = $n` to an UPDATE.
fn set<'a, T>(qb: &mut QueryBuilder<'a, Postgres>, column: &str, value: T)
where
    T: 'a + sqlx::Encode<'a, Postgres> + sqlx::Type<Postgres>,
{
    qb.push(", ").push(column).push(" = ").push_bind(value);
}

impl RoleRecordStore for PgStore {
    async fn find_role_record(&self, uid: &str) -> Result<Option<UserRoleRecord>, StoreError> {
        let row: Option<RoleRow> = sqlx::query_as(
            "SELECT uid, email, name, role, created_at FROM user_roles WHERE uid = $1",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;
        Ok(row.map(Into::into))
    }

    async fn has_any_role_record(&self) -> Result<bool, StoreError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM user_roles LIMIT 1)")
                .fetch_one(&self.pool)
                .await
                .map_err(StoreError::backend)?;
        Ok(exists)
    }

    async fn insert_role_record_if_absent(
        &self,
        record: &UserRoleRecord,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT INTO user_roles (uid, email, name, role, created_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (uid) DO NOTHING",
        )
        .bind(&record.uid)
        .bind(&record.email)
        .bind(&record.name)
        .bind(record.role.as_str())
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_role_records(&self) -> Result<Vec<UserRoleRecord>, StoreError> {
        let rows: Vec<RoleRow> = sqlx::query_as(
            "SELECT uid, email, name, role, created_at FROM user_roles ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn set_role(&self, uid: &str, role: RoleName) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE user_roles SET role = $1 WHERE uid = $2")
            .bind(role.as_str())
            .bind(uid)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(uid.to_string()));
        }
        Ok(())
    }
}

impl ArtistStore for PgStore {
    async fn list_active_artists(&self) -> Result<Vec<ArtistProfile>, StoreError> {
        let sql = format!(
            "SELECT {ARTIST_COLUMNS} FROM artists WHERE status = 'active' ORDER BY name ASC"
        );
        let rows: Vec<ArtistRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_artist(&self, id: &str) -> Result<Option<ArtistProfile>, StoreError> {
        let sql = format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE id = $1");
        let row: Option<ArtistRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        Ok(row.map(Into::into))
    }

    async fn insert_artist(&self, draft: &ArtistDraft) -> Result<String, StoreError> {
        let (id,): (String,) = sqlx::query_as(
            "INSERT INTO artists (name, email, phone, instagram, specialty, bio, status,
                                  tax_id, gst_registered, commission_percent, start_date,
                                  end_date, services)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING id",
        )
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(&draft.instagram)
        .bind(&draft.specialty)
        .bind(&draft.bio)
        .bind(draft.status.as_str())
        .bind(&draft.tax_id)
        .bind(draft.gst_registered)
        .bind(draft.commission_percent)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .bind(service_names(&draft.services))
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        self.publish_artists().await;
        Ok(id)
    }

    async fn update_artist(&self, id: &str, patch: &ArtistPatch) -> Result<(), StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE artists SET updated_at = NOW()");

        if let Some(name) = &patch.name {
            set(&mut qb, "name", name.clone());
        }
        if let Some(status) = patch.status {
            set(&mut qb, "status", status.as_str());
        }
        for (column, value) in [
            ("email", &patch.email),
            ("phone", &patch.phone),
            ("instagram", &patch.instagram),
            ("specialty", &patch.specialty),
            ("bio", &patch.bio),
            ("tax_id", &patch.tax_id),
        ] {
            if let Some(value) = value {
                set(&mut qb, column, value.clone());
            }
        }
        if let Some(gst) = patch.gst_registered {
            set(&mut qb, "gst_registered", gst);
        }
        if let Some(commission) = patch.commission_percent {
            set(&mut qb, "commission_percent", commission);
        }
        if let Some(start) = patch.start_date {
            set(&mut qb, "start_date", start);
        }
        if let Some(end) = patch.end_date {
            set(&mut qb, "end_date", end);
        }
        if let Some(services) = &patch.services {
            set(&mut qb, "services", service_names(services));
        }

        qb.push(" WHERE id = ").push_bind(id.to_string());

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        self.publish_artists().await;
        Ok(())
    }

    async fn delete_artist(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM artists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        self.publish_artists().await;
        Ok(())
    }

    fn watch_active_artists(
        &self,
        callback: impl Fn(&[ArtistProfile]) + Send + Sync + 'static,
    ) -> Subscription {
        self.artist_watchers.subscribe(callback)
    }
}
