//! # API crate — server functions for the studio dashboard
//!
//! Every public `async fn` here is a Dioxus server function, annotated with
//! `#[get(...)]` or `#[post(...)]` and compiled twice: once with the real
//! logic (behind `#[cfg(feature = "server")]`) and once as a client stub that
//! forwards the call over HTTP.
//!
//! | Group | Functions | Access |
//! |-------|-----------|--------|
//! | Studio | `get_studio_name` | anyone |
//! | Auth | `get_current_user`, `get_login_url`, `login_password`, `register`, `logout` | anyone |
//! | Roles | `resolve_role` | signed in |
//! | Staff | `list_role_records`, `set_role` | admin |
//! | Artists | `list_active_artists`, `watch_active_artists`, `get_artist_for_edit`, `create_artist`, `update_artist`, `delete_artist` | admin |
//!
//! Authorization is re-checked on the server for every call; the UI gates
//! are a convenience only.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

pub mod auth;
#[cfg(feature = "server")]
pub mod config;
pub mod db;
pub mod models;

pub use studio::{ArtistInput, ArtistProfile, RoleName, SessionUser, UserRoleRecord};

/// One answer of the active-artist long poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtistFeed {
    /// Pass back as `seen` to wait for the next change.
    pub revision: u64,
    pub artists: Vec<ArtistProfile>,
}

#[cfg(feature = "server")]
const ARTIST_MANAGERS: &[RoleName] = &[RoleName::Admin];
#[cfg(feature = "server")]
const STAFF_MANAGERS: &[RoleName] = &[RoleName::Admin];

#[cfg(feature = "server")]
fn server_error(e: impl std::fmt::Display) -> ServerFnError {
    ServerFnError::new(e.to_string())
}

/// The signed-in account for `session`, if any.
#[cfg(feature = "server")]
async fn session_user(
    session: &tower_sessions::Session,
) -> Result<Option<SessionUser>, ServerFnError> {
    use crate::db::get_pool;
    use crate::models::User;

    let Some(user_id) = auth::session_user_id(session)
        .await
        .map_err(ServerFnError::new)?
    else {
        return Ok(None);
    };

    let user_uuid = uuid::Uuid::parse_str(&user_id).map_err(server_error)?;
    let pool = get_pool().await.map_err(server_error)?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_uuid)
        .fetch_optional(pool)
        .await
        .map_err(server_error)?;

    Ok(user.map(|u| u.to_session_user()))
}

/// Resolve the caller's role and reject unless it is in `allowed`.
#[cfg(feature = "server")]
async fn require_role(
    session: &tower_sessions::Session,
    allowed: &[RoleName],
) -> Result<SessionUser, ServerFnError> {
    use studio::RoleResolver;

    let Some(user) = session_user(session).await? else {
        return Err(ServerFnError::new("Not authenticated"));
    };

    let store = db::get_store().await.map_err(server_error)?;
    let state = RoleResolver::new(store.clone())
        .resolve(Some(&user))
        .await
        .map_err(server_error)?;

    match state.role {
        Some(role) if allowed.contains(&role) => Ok(user),
        role => {
            tracing::warn!(uid = %user.id, ?role, "Rejected call outside the caller's role");
            Err(ServerFnError::new("Not authorized"))
        }
    }
}

#[cfg(feature = "server")]
async fn artist_directory() -> Result<studio::ArtistDirectory<db::PgStore>, ServerFnError> {
    let store = db::get_store().await.map_err(server_error)?;
    Ok(studio::ArtistDirectory::new(store.clone()))
}

#[cfg(feature = "server")]
async fn start_session(
    session: &tower_sessions::Session,
    user: &models::User,
) -> Result<(), ServerFnError> {
    session
        .insert(auth::SESSION_USER_ID_KEY, user.id.to_string())
        .await
        .map_err(server_error)
}

/// Display name of the studio from `studio.toml`.
#[cfg(feature = "server")]
#[get("/api/studio/name")]
pub async fn get_studio_name() -> Result<String, ServerFnError> {
    Ok(config::studio_config().studio.name.clone())
}

#[cfg(not(feature = "server"))]
#[get("/api/studio/name")]
pub async fn get_studio_name() -> Result<String, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Get the current authenticated user from the session.
#[cfg(feature = "server")]
#[get("/api/auth/me", session: tower_sessions::Session)]
pub async fn get_current_user() -> Result<Option<SessionUser>, ServerFnError> {
    session_user(&session).await
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/me")]
pub async fn get_current_user() -> Result<Option<SessionUser>, ServerFnError> {
    Ok(None)
}

/// Get the OAuth consent URL for a provider. Only `google` is configured.
#[cfg(feature = "server")]
#[get("/api/auth/login/:provider")]
pub async fn get_login_url(provider: String) -> Result<String, ServerFnError> {
    match provider.as_str() {
        "google" => {
            let oauth = auth::GoogleOAuth::new().map_err(ServerFnError::new)?;
            oauth.authorize_url().await.map_err(ServerFnError::new)
        }
        _ => Err(ServerFnError::new(format!("Unknown provider: {provider}"))),
    }
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/login/:provider")]
pub async fn get_login_url(provider: String) -> Result<String, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Log out the current user by clearing the session.
#[cfg(feature = "server")]
#[post("/api/auth/logout", session: tower_sessions::Session)]
pub async fn logout() -> Result<(), ServerFnError> {
    session.flush().await.map_err(server_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/logout")]
pub async fn logout() -> Result<(), ServerFnError> {
    Ok(())
}

/// Register a local account and sign it in.
#[cfg(feature = "server")]
#[post("/api/auth/register", session: tower_sessions::Session)]
pub async fn register(
    email: String,
    password: String,
    name: String,
) -> Result<SessionUser, ServerFnError> {
    use crate::db::get_pool;

    let email = email.trim().to_lowercase();
    let name = name.trim().to_string();

    if email.is_empty() || !email.contains('@') {
        return Err(ServerFnError::new("Invalid email address"));
    }
    if password.len() < auth::MIN_PASSWORD_LEN {
        return Err(ServerFnError::new(format!(
            "Password must be at least {} characters",
            auth::MIN_PASSWORD_LEN
        )));
    }
    if name.is_empty() {
        return Err(ServerFnError::new("Name is required"));
    }

    let pool = get_pool().await.map_err(server_error)?;

    let existing: Option<(i32,)> =
        sqlx::query_as("SELECT 1 FROM users WHERE provider = 'local' AND provider_id = $1")
            .bind(&email)
            .fetch_optional(pool)
            .await
            .map_err(server_error)?;
    if existing.is_some() {
        return Err(ServerFnError::new("An account with this email already exists"));
    }

    let password_hash = auth::hash_password(&password).map_err(ServerFnError::new)?;

    let user: models::User = sqlx::query_as(
        "INSERT INTO users (email, name, provider, provider_id, password_hash)
         VALUES ($1, $2, 'local', $1, $3)
         RETURNING *",
    )
    .bind(&email)
    .bind(&name)
    .bind(&password_hash)
    .fetch_one(pool)
    .await
    .map_err(server_error)?;

    start_session(&session, &user).await?;
    tracing::info!(uid = %user.id, "Registered local account");
    Ok(user.to_session_user())
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/register")]
pub async fn register(
    email: String,
    password: String,
    name: String,
) -> Result<SessionUser, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Log in with email and password.
#[cfg(feature = "server")]
#[post("/api/auth/login-password", session: tower_sessions::Session)]
pub async fn login_password(email: String, password: String) -> Result<SessionUser, ServerFnError> {
    use crate::db::get_pool;

    const REJECTED: &str = "Invalid email or password";

    let email = email.trim().to_lowercase();
    let pool = get_pool().await.map_err(server_error)?;

    let user: Option<models::User> =
        sqlx::query_as("SELECT * FROM users WHERE provider = 'local' AND provider_id = $1")
            .bind(&email)
            .fetch_optional(pool)
            .await
            .map_err(server_error)?;

    let Some(user) = user else {
        return Err(ServerFnError::new(REJECTED));
    };
    let Some(hash) = user.password_hash.as_deref() else {
        return Err(ServerFnError::new(REJECTED));
    };
    if !auth::verify_password(&password, hash).map_err(ServerFnError::new)? {
        return Err(ServerFnError::new(REJECTED));
    }

    start_session(&session, &user).await?;
    Ok(user.to_session_user())
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/login-password")]
pub async fn login_password(email: String, password: String) -> Result<SessionUser, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Role of the signed-in user, bootstrapping a role record on first sign-in.
/// `None` when nobody is signed in.
#[cfg(feature = "server")]
#[get("/api/roles/me", session: tower_sessions::Session)]
pub async fn resolve_role() -> Result<Option<RoleName>, ServerFnError> {
    use studio::RoleResolver;

    let user = session_user(&session).await?;
    let store = db::get_store().await.map_err(server_error)?;

    let state = RoleResolver::new(store.clone())
        .resolve(user.as_ref())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Role resolution failed"))
        .map_err(server_error)?;
    Ok(state.role)
}

#[cfg(not(feature = "server"))]
#[get("/api/roles/me")]
pub async fn resolve_role() -> Result<Option<RoleName>, ServerFnError> {
    Ok(None)
}

/// Every staff role record, oldest first.
#[cfg(feature = "server")]
#[get("/api/roles", session: tower_sessions::Session)]
pub async fn list_role_records() -> Result<Vec<UserRoleRecord>, ServerFnError> {
    use studio::RoleRecordStore;

    require_role(&session, STAFF_MANAGERS).await?;
    let store = db::get_store().await.map_err(server_error)?;
    store.list_role_records().await.map_err(server_error)
}

#[cfg(not(feature = "server"))]
#[get("/api/roles")]
pub async fn list_role_records() -> Result<Vec<UserRoleRecord>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Change the stored role of `uid`.
#[cfg(feature = "server")]
#[post("/api/roles/set", session: tower_sessions::Session)]
pub async fn set_role(uid: String, role: RoleName) -> Result<(), ServerFnError> {
    use studio::RoleRecordStore;

    let admin = require_role(&session, STAFF_MANAGERS).await?;
    let store = db::get_store().await.map_err(server_error)?;
    store.set_role(&uid, role).await.map_err(server_error)?;
    tracing::info!(by = %admin.id, %uid, %role, "Changed staff role");
    Ok(())
}

#[cfg(not(feature = "server"))]
#[post("/api/roles/set")]
pub async fn set_role(uid: String, role: RoleName) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Active artists ordered by name.
#[cfg(feature = "server")]
#[get("/api/artists", session: tower_sessions::Session)]
pub async fn list_active_artists() -> Result<Vec<ArtistProfile>, ServerFnError> {
    require_role(&session, ARTIST_MANAGERS).await?;
    artist_directory()
        .await?
        .list_active()
        .await
        .map_err(|e| ServerFnError::new(e.user_message()))
}

#[cfg(not(feature = "server"))]
#[get("/api/artists")]
pub async fn list_active_artists() -> Result<Vec<ArtistProfile>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Long poll over the active-artist list.
///
/// With `seen` equal to the current revision the call waits until the next
/// artist write or the configured timeout; otherwise it answers at once.
/// The watcher registered for the wait is dropped when the request ends.
#[cfg(feature = "server")]
#[post("/api/artists/watch", session: tower_sessions::Session)]
pub async fn watch_active_artists(seen: Option<u64>) -> Result<ArtistFeed, ServerFnError> {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    require_role(&session, ARTIST_MANAGERS).await?;
    let store = db::get_store().await.map_err(server_error)?;

    let changed = Arc::new(Notify::new());
    let waker = Arc::clone(&changed);
    let live = artist_directory()
        .await?
        .live_with(move || waker.notify_one())
        .await
        .map_err(|e| ServerFnError::new(e.user_message()))?;

    if seen == Some(store.revision()) {
        let wait = Duration::from_secs(config::studio_config().feed.long_poll_secs);
        let _ = tokio::time::timeout(wait, changed.notified()).await;
    }

    // Revision first: the live rows are at least as new as it.
    let revision = store.revision();
    Ok(ArtistFeed {
        revision,
        artists: live.rows(),
    })
}

#[cfg(not(feature = "server"))]
#[post("/api/artists/watch")]
pub async fn watch_active_artists(seen: Option<u64>) -> Result<ArtistFeed, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Fresh form values for one artist, read directly from the store.
#[cfg(feature = "server")]
#[post("/api/artists/edit", session: tower_sessions::Session)]
pub async fn get_artist_for_edit(id: String) -> Result<ArtistInput, ServerFnError> {
    require_role(&session, ARTIST_MANAGERS).await?;
    artist_directory()
        .await?
        .load_for_edit(&id)
        .await
        .map_err(|e| ServerFnError::new(e.user_message()))
}

#[cfg(not(feature = "server"))]
#[post("/api/artists/edit")]
pub async fn get_artist_for_edit(id: String) -> Result<ArtistInput, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Validate and create an artist. Returns the new id.
#[cfg(feature = "server")]
#[post("/api/artists/create", session: tower_sessions::Session)]
pub async fn create_artist(input: ArtistInput) -> Result<String, ServerFnError> {
    require_role(&session, ARTIST_MANAGERS).await?;
    artist_directory()
        .await?
        .create(&input)
        .await
        .map_err(|e| ServerFnError::new(e.user_message()))
}

#[cfg(not(feature = "server"))]
#[post("/api/artists/create")]
pub async fn create_artist(input: ArtistInput) -> Result<String, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Validate and apply an edit as a partial update.
#[cfg(feature = "server")]
#[post("/api/artists/update", session: tower_sessions::Session)]
pub async fn update_artist(id: String, input: ArtistInput) -> Result<(), ServerFnError> {
    require_role(&session, ARTIST_MANAGERS).await?;
    artist_directory()
        .await?
        .save_edit(&id, &input)
        .await
        .map_err(|e| ServerFnError::new(e.user_message()))
}

#[cfg(not(feature = "server"))]
#[post("/api/artists/update")]
pub async fn update_artist(id: String, input: ArtistInput) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Permanently delete an artist. The client asks for confirmation first.
#[cfg(feature = "server")]
#[post("/api/artists/delete", session: tower_sessions::Session)]
pub async fn delete_artist(id: String) -> Result<(), ServerFnError> {
    require_role(&session, ARTIST_MANAGERS).await?;
    let directory = artist_directory().await?;
    directory
        .request_delete(id)
        .confirm()
        .await
        .map_err(|e| ServerFnError::new(e.user_message()))
}

#[cfg(not(feature = "server"))]
#[post("/api/artists/delete")]
pub async fn delete_artist(id: String) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}
