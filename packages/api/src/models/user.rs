//! # Staff account row
//!
//! [`User`] is the complete row from the `users` table (server only). Accounts
//! come from two providers: `"local"` (email + password, where `provider_id`
//! equals the lower-cased email) and `"google"`.
//!
//! The client never sees this type. [`User::to_session_user`] projects it into
//! [`studio::SessionUser`], which drops the password hash and timestamps and
//! turns the `Uuid` into a string so it can cross into WASM.

#[cfg(feature = "server")]
use chrono::{DateTime, Utc};
#[cfg(feature = "server")]
use sqlx::FromRow;
#[cfg(feature = "server")]
use studio::SessionUser;
#[cfg(feature = "server")]
use uuid::Uuid;

/// Full user record from the database.
#[cfg(feature = "server")]
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub provider: String,
    pub provider_id: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "server")]
impl User {
    pub fn to_session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id.to_string(),
            email: self.email.clone(),
            name: self.name.clone(),
            avatar_url: self.avatar_url.clone(),
            provider: self.provider.clone(),
        }
    }
}
