//! Session keys and accessors.

use tower_sessions::Session;

/// Key for storing user ID in session.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// The signed-in account id, if any.
pub async fn session_user_id(session: &Session) -> Result<Option<String>, String> {
    session
        .get(SESSION_USER_ID_KEY)
        .await
        .map_err(|e| e.to_string())
}
