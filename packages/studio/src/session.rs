//! Signed-in identity as seen by the dashboard.
//!
//! [`SessionUser`] is the client-safe projection of an account: it crosses the
//! server/client boundary and never carries credentials. [`SessionState`]
//! pairs it with a loading flag so views can tell "not signed in" apart from
//! "not known yet".

use serde::{Deserialize, Serialize};

/// Identity of the signed-in staff member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    /// `"local"` for email + password accounts, otherwise the OAuth provider.
    pub provider: String,
}

impl SessionUser {
    /// Get display name, falling back to email if name is not set.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }

    /// Single letter used for the account avatar fallback.
    pub fn initial(&self) -> String {
        self.display_name()
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string())
    }
}

/// Current session: who is signed in, and whether that is known yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<SessionUser>,
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl SessionState {
    pub fn signed_in(user: SessionUser) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: Option<&str>) -> SessionUser {
        SessionUser {
            id: "u-1".to_string(),
            email: "mara@victimsofink.test".to_string(),
            name: name.map(str::to_string),
            avatar_url: None,
            provider: "local".to_string(),
        }
    }

    #[test]
    fn display_name_falls_back_to_email() {
        assert_eq!(user(Some("Mara")).display_name(), "Mara");
        assert_eq!(user(None).display_name(), "mara@victimsofink.test");
        assert_eq!(user(Some("  ")).display_name(), "mara@victimsofink.test");
        assert_eq!(user(Some("mara")).initial(), "M");
    }

    #[test]
    fn default_session_is_loading() {
        let state = SessionState::default();
        assert!(state.loading);
        assert!(!state.is_authenticated());
        assert!(SessionState::signed_in(user(None)).is_authenticated());
        assert!(!SessionState::signed_out().is_authenticated());
    }
}
