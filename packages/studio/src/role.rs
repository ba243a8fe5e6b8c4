//! Staff roles and the persisted per-user role record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of staff roles.
///
/// [`RoleName::Admin`] is the privileged role handed to the very first user;
/// [`RoleName::Artist`] is the least-privileged default for everyone after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    Admin,
    Reception,
    Artist,
}

impl RoleName {
    pub const ALL: [RoleName; 3] = [RoleName::Admin, RoleName::Reception, RoleName::Artist];

    pub const PRIVILEGED: RoleName = RoleName::Admin;
    pub const LEAST_PRIVILEGED: RoleName = RoleName::Artist;

    pub fn as_str(self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::Reception => "reception",
            RoleName::Artist => "artist",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RoleName::Admin => "Admin",
            RoleName::Reception => "Reception",
            RoleName::Artist => "Artist",
        }
    }

    /// Interpret a role value read back from storage.
    ///
    /// Missing or unrecognised values resolve to the least-privileged role.
    pub fn from_stored(raw: Option<&str>) -> RoleName {
        raw.and_then(|r| r.parse().ok())
            .unwrap_or(RoleName::LEAST_PRIVILEGED)
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(RoleName::Admin),
            "reception" => Ok(RoleName::Reception),
            "artist" => Ok(RoleName::Artist),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// Persisted role assignment, keyed by the account id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRoleRecord {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub role: RoleName,
    pub created_at: DateTime<Utc>,
}

/// Resolved role for the current session.
///
/// `failed` marks a resolution that errored; the role is then unknown, which
/// is different from a signed-out viewer having no role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleState {
    pub role: Option<RoleName>,
    pub loading: bool,
    pub failed: bool,
}

impl Default for RoleState {
    fn default() -> Self {
        Self::pending()
    }
}

impl RoleState {
    pub fn pending() -> Self {
        Self {
            role: None,
            loading: true,
            failed: false,
        }
    }

    pub fn resolved(role: Option<RoleName>) -> Self {
        Self {
            role,
            loading: false,
            failed: false,
        }
    }

    pub fn failed() -> Self {
        Self {
            role: None,
            loading: false,
            failed: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles() {
        for role in RoleName::ALL {
            assert_eq!(role.as_str().parse::<RoleName>(), Ok(role));
        }
        assert!("owner".parse::<RoleName>().is_err());
    }

    #[test]
    fn unknown_or_missing_stored_role_is_least_privileged() {
        assert_eq!(RoleName::from_stored(Some("admin")), RoleName::Admin);
        assert_eq!(RoleName::from_stored(Some("reception")), RoleName::Reception);
        assert_eq!(RoleName::from_stored(Some("superuser")), RoleName::Artist);
        assert_eq!(RoleName::from_stored(Some("")), RoleName::Artist);
        assert_eq!(RoleName::from_stored(None), RoleName::Artist);
    }

    #[test]
    fn serializes_lowercase() {
        let text = serialized_role(RoleName::Reception);
        assert_eq!(text, "reception");
    }

    fn serialized_role(role: RoleName) -> String {
        #[derive(Serialize)]
        struct Wrap {
            role: RoleName,
        }
        let text = toml::to_string(&Wrap { role }).unwrap();
        text.trim()
            .trim_start_matches("role = ")
            .trim_matches('"')
            .to_string()
    }
}
