//! Navigation entries and the role filter applied to them.
//!
//! [`NAV_ENTRIES`] is the single ordered source for both the top navigation
//! bar and the sidebar. Order is significant and preserved by
//! [`visible_entries`].

use crate::role::RoleName;

/// Icon shown next to a navigation label. The UI maps each variant to a
/// concrete glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIcon {
    Dashboard,
    Leads,
    Clients,
    Artists,
    Sales,
    Messages,
    Emails,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub path: &'static str,
    pub label: &'static str,
    pub icon: NavIcon,
    /// `None` means every role sees the entry.
    pub allowed: Option<&'static [RoleName]>,
}

impl NavEntry {
    pub fn is_visible_to(&self, role: Option<RoleName>) -> bool {
        match (self.allowed, role) {
            (None, _) => true,
            (Some(allowed), Some(role)) => allowed.contains(&role),
            (Some(_), None) => false,
        }
    }

    /// Roles permitted on this entry's page, for use with a role gate.
    pub fn allowed_roles(&self) -> &'static [RoleName] {
        self.allowed.unwrap_or(&RoleName::ALL)
    }
}

const FRONT_DESK: &[RoleName] = &[RoleName::Admin, RoleName::Reception];
const ADMIN_ONLY: &[RoleName] = &[RoleName::Admin];

pub const NAV_ENTRIES: &[NavEntry] = &[
    NavEntry {
        path: "/dashboard",
        label: "Dashboard",
        icon: NavIcon::Dashboard,
        allowed: None,
    },
    NavEntry {
        path: "/leads",
        label: "Leads",
        icon: NavIcon::Leads,
        allowed: Some(FRONT_DESK),
    },
    NavEntry {
        path: "/clients",
        label: "Clients",
        icon: NavIcon::Clients,
        allowed: Some(FRONT_DESK),
    },
    NavEntry {
        path: "/artists",
        label: "Artists",
        icon: NavIcon::Artists,
        allowed: Some(ADMIN_ONLY),
    },
    NavEntry {
        path: "/sales",
        label: "Sales",
        icon: NavIcon::Sales,
        allowed: Some(ADMIN_ONLY),
    },
    NavEntry {
        path: "/messages",
        label: "Messages",
        icon: NavIcon::Messages,
        allowed: Some(FRONT_DESK),
    },
    NavEntry {
        path: "/emails",
        label: "Emails",
        icon: NavIcon::Emails,
        allowed: Some(FRONT_DESK),
    },
    NavEntry {
        path: "/settings",
        label: "Settings",
        icon: NavIcon::Settings,
        allowed: Some(ADMIN_ONLY),
    },
];

/// Entries visible to `role`, in configured order.
pub fn visible_entries(role: Option<RoleName>, entries: &[NavEntry]) -> Vec<NavEntry> {
    entries
        .iter()
        .filter(|entry| entry.is_visible_to(role))
        .copied()
        .collect()
}

/// Look up the configured entry for `path`.
pub fn entry_for(path: &str) -> Option<&'static NavEntry> {
    NAV_ENTRIES.iter().find(|entry| entry.path == path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(entries: &[NavEntry]) -> Vec<&'static str> {
        entries.iter().map(|e| e.path).collect()
    }

    #[test]
    fn admin_sees_everything_in_order() {
        let visible = visible_entries(Some(RoleName::Admin), NAV_ENTRIES);
        assert_eq!(visible, NAV_ENTRIES.to_vec());
    }

    #[test]
    fn reception_sees_front_desk_entries() {
        let visible = visible_entries(Some(RoleName::Reception), NAV_ENTRIES);
        assert_eq!(
            paths(&visible),
            vec!["/dashboard", "/leads", "/clients", "/messages", "/emails"]
        );
    }

    #[test]
    fn artist_and_no_role_see_unrestricted_only() {
        assert_eq!(
            paths(&visible_entries(Some(RoleName::Artist), NAV_ENTRIES)),
            vec!["/dashboard"]
        );
        assert_eq!(paths(&visible_entries(None, NAV_ENTRIES)), vec!["/dashboard"]);
    }

    #[test]
    fn result_is_an_order_preserving_subsequence() {
        const ONLY_ARTIST: &[RoleName] = &[RoleName::Artist];
        const NOBODY: &[RoleName] = &[];
        let entries = [
            NavEntry {
                path: "/z",
                label: "Z",
                icon: NavIcon::Sales,
                allowed: Some(ONLY_ARTIST),
            },
            NavEntry {
                path: "/a",
                label: "A",
                icon: NavIcon::Dashboard,
                allowed: None,
            },
            NavEntry {
                path: "/m",
                label: "M",
                icon: NavIcon::Settings,
                allowed: Some(ADMIN_ONLY),
            },
            NavEntry {
                path: "/b",
                label: "B",
                icon: NavIcon::Emails,
                allowed: Some(NOBODY),
            },
        ];

        for role in RoleName::ALL.into_iter().map(Some).chain([None]) {
            let visible = visible_entries(role, &entries);
            let expected: Vec<NavEntry> = entries
                .iter()
                .filter(|e| match e.allowed {
                    None => true,
                    Some(allowed) => role.is_some_and(|r| allowed.contains(&r)),
                })
                .copied()
                .collect();
            assert_eq!(visible, expected, "role {role:?}");
        }

        assert_eq!(
            paths(&visible_entries(Some(RoleName::Artist), &entries)),
            vec!["/z", "/a"]
        );
    }

    #[test]
    fn entry_lookup_and_allowed_roles() {
        let artists = entry_for("/artists").unwrap();
        assert_eq!(artists.allowed_roles(), &[RoleName::Admin]);
        assert_eq!(entry_for("/dashboard").unwrap().allowed_roles(), &RoleName::ALL);
        assert!(entry_for("/nowhere").is_none());
    }
}
