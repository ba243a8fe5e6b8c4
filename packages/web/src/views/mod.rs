use studio::nav::entry_for;
use studio::{NavEntry, RoleName};

use crate::Route;

mod auth;
pub use auth::{Login, Register};

mod shell;
pub use shell::AppShell;

mod sections;
pub use sections::{Artists, Clients, Dashboard, Emails, Leads, Messages, Sales, Settings};

mod not_found;
pub use not_found::NotFound;

/// Roles allowed on `route`, taken from its navigation entry. Routes without
/// an entry admit nobody.
pub(crate) fn allowed_roles(route: Route) -> &'static [RoleName] {
    entry_for(&route.to_string())
        .map(NavEntry::allowed_roles)
        .unwrap_or(&[])
}
