//! Shared Dioxus components for the studio dashboard.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`branding`] | `BrandingProvider`, `use_studio_name` |
//! | [`session`] | `SessionProvider`, `use_session`, sign-in / sign-out helpers |
//! | [`role`] | `RoleProvider`, `use_role`, `RoleHandle::refresh` |
//! | [`gate`] | `ProtectedRoute` and `RoleGate` |
//! | [`nav`] | `TopNav`, `Sidebar` and the account menu |
//! | [`views`] | Page bodies: login, dashboard, artists, settings, placeholders |

pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_brands_icons::FaGoogle;
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub mod branding;
pub mod gate;
pub mod nav;
pub mod role;
pub mod session;
pub mod views;

pub use branding::{use_studio_name, BrandingProvider};
pub use gate::{ProtectedRoute, RoleGate};
pub use nav::{Sidebar, TopNav};
pub use role::{use_role, RoleHandle, RoleProvider};
pub use session::{use_session, SessionProvider};
