//! Top navigation bar, sidebar and account menu.
//!
//! Both bars render the same role-filtered list from [`studio::nav`], so a
//! viewer never sees a link they would be redirected away from.

use dioxus::prelude::*;
use studio::gate::DASHBOARD_PATH;
use studio::nav::visible_entries;
use studio::{NavEntry, NavIcon, NAV_ENTRIES};

use crate::icons::{
    FaAddressBook, FaBars, FaComments, FaEnvelope, FaGauge, FaGear, FaPalette,
    FaRightFromBracket, FaSackDollar, FaUserPlus,
};
use crate::role::use_role;
use crate::session::{sign_out, use_session};
use crate::branding::use_studio_name;
use crate::Icon;

const NAV_CSS: Asset = asset!("/assets/styling/nav.css");

#[component]
fn NavGlyph(icon: NavIcon) -> Element {
    match icon {
        NavIcon::Dashboard => rsx! { Icon { icon: FaGauge, width: 16, height: 16 } },
        NavIcon::Leads => rsx! { Icon { icon: FaUserPlus, width: 16, height: 16 } },
        NavIcon::Clients => rsx! { Icon { icon: FaAddressBook, width: 16, height: 16 } },
        NavIcon::Artists => rsx! { Icon { icon: FaPalette, width: 16, height: 16 } },
        NavIcon::Sales => rsx! { Icon { icon: FaSackDollar, width: 16, height: 16 } },
        NavIcon::Messages => rsx! { Icon { icon: FaComments, width: 16, height: 16 } },
        NavIcon::Emails => rsx! { Icon { icon: FaEnvelope, width: 16, height: 16 } },
        NavIcon::Settings => rsx! { Icon { icon: FaGear, width: 16, height: 16 } },
    }
}

fn use_visible_entries() -> Vec<NavEntry> {
    let role = use_role();
    visible_entries(role.role(), NAV_ENTRIES)
}

/// Horizontal bar with the studio name, the role-filtered links and the
/// account menu. `on_toggle_sidebar` is wired to the hamburger button shown
/// on narrow screens.
#[component]
pub fn TopNav(on_toggle_sidebar: EventHandler<()>) -> Element {
    let entries = use_visible_entries();
    let studio_name = use_studio_name();

    rsx! {
        document::Stylesheet { href: NAV_CSS }
        header {
            class: "topnav",
            button {
                class: "topnav-menu",
                title: "Menu",
                onclick: move |_| on_toggle_sidebar.call(()),
                Icon { icon: FaBars, width: 18, height: 18 }
            }
            Link { class: "topnav-brand", to: DASHBOARD_PATH, "{studio_name}" }
            nav {
                class: "topnav-links",
                for entry in entries {
                    Link {
                        key: "{entry.path}",
                        class: "topnav-link",
                        active_class: "active",
                        to: entry.path,
                        NavGlyph { icon: entry.icon }
                        span { "{entry.label}" }
                    }
                }
            }
            AccountMenu {}
        }
    }
}

/// Vertical navigation. On narrow screens it slides over the content while
/// `open` is set; following a link closes it.
#[component]
pub fn Sidebar(open: bool, on_close: EventHandler<()>) -> Element {
    let entries = use_visible_entries();

    rsx! {
        if open {
            div { class: "sidebar-backdrop", onclick: move |_| on_close.call(()) }
        }
        aside {
            class: if open { "sidebar sidebar-open" } else { "sidebar" },
            nav {
                for entry in entries {
                    Link {
                        key: "{entry.path}",
                        class: "sidebar-link",
                        active_class: "active",
                        to: entry.path,
                        onclick: move |_| on_close.call(()),
                        NavGlyph { icon: entry.icon }
                        span { "{entry.label}" }
                    }
                }
            }
        }
    }
}

#[component]
fn AccountMenu() -> Element {
    let session = use_session();
    let role = use_role();
    let nav = use_navigator();
    let mut open = use_signal(|| false);

    let Some(user) = session().user else {
        return rsx! {};
    };

    let handle_sign_out = move |_| async move {
        open.set(false);
        sign_out(session).await;
        nav.replace("/login");
    };

    rsx! {
        div {
            class: "account",
            button {
                class: "account-button",
                onclick: move |_| open.set(!open()),
                if let Some(ref avatar) = user.avatar_url {
                    img { class: "account-avatar", src: "{avatar}", alt: "Avatar" }
                } else {
                    span { class: "account-avatar account-initial", "{user.initial()}" }
                }
            }
            if open() {
                div {
                    class: "account-menu",
                    div {
                        class: "account-identity",
                        strong { "{user.display_name()}" }
                        span { class: "account-email", "{user.email}" }
                        if let Some(role) = role.role() {
                            span { class: "role-badge role-{role}", "{role.label()}" }
                        }
                    }
                    button {
                        class: "account-signout",
                        onclick: handle_sign_out,
                        Icon { icon: FaRightFromBracket, width: 14, height: 14 }
                        span { "Sign out" }
                    }
                }
            }
        }
    }
}
