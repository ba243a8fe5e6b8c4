//! Signed-in layout: top navigation, collapsible sidebar and the routed page.

use dioxus::prelude::*;
use ui::{ProtectedRoute, Sidebar, TopNav};

use crate::Route;

#[component]
pub fn AppShell() -> Element {
    let mut sidebar_open = use_signal(|| false);

    rsx! {
        ProtectedRoute {
            TopNav { on_toggle_sidebar: move |_| sidebar_open.set(!sidebar_open()) }
            div {
                class: "app-body",
                Sidebar {
                    open: sidebar_open(),
                    on_close: move |_| sidebar_open.set(false),
                }
                main {
                    class: "app-main",
                    Outlet::<Route> {}
                }
            }
        }
    }
}
