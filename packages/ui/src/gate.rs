//! Route guards built on the pure decisions in [`studio::gate`].

use dioxus::prelude::*;
use studio::gate::{role_gate, session_gate};
use studio::{GateDecision, RoleName};

use crate::role::use_role;
use crate::session::use_session;

const VIEWS_CSS: Asset = asset!("/assets/styling/views.css");

/// Renders `children` only for a signed-in user; otherwise redirects to the
/// login page. Shows a loading line while the session is unknown.
#[component]
pub fn ProtectedRoute(children: Element) -> Element {
    let session = use_session();
    let nav = use_navigator();

    match session_gate(&session()) {
        GateDecision::Pending | GateDecision::Failed => rsx! {
            div { class: "gate-loading", "Loading…" }
        },
        GateDecision::Redirect(fallback) => {
            nav.replace(fallback.path());
            rsx! {}
        }
        GateDecision::Allow => rsx! {
            {children}
        },
    }
}

/// Renders `children` only when the resolved role is in `allowed`. Renders
/// nothing while the role is being resolved, and an error with a retry
/// button when resolution failed.
#[component]
pub fn RoleGate(allowed: &'static [RoleName], children: Element) -> Element {
    let session = use_session();
    let role = use_role();
    let nav = use_navigator();

    match role_gate(&session(), &role.state(), allowed) {
        GateDecision::Pending => rsx! {},
        GateDecision::Failed => rsx! {
            document::Stylesheet { href: VIEWS_CSS }
            div {
                class: "form-error gate-error",
                span { "We couldn't load your staff role." }
                button {
                    class: "btn btn-outline",
                    onclick: move |_| role.refresh(),
                    "Try again"
                }
            }
        },
        GateDecision::Redirect(fallback) => {
            nav.replace(fallback.path());
            rsx! {}
        }
        GateDecision::Allow => rsx! {
            {children}
        },
    }
}
