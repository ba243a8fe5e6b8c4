use dioxus::prelude::*;

use crate::role::use_role;
use crate::session::use_session;

const VIEWS_CSS: Asset = asset!("/assets/styling/views.css");

#[component]
fn StatCard(label: &'static str, value: String, hint: &'static str) -> Element {
    rsx! {
        div {
            class: "card stat-card",
            span { class: "stat-label", "{label}" }
            span { class: "stat-value", "{value}" }
            span { class: "view-muted", "{hint}" }
        }
    }
}

/// Landing page for every signed-in role.
#[component]
pub fn DashboardView() -> Element {
    let session = use_session();
    let role = use_role();

    let greeting = session()
        .user
        .map(|u| format!("Welcome back, {}", u.display_name()))
        .unwrap_or_else(|| "Welcome".to_string());

    rsx! {
        document::Stylesheet { href: VIEWS_CSS }
        div {
            class: "view-page",
            h1 { class: "view-title", "Dashboard" }
            p {
                class: "view-muted",
                "{greeting}"
                if let Some(role) = role.role() {
                    " · "
                    span { class: "role-badge role-{role}", "{role.label()}" }
                }
            }

            div {
                class: "stat-grid",
                StatCard { label: "Leads today", value: "0", hint: "New enquiries since midnight" }
                StatCard { label: "Bookings this week", value: "0", hint: "Confirmed sessions" }
                StatCard { label: "Revenue this month", value: "$0", hint: "Completed sales" }
            }

            div {
                class: "card",
                h2 { class: "card-title", "Getting started" }
                ul {
                    class: "getting-started",
                    li { "Add your artists and their commission rates under Artists." }
                    li { "Give front desk staff the Reception role in Settings." }
                    li { "Leads, clients and messages will appear here as they arrive." }
                }
            }
        }
    }
}
