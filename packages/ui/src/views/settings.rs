//! Settings: staff role assignments.
//!
//! New accounts start as artists (the very first account is admin). Admins
//! promote staff here; the admin's own role state is refreshed after every
//! change so navigation updates without a reload.

use dioxus::prelude::*;
use studio::{RoleName, UserRoleRecord};

use crate::role::use_role;
use crate::session::use_session;

const VIEWS_CSS: Asset = asset!("/assets/styling/views.css");

#[component]
pub fn SettingsView() -> Element {
    let role = use_role();
    let session = use_session();
    let mut records = use_resource(|| async move { api::list_role_records().await });
    let mut status = use_signal(|| Option::<Result<String, String>>::None);

    let change_role = move |(record, new_role): (UserRoleRecord, RoleName)| {
        spawn(async move {
            status.set(None);
            match api::set_role(record.uid.clone(), new_role).await {
                Ok(()) => {
                    let who = if record.name.is_empty() { record.email } else { record.name };
                    status.set(Some(Ok(format!("{who} is now {}", new_role.label()))));
                    records.restart();
                    role.refresh();
                }
                Err(e) => status.set(Some(Err(e.to_string()))),
            }
        });
    };

    let me = session().user.map(|u| u.id);
    let loaded: Option<Result<Vec<UserRoleRecord>, String>> = match &*records.read() {
        None => None,
        Some(Ok(list)) => Some(Ok(list.clone())),
        Some(Err(e)) => Some(Err(e.to_string())),
    };

    rsx! {
        document::Stylesheet { href: VIEWS_CSS }
        div {
            class: "view-page",
            h1 { class: "view-title", "Settings" }

            section {
                class: "card",
                h2 { class: "card-title", "Staff roles" }
                p {
                    class: "view-muted",
                    "Admins see everything. Reception handles leads, clients and messages. Artists see the dashboard only."
                }

                match status() {
                    Some(Ok(msg)) => rsx! { p { class: "save-status success", "{msg}" } },
                    Some(Err(msg)) => rsx! { div { class: "form-error", "{msg}" } },
                    None => rsx! {},
                }

                match loaded {
                    None => rsx! { p { class: "view-muted", "Loading staff…" } },
                    Some(Err(e)) => rsx! { div { class: "form-error", "{e}" } },
                    Some(Ok(list)) => rsx! {
                        table {
                            class: "table",
                            thead {
                                tr {
                                    th { "Name" }
                                    th { "Email" }
                                    th { "Role" }
                                }
                            }
                            tbody {
                                for record in list {
                                    StaffRow {
                                        key: "{record.uid}",
                                        is_self: me.as_deref() == Some(record.uid.as_str()),
                                        record: record.clone(),
                                        on_change: change_role,
                                    }
                                }
                            }
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn StaffRow(
    record: UserRoleRecord,
    is_self: bool,
    on_change: EventHandler<(UserRoleRecord, RoleName)>,
) -> Element {
    let current = record.role;
    let display = if record.name.is_empty() { "-".to_string() } else { record.name.clone() };

    rsx! {
        tr {
            td {
                class: "table-strong",
                "{display}"
                if is_self {
                    span { class: "view-muted", " (you)" }
                }
            }
            td { "{record.email}" }
            td {
                select {
                    class: "input",
                    value: current.as_str(),
                    onchange: move |evt| {
                        if let Ok(role) = evt.value().parse::<RoleName>() {
                            if role != current {
                                on_change.call((record.clone(), role));
                            }
                        }
                    },
                    for option_role in RoleName::ALL {
                        option {
                            value: option_role.as_str(),
                            selected: option_role == current,
                            "{option_role.label()}"
                        }
                    }
                }
            }
        }
    }
}
