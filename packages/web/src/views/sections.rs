//! One component per signed-in route. Each page is wrapped in a role gate
//! using the roles of its navigation entry, so the menu and the page agree.

use dioxus::prelude::*;
use ui::views::{ArtistsView, DashboardView, SectionPlaceholder, SettingsView};
use ui::RoleGate;

use super::allowed_roles;
use crate::Route;

#[component]
pub fn Dashboard() -> Element {
    rsx! {
        RoleGate { allowed: allowed_roles(Route::Dashboard {}),
            DashboardView {}
        }
    }
}

#[component]
pub fn Artists() -> Element {
    rsx! {
        RoleGate { allowed: allowed_roles(Route::Artists {}),
            ArtistsView {}
        }
    }
}

#[component]
pub fn Settings() -> Element {
    rsx! {
        RoleGate { allowed: allowed_roles(Route::Settings {}),
            SettingsView {}
        }
    }
}

#[component]
pub fn Leads() -> Element {
    rsx! {
        RoleGate { allowed: allowed_roles(Route::Leads {}),
            SectionPlaceholder {
                title: "Leads",
                description: "Enquiries from the website and walk-ins, ready to be followed up.",
            }
        }
    }
}

#[component]
pub fn Clients() -> Element {
    rsx! {
        RoleGate { allowed: allowed_roles(Route::Clients {}),
            SectionPlaceholder {
                title: "Clients",
                description: "Client records, consent forms and booking history.",
            }
        }
    }
}

#[component]
pub fn Sales() -> Element {
    rsx! {
        RoleGate { allowed: allowed_roles(Route::Sales {}),
            SectionPlaceholder {
                title: "Sales",
                description: "Deposits, payments and artist commission reports.",
            }
        }
    }
}

#[component]
pub fn Messages() -> Element {
    rsx! {
        RoleGate { allowed: allowed_roles(Route::Messages {}),
            SectionPlaceholder {
                title: "Messages",
                description: "Conversations with clients across social channels.",
            }
        }
    }
}

#[component]
pub fn Emails() -> Element {
    rsx! {
        RoleGate { allowed: allowed_roles(Route::Emails {}),
            SectionPlaceholder {
                title: "Emails",
                description: "The studio inbox and booking confirmations.",
            }
        }
    }
}
