use dioxus::prelude::*;
use ui::views::{LoginView, RegisterView};

#[component]
pub fn Login() -> Element {
    rsx! {
        LoginView {}
    }
}

#[component]
pub fn Register() -> Element {
    rsx! {
        RegisterView {}
    }
}
