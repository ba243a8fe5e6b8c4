//! Sign-in and registration screens.

use dioxus::prelude::*;
use studio::gate::DASHBOARD_PATH;

use crate::icons::FaGoogle;
use crate::session::{sign_in, use_session};
use crate::branding::use_studio_name;
use crate::Icon;

const VIEWS_CSS: Asset = asset!("/assets/styling/views.css");
const AFTER_SIGN_IN: &str = DASHBOARD_PATH;

/// Send an already signed-in viewer to the dashboard.
fn use_signed_in_redirect() {
    let session = use_session();
    let nav = use_navigator();
    let state = session();
    if !state.loading && state.is_authenticated() {
        nav.replace(AFTER_SIGN_IN);
    }
}

/// Starts the Google OAuth flow by navigating the browser to the consent page.
#[component]
pub fn GoogleButton(#[props(default = "Continue with Google".to_string())] label: String) -> Element {
    let mut loading = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let onclick = move |_| async move {
        loading.set(true);
        error.set(None);
        match api::get_login_url("google".to_string()).await {
            Ok(url) => {
                #[cfg(target_arch = "wasm32")]
                {
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().set_href(&url);
                    }
                }
                #[cfg(not(target_arch = "wasm32"))]
                tracing::debug!("Google consent URL: {url}");
            }
            Err(e) => {
                tracing::error!("Failed to get login URL: {e}");
                error.set(Some("Google sign-in is unavailable right now.".to_string()));
                loading.set(false);
            }
        }
    };

    rsx! {
        button {
            class: "btn btn-google",
            r#type: "button",
            disabled: loading(),
            onclick: onclick,
            Icon { icon: FaGoogle, width: 16, height: 16 }
            if loading() { "Redirecting…" } else { "{label}" }
        }
        if let Some(err) = error() {
            p { class: "form-error", "{err}" }
        }
    }
}

#[component]
pub fn LoginView() -> Element {
    use_signed_in_redirect();

    let studio_name = use_studio_name();

    let session = use_session();
    let nav = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        spawn(async move {
            error.set(None);
            loading.set(true);
            match api::login_password(email(), password()).await {
                Ok(user) => {
                    sign_in(session, user);
                    nav.replace(AFTER_SIGN_IN);
                }
                Err(e) => {
                    loading.set(false);
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    rsx! {
        document::Stylesheet { href: VIEWS_CSS }
        div {
            class: "auth-page",
            div {
                class: "card auth-card",
                h1 { class: "auth-title", "{studio_name}" }
                p { class: "view-muted", "Sign in to the studio dashboard" }

                form {
                    class: "auth-form",
                    onsubmit: handle_login,

                    if let Some(err) = error() {
                        div { class: "form-error", "{err}" }
                    }

                    input {
                        class: "input",
                        r#type: "email",
                        placeholder: "Email",
                        value: email(),
                        oninput: move |evt| email.set(evt.value()),
                    }
                    input {
                        class: "input",
                        r#type: "password",
                        placeholder: "Password",
                        value: password(),
                        oninput: move |evt| password.set(evt.value()),
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "submit",
                        disabled: loading(),
                        if loading() { "Signing in…" } else { "Sign in" }
                    }
                }

                div { class: "auth-divider", span { "or" } }
                GoogleButton {}

                p {
                    class: "auth-footer",
                    "No account yet? "
                    Link { to: "/register", "Create one" }
                }
            }
        }
    }
}

#[component]
pub fn RegisterView() -> Element {
    use_signed_in_redirect();

    let session = use_session();
    let nav = use_navigator();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        spawn(async move {
            error.set(None);

            if password() != confirm() {
                error.set(Some("Passwords do not match".to_string()));
                return;
            }

            loading.set(true);
            match api::register(email(), password(), name()).await {
                Ok(user) => {
                    sign_in(session, user);
                    nav.replace(AFTER_SIGN_IN);
                }
                Err(e) => {
                    loading.set(false);
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    rsx! {
        document::Stylesheet { href: VIEWS_CSS }
        div {
            class: "auth-page",
            div {
                class: "card auth-card",
                h1 { class: "auth-title", "Create account" }

                form {
                    class: "auth-form",
                    onsubmit: handle_register,

                    if let Some(err) = error() {
                        div { class: "form-error", "{err}" }
                    }

                    input {
                        class: "input",
                        r#type: "text",
                        placeholder: "Name",
                        value: name(),
                        oninput: move |evt| name.set(evt.value()),
                    }
                    input {
                        class: "input",
                        r#type: "email",
                        placeholder: "Email",
                        value: email(),
                        oninput: move |evt| email.set(evt.value()),
                    }
                    input {
                        class: "input",
                        r#type: "password",
                        placeholder: "Password (min 8 characters)",
                        value: password(),
                        oninput: move |evt| password.set(evt.value()),
                    }
                    input {
                        class: "input",
                        r#type: "password",
                        placeholder: "Confirm password",
                        value: confirm(),
                        oninput: move |evt| confirm.set(evt.value()),
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "submit",
                        disabled: loading(),
                        if loading() { "Creating account…" } else { "Sign up" }
                    }
                }

                p {
                    class: "auth-footer",
                    "Already have an account? "
                    Link { to: "/login", "Sign in" }
                }
            }
        }
    }
}
