//! Session context: who is signed in.

use dioxus::prelude::*;
use studio::{SessionState, SessionUser};

/// Current session. Updates on sign-in and sign-out.
pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

/// Loads the session once on mount and provides it to every descendant.
#[component]
pub fn SessionProvider(children: Element) -> Element {
    let mut session = use_signal(SessionState::default);

    let _ = use_resource(move || async move {
        match api::get_current_user().await {
            Ok(Some(user)) => session.set(SessionState::signed_in(user)),
            Ok(None) => session.set(SessionState::signed_out()),
            Err(e) => {
                tracing::error!("Failed to load session: {e}");
                session.set(SessionState::signed_out());
            }
        }
    });

    use_context_provider(|| session);

    rsx! {
        {children}
    }
}

/// Record a successful sign-in made by a login or register form.
pub fn sign_in(mut session: Signal<SessionState>, user: SessionUser) {
    session.set(SessionState::signed_in(user));
}

/// End the session on the server and locally.
pub async fn sign_out(mut session: Signal<SessionState>) {
    if let Err(e) = api::logout().await {
        tracing::error!("Logout failed: {e}");
        return;
    }
    session.set(SessionState::signed_out());
}
