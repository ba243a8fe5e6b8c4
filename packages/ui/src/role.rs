//! Role context: the resolved role of the signed-in user.
//!
//! Resolution re-runs whenever the session signal changes and on
//! [`RoleHandle::refresh`]. A failed resolution is logged and kept as
//! [`RoleState::failed`]; role gates then show a retry instead of
//! redirecting.

use dioxus::prelude::*;
use studio::{RoleName, RoleState};

use crate::session::use_session;

#[derive(Clone, Copy)]
pub struct RoleHandle {
    state: Signal<RoleState>,
    resolution: Resource<()>,
}

impl RoleHandle {
    pub fn state(&self) -> RoleState {
        (self.state)()
    }

    pub fn role(&self) -> Option<RoleName> {
        self.state().role
    }

    /// Resolve again without waiting for a session change.
    pub fn refresh(mut self) {
        self.resolution.restart();
    }
}

pub fn use_role() -> RoleHandle {
    use_context::<RoleHandle>()
}

#[component]
pub fn RoleProvider(children: Element) -> Element {
    let session = use_session();
    let mut state = use_signal(RoleState::pending);

    let resolution = use_resource(move || async move {
        let current = session();
        if current.loading {
            state.set(RoleState::pending());
            return;
        }
        if current.user.is_none() {
            state.set(RoleState::resolved(None));
            return;
        }

        state.set(RoleState::pending());
        match api::resolve_role().await {
            Ok(Some(role)) => state.set(RoleState::resolved(Some(role))),
            // The server no longer sees the session this client signed in with.
            Ok(None) => {
                tracing::warn!("Role resolution found no session");
                state.set(RoleState::failed());
            }
            Err(e) => {
                tracing::error!("Role resolution failed: {e}");
                state.set(RoleState::failed());
            }
        }
    });

    use_context_provider(|| RoleHandle { state, resolution });

    rsx! {
        {children}
    }
}
