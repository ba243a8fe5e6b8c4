//! Render / redirect decisions for protected views.
//!
//! Both gates are pure functions of the current state so they are
//! re-evaluated on every render and never cache a decision across a role
//! change.

use crate::role::{RoleName, RoleState};
use crate::session::SessionState;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Where a denied viewer is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Not signed in.
    Login,
    /// Signed in but not allowed here.
    Dashboard,
}

impl Fallback {
    pub fn path(self) -> &'static str {
        match self {
            Fallback::Login => LOGIN_PATH,
            Fallback::Dashboard => DASHBOARD_PATH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// State is still loading: render nothing and do not redirect yet.
    Pending,
    Redirect(Fallback),
    Allow,
    /// Signed in, but the role could not be resolved. Stay put and offer a
    /// retry; redirecting would bounce between login and the dashboard.
    Failed,
}

/// Gate that only requires a signed-in user.
pub fn session_gate(session: &SessionState) -> GateDecision {
    if session.loading {
        GateDecision::Pending
    } else if session.user.is_none() {
        GateDecision::Redirect(Fallback::Login)
    } else {
        GateDecision::Allow
    }
}

/// Gate that requires a signed-in user whose resolved role is one of
/// `allowed`.
///
/// Only a signed-out session is sent to the login page. A signed-in user
/// with no role yet is still waiting for resolution to catch up with the
/// session (for example right after sign-in).
pub fn role_gate(session: &SessionState, role: &RoleState, allowed: &[RoleName]) -> GateDecision {
    match session_gate(session) {
        GateDecision::Allow => {}
        other => return other,
    }
    if role.loading {
        return GateDecision::Pending;
    }
    if role.failed {
        return GateDecision::Failed;
    }
    match role.role {
        None => GateDecision::Pending,
        Some(r) if allowed.contains(&r) => GateDecision::Allow,
        Some(_) => GateDecision::Redirect(Fallback::Dashboard),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionUser;

    fn signed_in() -> SessionState {
        SessionState::signed_in(SessionUser {
            id: "1".to_string(),
            email: "a@b.test".to_string(),
            name: None,
            avatar_url: None,
            provider: "local".to_string(),
        })
    }

    #[test]
    fn admin_only_gate_redirects_artist_to_dashboard() {
        let decision = role_gate(
            &signed_in(),
            &RoleState::resolved(Some(RoleName::Artist)),
            &[RoleName::Admin],
        );
        assert_eq!(decision, GateDecision::Redirect(Fallback::Dashboard));
        assert_eq!(Fallback::Dashboard.path(), "/dashboard");
    }

    #[test]
    fn loading_role_is_pending_not_redirected() {
        assert_eq!(
            role_gate(&signed_in(), &RoleState::pending(), &[RoleName::Admin]),
            GateDecision::Pending
        );
        assert_eq!(
            role_gate(&SessionState::default(), &RoleState::resolved(None), &[RoleName::Admin]),
            GateDecision::Pending
        );
    }

    #[test]
    fn signed_out_viewer_redirects_to_login() {
        let decision = role_gate(
            &SessionState::signed_out(),
            &RoleState::resolved(None),
            &[RoleName::Admin],
        );
        assert_eq!(decision, GateDecision::Redirect(Fallback::Login));
        assert_eq!(Fallback::Login.path(), "/login");
    }

    #[test]
    fn failed_resolution_stays_on_the_page() {
        let everyone = RoleName::ALL;
        let decision = role_gate(&signed_in(), &RoleState::failed(), &everyone);
        assert_eq!(decision, GateDecision::Failed);
    }

    #[test]
    fn role_not_yet_resolved_for_new_session_is_pending() {
        // Role state still reflects the signed-out session that preceded
        // sign-in.
        let everyone = RoleName::ALL;
        assert_eq!(
            role_gate(&signed_in(), &RoleState::resolved(None), &everyone),
            GateDecision::Pending
        );
    }

    #[test]
    fn signed_in_dashboard_never_redirects_to_login() {
        // The login page sends any authenticated viewer to the dashboard, so
        // the dashboard must not send them back.
        let session = signed_in();
        assert!(session.is_authenticated());

        let dashboard = RoleName::ALL;
        for role in [
            RoleState::pending(),
            RoleState::failed(),
            RoleState::resolved(None),
            RoleState::resolved(Some(RoleName::Admin)),
            RoleState::resolved(Some(RoleName::Reception)),
            RoleState::resolved(Some(RoleName::Artist)),
        ] {
            assert_ne!(
                role_gate(&session, &role, &dashboard),
                GateDecision::Redirect(Fallback::Login),
                "{role:?}"
            );
        }
    }

    #[test]
    fn member_of_allow_list_is_allowed() {
        let allowed = [RoleName::Admin, RoleName::Reception];
        assert_eq!(
            role_gate(&signed_in(), &RoleState::resolved(Some(RoleName::Reception)), &allowed),
            GateDecision::Allow
        );
        assert_eq!(
            role_gate(&signed_in(), &RoleState::resolved(Some(RoleName::Admin)), &allowed),
            GateDecision::Allow
        );
    }

    #[test]
    fn empty_allow_list_denies_everyone() {
        assert_eq!(
            role_gate(&signed_in(), &RoleState::resolved(Some(RoleName::Admin)), &[]),
            GateDecision::Redirect(Fallback::Dashboard)
        );
    }

    #[test]
    fn decision_follows_role_changes() {
        let allowed = [RoleName::Admin];
        let session = signed_in();
        let mut state = RoleState::resolved(Some(RoleName::Admin));
        assert_eq!(role_gate(&session, &state, &allowed), GateDecision::Allow);
        state.role = Some(RoleName::Artist);
        assert_eq!(
            role_gate(&session, &state, &allowed),
            GateDecision::Redirect(Fallback::Dashboard)
        );
    }

    #[test]
    fn session_gate_states() {
        assert_eq!(session_gate(&SessionState::default()), GateDecision::Pending);
        assert_eq!(
            session_gate(&SessionState::signed_out()),
            GateDecision::Redirect(Fallback::Login)
        );
        assert_eq!(session_gate(&signed_in()), GateDecision::Allow);
    }
}
