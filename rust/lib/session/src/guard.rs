//! Route protection: whether a screen may render for the current session.

use agenda_core::{is_admin, is_promoter};

use crate::state::SessionState;

pub const LOGIN_ROUTE: &str = "/login";
pub const HOME_ROUTE: &str = "/";

/// What a protected screen needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Requirement {
    /// Any logged-in user.
    #[default]
    Any,
    Promoter,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Session still settling; show a spinner.
    Loading,
    RedirectLogin,
    RedirectHome,
    Allowed,
}

impl Access {
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            Access::RedirectLogin => Some(LOGIN_ROUTE),
            Access::RedirectHome => Some(HOME_ROUTE),
            Access::Loading | Access::Allowed => None,
        }
    }
}

/// Decide access. Checks run in order: loading, authenticated, role.
pub fn guard(state: &SessionState, requirement: Requirement) -> Access {
    if state.is_loading {
        return Access::Loading;
    }
    if !state.is_authenticated {
        return Access::RedirectLogin;
    }
    let user = state.user.as_ref();
    let allowed = match requirement {
        Requirement::Any => true,
        Requirement::Promoter => is_promoter(user),
        Requirement::Admin => is_admin(user),
    };
    if allowed { Access::Allowed } else { Access::RedirectHome }
}
