use agenda_core::{PromoterStatus, User, get_promoter_status};
use serde::Serialize;

/// Snapshot of the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    /// True until the startup check has settled.
    pub is_loading: bool,
}

/// The three states the session moves between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    Loading,
    Authenticated,
    Unauthenticated,
}

impl SessionState {
    pub fn loading() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: true,
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: false,
        }
    }

    pub fn authenticated(user: User) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
            is_loading: false,
        }
    }

    /// Mark `user` as signed in. `is_loading` is left alone; only the
    /// startup check settles it.
    pub fn sign_in(&mut self, user: User) {
        self.user = Some(user);
        self.is_authenticated = true;
    }

    pub fn sign_out(&mut self) {
        self.user = None;
        self.is_authenticated = false;
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_loading {
            SessionPhase::Loading
        } else if self.is_authenticated {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        }
    }

    pub fn promoter_status(&self) -> PromoterStatus {
        get_promoter_status(self.user.as_ref())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::loading()
    }
}
