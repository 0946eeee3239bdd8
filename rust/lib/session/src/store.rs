use std::sync::Arc;

use agenda_client::{AuthBackend, AuthResponse};
use agenda_core::{LoginRequest, PromoterStatus, RegisterRequest, User};
use agenda_kv::{KVStore, tokens};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::cell::{SessionCell, SubscriptionId};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::notify::Notifier;
use crate::state::SessionState;

pub const LOGIN_FAILED: &str = "Erro ao fazer login";
pub const REGISTER_OK: &str = "Conta criada com sucesso!";
pub const REGISTER_FAILED: &str = "Erro ao criar conta";
pub const LOGOUT_OK: &str = "Logout realizado com sucesso";
pub const PROMOTER_REQUEST_OK: &str = "Solicitação enviada com sucesso! Aguarde aprovação.";
pub const PROMOTER_REQUEST_FAILED: &str = "Erro ao solicitar ser promoter";

/// Owner of the session cell and the persisted token.
///
/// Operations that talk to the backend run one at a time: a second login
/// issued while the first is in flight waits for it, then runs against the
/// state the first one left.
pub struct SessionStore {
    cell: SessionCell,
    backend: Arc<dyn AuthBackend>,
    storage: Arc<dyn KVStore>,
    notifier: Arc<dyn Notifier>,
    config: SessionConfig,
    gate: Mutex<()>,
}

impl SessionStore {
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        storage: Arc<dyn KVStore>,
        notifier: Arc<dyn Notifier>,
        config: SessionConfig,
    ) -> Self {
        Self {
            cell: SessionCell::default(),
            backend,
            storage,
            notifier,
            config,
            gate: Mutex::new(()),
        }
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.cell.get()
    }

    pub fn user(&self) -> Option<User> {
        self.cell.with(|s| s.user.clone())
    }

    pub fn promoter_status(&self) -> PromoterStatus {
        self.cell.with(SessionState::promoter_status)
    }

    /// Whether a token is on disk. After `check_auth` settles unauthenticated
    /// this is true only when the backend never answered.
    pub fn has_stored_token(&self) -> bool {
        matches!(tokens::read_token(self.storage.as_ref()), Ok(Some(_)))
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        self.cell.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.cell.unsubscribe(id)
    }

    // ── Operations ──────────────────────────────────────────────────

    /// Settle the startup state from the persisted token.
    ///
    /// No token: unauthenticated. Token the backend rejects: tokens purged,
    /// unauthenticated. Backend too slow: unauthenticated, token kept for
    /// the next attempt. Safe to call again at any time.
    pub async fn check_auth(&self) -> SessionState {
        let _turn = self.gate.lock().await;

        let token = match tokens::read_token(self.storage.as_ref()) {
            Ok(token) => token,
            Err(e) => {
                error!(error = %e, "failed to read session token");
                None
            }
        };
        if token.is_none() {
            debug!("no stored token");
            self.cell.set(SessionState::unauthenticated());
            return self.cell.get();
        }

        match tokio::time::timeout(self.config.check_timeout, self.backend.current_user()).await {
            Ok(Ok(user)) => {
                info!(user = %user.id, "session restored");
                self.cell.set(SessionState::authenticated(user));
            }
            Ok(Err(e)) => {
                warn!(error = %e, "stored token rejected, clearing session");
                self.purge();
                self.cell.set(SessionState::unauthenticated());
            }
            Err(_) => {
                warn!(timeout = ?self.config.check_timeout, "session check timed out");
                self.cell.set(SessionState::unauthenticated());
            }
        }
        self.cell.get()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, SessionError> {
        let _turn = self.gate.lock().await;
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = match self.backend.login(&req).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "login failed");
                self.notifier.error(&e.user_message(LOGIN_FAILED));
                return Err(e.into());
            }
        };
        let user = self.establish(resp, LOGIN_FAILED)?;
        self.notifier.success(&format!("Bem-vindo, {}!", user.name));
        Ok(user)
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<User, SessionError> {
        let _turn = self.gate.lock().await;
        let resp = match self.backend.register(req).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "registration failed");
                self.notifier.error(&e.user_message(REGISTER_FAILED));
                return Err(e.into());
            }
        };
        let user = self.establish(resp, REGISTER_FAILED)?;
        self.notifier.success(REGISTER_OK);
        Ok(user)
    }

    /// End the session. Never fails: a backend error is only logged, and
    /// the local session is cleared either way.
    pub async fn logout(&self) {
        let _turn = self.gate.lock().await;
        if let Err(e) = self.backend.logout().await {
            warn!(error = %e, "remote logout failed");
        }
        self.purge();
        self.cell.update(SessionState::sign_out);
        self.notifier.success(LOGOUT_OK);
    }

    /// Ask to become a promoter. On success only `user` changes.
    pub async fn request_promoter(&self) -> Result<User, SessionError> {
        let _turn = self.gate.lock().await;
        match self.backend.request_promoter().await {
            Ok(outcome) => {
                let user = outcome.user;
                let next = user.clone();
                self.cell.update(move |s| s.user = Some(next));
                self.notifier
                    .success(outcome.message.as_deref().unwrap_or(PROMOTER_REQUEST_OK));
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "promoter request failed");
                self.notifier.error(&e.user_message(PROMOTER_REQUEST_FAILED));
                Err(e.into())
            }
        }
    }

    /// Replace the user directly; authenticated iff one is given. Does not
    /// settle a pending startup check.
    pub fn set_user(&self, user: Option<User>) {
        self.cell.update(move |s| match user {
            Some(user) => s.sign_in(user),
            None => s.sign_out(),
        });
    }

    // ── Internals ───────────────────────────────────────────────────

    /// Persist the token pair, then publish the authenticated state.
    fn establish(&self, resp: AuthResponse, failure: &str) -> Result<User, SessionError> {
        if let Err(e) = tokens::write_tokens(
            self.storage.as_ref(),
            &resp.token,
            resp.refresh_token.as_deref(),
        ) {
            error!(error = %e, "failed to persist session token");
            self.notifier.error(failure);
            return Err(e.into());
        }
        info!(user = %resp.user.id, "signed in");
        let user = resp.user.clone();
        self.cell.update(move |s| s.sign_in(user));
        Ok(resp.user)
    }

    fn purge(&self) {
        if let Err(e) = tokens::purge_tokens(self.storage.as_ref()) {
            error!(error = %e, "failed to clear session token");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use agenda_client::{ApiError, PromoterRequestOutcome};
    use agenda_core::normalize_user;
    use agenda_kv::MemoryStore;
    use parking_lot::Mutex as SyncMutex;
    use serde_json::json;

    use super::*;
    use crate::state::SessionPhase;

    fn user(id: &str, role: &str) -> User {
        normalize_user(&json!({"id": id, "name": "Ana", "email": "ana@exemplo.com", "role": role}), None)
            .unwrap()
    }

    fn rejected(status: u16, message: &str) -> ApiError {
        ApiError::Server {
            status,
            message: json!({ "message": message }).to_string(),
        }
    }

    /// Scripted backend. A `None` script fails with a 401.
    #[derive(Default)]
    struct FakeBackend {
        login_user: Option<User>,
        me: Option<User>,
        me_hangs: bool,
        logout_fails: bool,
        promoter: Option<User>,
        calls: SyncMutex<Vec<&'static str>>,
    }

    impl FakeBackend {
        fn record(&self, call: &'static str) {
            self.calls.lock().push(call);
        }
    }

    #[async_trait::async_trait]
    impl AuthBackend for FakeBackend {
        async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError> {
            self.record("login");
            match &self.login_user {
                Some(u) if req.password == "segredo" => Ok(AuthResponse {
                    token: "jwt".into(),
                    refresh_token: Some("refresh".into()),
                    user: u.clone(),
                }),
                _ => Err(rejected(401, "Credenciais inválidas")),
            }
        }

        async fn register(&self, _req: &RegisterRequest) -> Result<AuthResponse, ApiError> {
            self.record("register");
            match &self.login_user {
                Some(u) => Ok(AuthResponse {
                    token: "jwt-new".into(),
                    refresh_token: None,
                    user: u.clone(),
                }),
                None => Err(ApiError::Server {
                    status: 500,
                    message: "boom".into(),
                }),
            }
        }

        async fn logout(&self) -> Result<(), ApiError> {
            self.record("logout");
            if self.logout_fails {
                Err(ApiError::Auth("offline".into()))
            } else {
                Ok(())
            }
        }

        async fn current_user(&self) -> Result<User, ApiError> {
            self.record("me");
            if self.me_hangs {
                std::future::pending::<()>().await;
            }
            self.me.clone().ok_or_else(|| rejected(401, "Token inválido"))
        }

        async fn request_promoter(&self) -> Result<PromoterRequestOutcome, ApiError> {
            self.record("promoter");
            match &self.promoter {
                Some(u) => Ok(PromoterRequestOutcome {
                    message: None,
                    user: u.clone(),
                }),
                None => Err(rejected(409, "Solicitação já enviada")),
            }
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notes: SyncMutex<Vec<(bool, String)>>,
    }

    impl RecordingNotifier {
        fn last(&self) -> Option<(bool, String)> {
            self.notes.lock().last().cloned()
        }
    }

    impl Notifier for RecordingNotifier {
        fn success(&self, message: &str) {
            self.notes.lock().push((true, message.to_string()));
        }

        fn error(&self, message: &str) {
            self.notes.lock().push((false, message.to_string()));
        }
    }

    struct Harness {
        store: SessionStore,
        backend: Arc<FakeBackend>,
        storage: Arc<MemoryStore>,
        notes: Arc<RecordingNotifier>,
    }

    fn harness(backend: FakeBackend) -> Harness {
        harness_with(backend, Arc::new(MemoryStore::new()), SessionConfig::default())
    }

    fn harness_with(backend: FakeBackend, storage: Arc<MemoryStore>, config: SessionConfig) -> Harness {
        let backend = Arc::new(backend);
        let notes = Arc::new(RecordingNotifier::default());
        let store = SessionStore::new(backend.clone(), storage.clone(), notes.clone(), config);
        Harness {
            store,
            backend,
            storage,
            notes,
        }
    }

    fn stored_token(h: &Harness) -> Option<String> {
        tokens::read_token(h.storage.as_ref()).unwrap()
    }

    // ── check_auth ──────────────────────────────────────────────────

    #[tokio::test]
    async fn check_without_token_settles_unauthenticated() {
        let h = harness(FakeBackend::default());
        assert_eq!(h.store.state().phase(), SessionPhase::Loading);

        let state = h.store.check_auth().await;
        assert_eq!(state.phase(), SessionPhase::Unauthenticated);
        assert!(h.backend.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn check_with_valid_token_restores_user() {
        let h = harness(FakeBackend {
            me: Some(user("u1", "PROMOTER")),
            ..Default::default()
        });
        tokens::write_tokens(h.storage.as_ref(), "jwt", None).unwrap();

        let state = h.store.check_auth().await;
        assert_eq!(state.phase(), SessionPhase::Authenticated);
        assert_eq!(h.store.user().unwrap().id, "u1");
        assert!(h.store.promoter_status().is_pending);
    }

    #[tokio::test]
    async fn check_with_rejected_token_purges_it() {
        let h = harness(FakeBackend::default());
        tokens::write_tokens(h.storage.as_ref(), "stale", Some("r")).unwrap();

        let state = h.store.check_auth().await;
        assert_eq!(state.phase(), SessionPhase::Unauthenticated);
        assert_eq!(stored_token(&h), None);
        assert_eq!(tokens::read_refresh_token(h.storage.as_ref()).unwrap(), None);
        assert!(!h.store.has_stored_token());
    }

    #[tokio::test]
    async fn check_timeout_keeps_token() {
        let h = harness_with(
            FakeBackend {
                me_hangs: true,
                ..Default::default()
            },
            Arc::new(MemoryStore::new()),
            SessionConfig {
                check_timeout: Duration::from_millis(50),
            },
        );
        tokens::write_tokens(h.storage.as_ref(), "jwt", None).unwrap();

        let state = h.store.check_auth().await;
        assert_eq!(state.phase(), SessionPhase::Unauthenticated);
        assert_eq!(stored_token(&h).as_deref(), Some("jwt"));
        assert!(h.store.has_stored_token());
    }

    // ── login / register ────────────────────────────────────────────

    #[tokio::test]
    async fn login_persists_token_and_survives_restart() {
        let storage = Arc::new(MemoryStore::new());
        let backend = || FakeBackend {
            login_user: Some(user("u1", "USER")),
            me: Some(user("u1", "USER")),
            ..Default::default()
        };
        let h = harness_with(backend(), storage.clone(), SessionConfig::default());
        h.store.check_auth().await;

        let u = h.store.login("ana@exemplo.com", "segredo").await.unwrap();
        assert_eq!(u.id, "u1");
        assert_eq!(h.store.state().phase(), SessionPhase::Authenticated);
        assert_eq!(stored_token(&h).as_deref(), Some("jwt"));
        assert_eq!(h.notes.last(), Some((true, "Bem-vindo, Ana!".to_string())));

        // A fresh store over the same storage reaches the same state.
        let restarted = harness_with(backend(), storage, SessionConfig::default());
        let state = restarted.store.check_auth().await;
        assert_eq!(state.phase(), SessionPhase::Authenticated);
        assert_eq!(state.user.map(|u| u.id).as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn token_is_written_before_authenticated_is_published() {
        let h = harness(FakeBackend {
            login_user: Some(user("u1", "USER")),
            ..Default::default()
        });
        let storage = h.storage.clone();
        let seen = Arc::new(SyncMutex::new(Vec::new()));
        let s = seen.clone();
        h.store.subscribe(move |state| {
            if state.is_authenticated {
                s.lock().push(tokens::read_token(storage.as_ref()).unwrap());
            }
        });

        h.store.login("a@b.c", "segredo").await.unwrap();
        assert_eq!(*seen.lock(), vec![Some("jwt".to_string())]);
    }

    #[tokio::test]
    async fn login_failure_notifies_server_message_and_reraises() {
        let h = harness(FakeBackend {
            login_user: Some(user("u1", "USER")),
            ..Default::default()
        });
        h.store.check_auth().await;

        let err = h.store.login("a@b.c", "errada").await.unwrap_err();
        assert!(matches!(err, SessionError::Api(ref e) if e.is_unauthorized()));
        assert_eq!(h.notes.last(), Some((false, "Credenciais inválidas".to_string())));
        assert_eq!(h.store.state().phase(), SessionPhase::Unauthenticated);
        assert_eq!(stored_token(&h), None);
    }

    #[tokio::test]
    async fn register_failure_without_message_uses_fallback() {
        let h = harness(FakeBackend::default());
        let req = RegisterRequest {
            name: "Ana".into(),
            email: "a@b.c".into(),
            password: "segredo".into(),
        };
        assert!(h.store.register(&req).await.is_err());
        assert_eq!(h.notes.last(), Some((false, REGISTER_FAILED.to_string())));
    }

    #[tokio::test]
    async fn register_success_clears_old_refresh_token() {
        let h = harness(FakeBackend {
            login_user: Some(user("u2", "USER")),
            ..Default::default()
        });
        tokens::write_tokens(h.storage.as_ref(), "old", Some("old-refresh")).unwrap();
        let req = RegisterRequest {
            name: "Ana".into(),
            email: "a@b.c".into(),
            password: "segredo".into(),
        };
        h.store.register(&req).await.unwrap();
        assert_eq!(stored_token(&h).as_deref(), Some("jwt-new"));
        assert_eq!(tokens::read_refresh_token(h.storage.as_ref()).unwrap(), None);
        assert_eq!(h.notes.last(), Some((true, REGISTER_OK.to_string())));
    }

    #[tokio::test]
    async fn concurrent_logins_run_one_at_a_time() {
        let h = harness(FakeBackend {
            login_user: Some(user("u1", "USER")),
            ..Default::default()
        });
        h.store.check_auth().await;
        let (a, b) = tokio::join!(
            h.store.login("a@b.c", "segredo"),
            h.store.login("a@b.c", "segredo")
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(*h.backend.calls.lock(), vec!["login", "login"]);
        assert_eq!(h.store.state().phase(), SessionPhase::Authenticated);
    }

    // ── logout ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn logout_with_failing_backend_still_clears_session() {
        let h = harness(FakeBackend {
            login_user: Some(user("u1", "USER")),
            logout_fails: true,
            ..Default::default()
        });
        h.store.check_auth().await;
        h.store.login("a@b.c", "segredo").await.unwrap();

        h.store.logout().await;
        assert_eq!(h.store.state().phase(), SessionPhase::Unauthenticated);
        assert_eq!(h.store.user(), None);
        assert_eq!(stored_token(&h), None);
        assert_eq!(h.notes.last(), Some((true, LOGOUT_OK.to_string())));
    }

    // ── promoter request / set_user ─────────────────────────────────

    #[tokio::test]
    async fn promoter_request_replaces_only_user() {
        let mut pending = user("u1", "USER");
        pending.promoter_status = Some(agenda_core::PromoterReview::Pending);
        let h = harness(FakeBackend {
            login_user: Some(user("u1", "USER")),
            promoter: Some(pending.clone()),
            ..Default::default()
        });
        h.store.login("a@b.c", "segredo").await.unwrap();

        let u = h.store.request_promoter().await.unwrap();
        assert_eq!(u, pending);
        let state = h.store.state();
        assert!(state.is_authenticated);
        assert_eq!(state.user, Some(pending));
        assert_eq!(h.notes.last(), Some((true, PROMOTER_REQUEST_OK.to_string())));
    }

    #[tokio::test]
    async fn promoter_request_failure_keeps_state() {
        let h = harness(FakeBackend {
            login_user: Some(user("u1", "USER")),
            ..Default::default()
        });
        h.store.login("a@b.c", "segredo").await.unwrap();
        let before = h.store.state();

        assert!(h.store.request_promoter().await.is_err());
        assert_eq!(h.store.state(), before);
        assert_eq!(h.notes.last(), Some((false, "Solicitação já enviada".to_string())));
    }

    #[tokio::test]
    async fn set_user_toggles_authentication() {
        let h = harness(FakeBackend::default());
        h.store.check_auth().await;
        h.store.set_user(Some(user("a1", "ADMIN")));
        assert_eq!(h.store.state().phase(), SessionPhase::Authenticated);
        assert!(h.store.promoter_status().can_create_events);

        h.store.set_user(None);
        assert_eq!(h.store.state().phase(), SessionPhase::Unauthenticated);
    }

    #[tokio::test]
    async fn only_check_auth_settles_loading() {
        let h = harness(FakeBackend {
            login_user: Some(user("u1", "USER")),
            me: Some(user("u1", "USER")),
            ..Default::default()
        });

        h.store.set_user(Some(user("a1", "ADMIN")));
        let state = h.store.state();
        assert!(state.is_authenticated);
        assert_eq!(state.phase(), SessionPhase::Loading);
        assert_eq!(
            crate::guard(&state, crate::Requirement::Any),
            crate::Access::Loading
        );

        h.store.login("a@b.c", "segredo").await.unwrap();
        assert_eq!(h.store.state().phase(), SessionPhase::Loading);

        h.store.logout().await;
        assert_eq!(h.store.state().phase(), SessionPhase::Loading);
        assert!(!h.store.state().is_authenticated);

        h.store.login("a@b.c", "segredo").await.unwrap();
        assert_eq!(h.store.check_auth().await.phase(), SessionPhase::Authenticated);
    }
}
