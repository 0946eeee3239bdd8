//! Wiring shared by every command: storage, API client, session.

use std::path::Path;
use std::sync::Arc;

use agenda_client::{ApiClient, StoredToken};
use agenda_kv::{KVStore, RedbStore};
use agenda_session::{
    Access, Notifier, Requirement, SessionState, SessionStore, TracingNotifier, guard,
};
use anyhow::Result;

use crate::commands::output::Output;
use crate::config::ClientConfig;

/// Prints notifications for a person at a terminal.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("{message}");
    }
}

pub struct App {
    pub api: Arc<ApiClient>,
    pub session: SessionStore,
    pub output: Output,
}

impl App {
    pub fn open(config_path: &Path, output: Output) -> Result<Self> {
        let config = ClientConfig::load(config_path)?;
        let storage_path = config.storage_path(config_path);
        let storage: Arc<dyn KVStore> = Arc::new(
            RedbStore::open(&storage_path)
                .map_err(|e| anyhow::anyhow!("failed to open session storage: {}", e))?,
        );

        let api = Arc::new(ApiClient::new(
            config.client_options(),
            Arc::new(StoredToken::new(storage.clone())),
        ));
        // JSON output keeps stdout machine-readable; notices go to the log.
        let notifier: Arc<dyn Notifier> = match output {
            Output::Json => Arc::new(TracingNotifier),
            Output::Table => Arc::new(ConsoleNotifier),
        };
        let session = SessionStore::new(api.clone(), storage, notifier, config.session_config());

        Ok(Self {
            api,
            session,
            output,
        })
    }

    /// Restore the session and make sure it satisfies `requirement`.
    pub async fn require(&self, requirement: Requirement) -> Result<SessionState> {
        let state = self.session.check_auth().await;
        let access = guard(&state, requirement);
        match denial(access, requirement, self.session.has_stored_token()) {
            None => Ok(state),
            Some(message) => anyhow::bail!(message),
        }
    }
}

/// Message for a refused command, `None` when access is allowed.
/// `token_kept` separates a slow server from a missing login.
fn denial(access: Access, requirement: Requirement, token_kept: bool) -> Option<&'static str> {
    match access {
        Access::Allowed => None,
        Access::RedirectLogin if token_kept => {
            Some("The server did not answer; your saved login was kept. Try again.")
        }
        Access::RedirectLogin => Some("Not logged in. Run `agenda login`."),
        Access::RedirectHome => Some(match requirement {
            Requirement::Admin => "This command requires an admin account.",
            _ => "This command requires a promoter account.",
        }),
        Access::Loading => Some("Session is still loading."),
    }
}
