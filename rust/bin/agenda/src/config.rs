//! Client configuration.
//!
//! Reads/writes `~/.agenda/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use agenda_client::{ClientOptions, DEFAULT_BASE_URL};
use agenda_session::SessionConfig;
use serde::{Deserialize, Serialize};

/// Client configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL (e.g. "http://localhost:3000/api").
    #[serde(default = "default_server")]
    pub server: String,

    /// Session database holding the login token.
    /// Empty means `session.redb` next to this file.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub storage: String,

    /// Extra attempts for failed reads.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Seconds to wait for the server when restoring a session.
    #[serde(default = "default_check_timeout")]
    pub check_timeout_secs: u64,
}

fn default_server() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_retries() -> u32 {
    ClientOptions::default().retries
}

fn default_check_timeout() -> u64 {
    SessionConfig::default().check_timeout.as_secs()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: String::new(),
            retries: default_retries(),
            check_timeout_secs: default_check_timeout(),
        }
    }
}

impl ClientConfig {
    /// Default config file path: ~/.agenda/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to disk.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Where the session database lives for a config loaded from `config_path`.
    pub fn storage_path(&self, config_path: &Path) -> PathBuf {
        if !self.storage.is_empty() {
            return PathBuf::from(&self.storage);
        }
        config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(dirs_path)
            .join("session.redb")
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.server.clone(),
            retries: self.retries,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            check_timeout: Duration::from_secs(self.check_timeout_secs),
        }
    }
}

/// Return the Agenda config directory (~/.agenda).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".agenda")
}
