use std::sync::Arc;

use agenda_kv::{KVStore, tokens};

use crate::error::ApiError;

/// Pluggable token provider. Called before every API request.
///
/// Returns `Ok(None)` to skip the Authorization header (anonymous).
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn token(&self) -> Result<Option<String>, ApiError>;
}

/// No authentication: anonymous requests.
pub struct NoAuth;

#[async_trait::async_trait]
impl TokenSource for NoAuth {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(None)
    }
}

/// Static bearer token (already obtained externally).
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait::async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(Some(self.0.clone()))
    }
}

/// Reads the persisted session token on every request, so a login or
/// logout done by the session layer applies to the very next call.
pub struct StoredToken {
    store: Arc<dyn KVStore>,
}

impl StoredToken {
    pub fn new(store: Arc<dyn KVStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl TokenSource for StoredToken {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        tokens::read_token(self.store.as_ref()).map_err(|e| ApiError::Auth(e.to_string()))
    }
}
