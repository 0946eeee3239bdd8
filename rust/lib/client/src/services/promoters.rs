use agenda_core::{User, normalize_user, normalize_users};
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::shape::listing;

/// Result of asking to become a promoter.
#[derive(Debug, Clone, PartialEq)]
pub struct PromoterRequestOutcome {
    /// Server's confirmation text, when it sent one.
    pub message: Option<String>,
    pub user: User,
}

/// `/promoters`
pub struct Promoters<'a> {
    api: &'a ApiClient,
}

impl<'a> Promoters<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Promoter requests awaiting review (admin).
    pub async fn pending(&self) -> Result<Vec<User>, ApiError> {
        let body = self.api.get("/promoters/pendentes").await?;
        Ok(normalize_users(&listing(body, "promoters").items))
    }

    pub async fn request(&self) -> Result<PromoterRequestOutcome, ApiError> {
        let body = self.api.post_empty("/promoters/solicitar").await?;
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string);
        let user = body
            .get("user")
            .and_then(|u| normalize_user(u, None))
            .ok_or_else(|| ApiError::Decode("promoter request: missing user".into()))?;
        Ok(PromoterRequestOutcome { message, user })
    }

    pub async fn approve(&self, user_id: &str) -> Result<User, ApiError> {
        user(self.api.post_empty(&format!("/promoters/{user_id}/aprovar")).await?)
    }

    pub async fn reject(&self, user_id: &str) -> Result<User, ApiError> {
        user(self.api.post_empty(&format!("/promoters/{user_id}/rejeitar")).await?)
    }
}

fn user(body: Value) -> Result<User, ApiError> {
    normalize_user(&body, None).ok_or_else(|| ApiError::Decode("user: not an object".into()))
}
