use agenda_core::{LoginRequest, RegisterRequest, User, normalize_user};
use serde::Deserialize;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Token pair plus the normalized user, as returned by login/register.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: Option<String>,
    pub user: User,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthPayload {
    token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: Value,
    #[serde(default)]
    permissions: Option<Vec<String>>,
}

impl AuthPayload {
    fn into_response(self) -> Result<AuthResponse, ApiError> {
        if self.token.is_empty() {
            return Err(ApiError::Decode("auth response: empty token".into()));
        }
        let user = normalize_user(&self.user, self.permissions.as_deref())
            .ok_or_else(|| ApiError::Decode("auth response: user is not an object".into()))?;
        Ok(AuthResponse {
            token: self.token,
            refresh_token: self.refresh_token.filter(|t| !t.is_empty()),
            user,
        })
    }
}

/// `/entrar` and `/auth`.
pub struct Auth<'a> {
    api: &'a ApiClient,
}

impl<'a> Auth<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let body = self.api.post("/entrar", req).await?;
        decode_auth(body)
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let body = self.api.post("/entrar/registrar", req).await?;
        decode_auth(body)
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.api.post_empty("/auth/logout").await.map(|_| ())
    }

    /// The user the current token belongs to. Permission tags are those
    /// the record carries, else inferred from its role.
    pub async fn me(&self) -> Result<User, ApiError> {
        let body = self.api.get("/auth/me").await?;
        normalize_user(&body, None)
            .ok_or_else(|| ApiError::Decode("current user: not an object".into()))
    }
}

fn decode_auth(body: Value) -> Result<AuthResponse, ApiError> {
    serde_json::from_value::<AuthPayload>(body)
        .map_err(|e| ApiError::Decode(format!("auth response: {e}")))?
        .into_response()
}
