use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::services::auth::Auth;
use crate::services::eventos::Eventos;
use crate::services::inscricoes::Inscricoes;
use crate::services::promoters::Promoters;
use crate::services::saved::EventosSalvos;
use crate::services::stats::Stats;
use crate::token::TokenSource;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Connection settings.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// API root; resource paths (`/eventos`, `/entrar`, ...) are appended.
    pub base_url: String,
    /// Extra attempts for a GET that failed in transport or with a 5xx.
    pub retries: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            retries: 1,
        }
    }
}

/// Shared HTTP plumbing for every service.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token_source: Arc<dyn TokenSource>,
    retries: u32,
}

impl ApiClient {
    pub fn new(options: ClientOptions, token_source: Arc<dyn TokenSource>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: options.base_url.trim_end_matches('/').to_string(),
            token_source,
            retries: options.retries,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Services ────────────────────────────────────────────────────

    pub fn auth(&self) -> Auth<'_> {
        Auth::new(self)
    }

    pub fn eventos(&self) -> Eventos<'_> {
        Eventos::new(self)
    }

    pub fn eventos_salvos(&self) -> EventosSalvos<'_> {
        EventosSalvos::new(self)
    }

    pub fn inscricoes(&self) -> Inscricoes<'_> {
        Inscricoes::new(self)
    }

    pub fn promoters(&self) -> Promoters<'_> {
        Promoters::new(self)
    }

    pub fn stats(&self) -> Stats<'_> {
        Stats::new(self)
    }

    // ── Requests ────────────────────────────────────────────────────

    /// Build a request with auth header.
    async fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self.token_source.token().await? {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Ok(builder),
        }
    }

    /// Send one logical request. GETs are re-sent up to `retries` more
    /// times on a transport error or a 5xx; other methods go out once.
    async fn execute<F>(&self, method: Method, path: &str, build: F) -> Result<Response, ApiError>
    where
        F: Fn(RequestBuilder) -> RequestBuilder + Send,
    {
        let url = format!("{}{}", self.base_url, path);
        let attempts = if method == Method::GET { self.retries + 1 } else { 1 };
        let mut attempt = 1;
        loop {
            let req = build(self.http.request(method.clone(), &url));
            let req = self.authed(req).await?;
            debug!(%method, %url, attempt, "api request");

            match req.send().await {
                Ok(resp) if resp.status().is_server_error() && attempt < attempts => {
                    warn!(%method, %url, status = resp.status().as_u16(), attempt, "server error, retrying");
                }
                Err(e) if attempt < attempts => {
                    warn!(%method, %url, error = %e, attempt, "request failed, retrying");
                }
                Ok(resp) => return Self::check(resp).await,
                Err(e) => return Err(e.into()),
            }
            attempt += 1;
        }
    }

    /// Map a non-2xx response to `ApiError::Server`, keeping the raw body.
    async fn check(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let code = status.as_u16();
        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::Server { status: code, message: body })
    }

    /// Response body as JSON. An empty body reads as `null`.
    async fn body(resp: Response) -> Result<Value, ApiError> {
        let bytes = resp.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(format!("response body: {e}")))
    }

    async fn read<F>(&self, method: Method, path: &str, build: F) -> Result<Value, ApiError>
    where
        F: Fn(RequestBuilder) -> RequestBuilder + Send,
    {
        let resp = self.execute(method, path, build).await?;
        Self::body(resp).await
    }

    pub(crate) async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.read(Method::GET, path, |r| r).await
    }

    pub(crate) async fn get_query<Q>(&self, path: &str, query: &Q) -> Result<Value, ApiError>
    where
        Q: Serialize + Sync + ?Sized,
    {
        self.read(Method::GET, path, |r| r.query(query)).await
    }

    pub(crate) async fn post<B>(&self, path: &str, body: &B) -> Result<Value, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.read(Method::POST, path, |r| r.json(body)).await
    }

    pub(crate) async fn post_empty(&self, path: &str) -> Result<Value, ApiError> {
        self.read(Method::POST, path, |r| r).await
    }

    pub(crate) async fn put<B>(&self, path: &str, body: &B) -> Result<Value, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.read(Method::PUT, path, |r| r.json(body)).await
    }

    pub(crate) async fn put_empty(&self, path: &str) -> Result<Value, ApiError> {
        self.read(Method::PUT, path, |r| r).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, |r| r).await.map(|_| ())
    }
}
