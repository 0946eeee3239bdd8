use agenda_core::{LoginRequest, RegisterRequest, User};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::services::auth::AuthResponse;
use crate::services::promoters::PromoterRequestOutcome;

/// The remote operations the session layer drives. [`ApiClient`] is the
/// production implementation; tests substitute their own.
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError>;

    async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    async fn current_user(&self) -> Result<User, ApiError>;

    async fn request_promoter(&self) -> Result<PromoterRequestOutcome, ApiError>;
}

#[async_trait::async_trait]
impl AuthBackend for ApiClient {
    async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.auth().login(req).await
    }

    async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.auth().register(req).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.auth().logout().await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.auth().me().await
    }

    async fn request_promoter(&self) -> Result<PromoterRequestOutcome, ApiError> {
        self.promoters().request().await
    }
}
