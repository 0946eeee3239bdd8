//! Agenda Cultural HTTP client.
//!
//! [`ApiClient`] owns the connection settings and the bearer token source;
//! each resource of the API is reached through a short-lived service handle
//! (`client.eventos()`, `client.promoters()`, ...). Event- and user-shaped
//! payloads are normalized into `agenda_core` records before they are
//! returned.
//!
//! # Usage
//!
//! ```ignore
//! use agenda_client::{ApiClient, ClientOptions, StoredToken};
//!
//! let client = ApiClient::new(ClientOptions::default(), Arc::new(StoredToken::new(store)));
//! let page = client.eventos().list(&EventQuery::default()).await?;
//! ```

pub mod backend;
pub mod client;
pub mod error;
pub mod services;
mod shape;
pub mod token;

pub use backend::AuthBackend;
pub use client::{ApiClient, ClientOptions, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use services::auth::AuthResponse;
pub use services::eventos::EventQuery;
pub use services::promoters::PromoterRequestOutcome;
pub use services::stats::AdminStats;
pub use token::{NoAuth, StaticToken, StoredToken, TokenSource};
