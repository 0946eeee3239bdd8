//! Request bodies in the API's own shape.

use serde::{Deserialize, Serialize};

/// `POST /entrar`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

/// `POST /entrar/registrar`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

/// `POST /eventos`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    /// ISO 8601.
    pub start_date: String,
    /// ISO 8601.
    pub end_date: String,
    /// Sent as `null` when there is no image.
    pub image_url: Option<String>,
    pub requires_registration: bool,
}

/// `PUT /eventos/:id`. Only the fields being changed are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// `Some(None)` clears the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_registration: Option<bool>,
}

impl UpdateEventRequest {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
