use agenda_core::{Registration, normalize_registration};
use serde_json::{Value, json};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::shape::listing;

/// `/inscricoes`: event registrations.
pub struct Inscricoes<'a> {
    api: &'a ApiClient,
}

impl<'a> Inscricoes<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Register the caller for an event.
    pub async fn register(&self, event_id: &str) -> Result<Registration, ApiError> {
        let body = self
            .api
            .post("/inscricoes", &json!({ "eventId": event_id }))
            .await?;
        normalize_registration(&body)
            .ok_or_else(|| ApiError::Decode("registration: not an object".into()))
    }

    pub async fn cancel(&self, event_id: &str) -> Result<(), ApiError> {
        self.api.delete(&format!("/inscricoes/{event_id}")).await
    }

    /// Everyone registered for an event (promoter/admin view).
    pub async fn registrants(&self, event_id: &str) -> Result<Vec<Registration>, ApiError> {
        let body = self
            .api
            .get(&format!("/inscricoes/{event_id}/inscritos"))
            .await?;
        Ok(registrations(body, "inscritos"))
    }

    /// The caller's own registrations.
    pub async fn mine(&self) -> Result<Vec<Registration>, ApiError> {
        let body = self.api.get("/inscricoes/meus").await?;
        Ok(registrations(body, "inscricoes"))
    }
}

fn registrations(body: Value, key: &str) -> Vec<Registration> {
    listing(body, key)
        .items
        .iter()
        .filter_map(normalize_registration)
        .collect()
}
