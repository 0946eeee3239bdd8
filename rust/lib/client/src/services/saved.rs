use agenda_core::{SavedEvent, normalize_saved_event};
use serde_json::json;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::shape::listing;

/// `/eventos-salvos`: the caller's bookmarked events.
pub struct EventosSalvos<'a> {
    api: &'a ApiClient,
}

impl<'a> EventosSalvos<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<SavedEvent>, ApiError> {
        let body = self.api.get("/eventos-salvos").await?;
        Ok(listing(body, "eventos")
            .items
            .iter()
            .filter_map(normalize_saved_event)
            .collect())
    }

    pub async fn add(&self, event_id: &str) -> Result<SavedEvent, ApiError> {
        let body = self
            .api
            .post("/eventos-salvos", &json!({ "eventId": event_id }))
            .await?;
        normalize_saved_event(&body)
            .ok_or_else(|| ApiError::Decode("saved event: not an object".into()))
    }

    pub async fn remove(&self, event_id: &str) -> Result<(), ApiError> {
        self.api.delete(&format!("/eventos-salvos/{event_id}")).await
    }
}
