use agenda_core::{
    CreateEventRequest, Event, EventPage, EventStatus, RejectionReason, UpdateEventRequest,
    normalize_event, normalize_events,
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::shape::listing;

/// Filters for event listings. Unset fields are left out of the query.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// `/eventos`
pub struct Eventos<'a> {
    api: &'a ApiClient,
}

impl<'a> Eventos<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &EventQuery) -> Result<EventPage, ApiError> {
        let body = self.api.get_query("/eventos", query).await?;
        Ok(page(body))
    }

    pub async fn get(&self, id: &str) -> Result<Event, ApiError> {
        let body = self.api.get(&format!("/eventos/{id}")).await?;
        event(body)
    }

    pub async fn create(&self, req: &CreateEventRequest) -> Result<Event, ApiError> {
        event(self.api.post("/eventos", req).await?)
    }

    pub async fn update(&self, id: &str, req: &UpdateEventRequest) -> Result<Event, ApiError> {
        event(self.api.put(&format!("/eventos/{id}"), req).await?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete(&format!("/eventos/{id}")).await
    }

    pub async fn cancel(&self, id: &str) -> Result<Event, ApiError> {
        event(self.api.put_empty(&format!("/eventos/{id}/cancelar")).await?)
    }

    pub async fn approve(&self, id: &str) -> Result<Event, ApiError> {
        event(self.api.put_empty(&format!("/eventos/{id}/aprovar")).await?)
    }

    /// A reason can only be built through `RejectionReason::new`, which
    /// enforces the minimum length, so a short reason never reaches here.
    pub async fn reject(&self, id: &str, reason: &RejectionReason) -> Result<Event, ApiError> {
        let body = json!({ "rejectionReason": reason.as_str() });
        event(self.api.put(&format!("/eventos/{id}/rejeitar"), &body).await?)
    }

    pub async fn revoke(&self, id: &str) -> Result<Event, ApiError> {
        event(self.api.put_empty(&format!("/eventos/{id}/revogar")).await?)
    }

    /// The calling promoter's own events.
    pub async fn mine(&self, query: &EventQuery) -> Result<EventPage, ApiError> {
        Ok(page(self.api.get_query("/eventos/meus", query).await?))
    }

    /// Events awaiting review (admin).
    pub async fn pending(&self, query: &EventQuery) -> Result<EventPage, ApiError> {
        Ok(page(self.api.get_query("/eventos/pendentes", query).await?))
    }
}

fn event(body: Value) -> Result<Event, ApiError> {
    normalize_event(&body).ok_or_else(|| ApiError::Decode("event: not an object".into()))
}

fn page(body: Value) -> EventPage {
    let listing = listing(body, "eventos");
    EventPage {
        pagination: listing.pagination_or_single(),
        events: normalize_events(&listing.items),
    }
}
