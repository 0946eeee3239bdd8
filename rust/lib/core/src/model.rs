//! Display-shape records.
//!
//! These are what the rest of the client works with. They serialize with
//! the display field names (`titulo`, `dataInicio`, `nome`, ...) so a front
//! end can bind to them directly; the wire names only ever appear in
//! [`crate::normalize`] and [`crate::wire`].

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date::parse_instant;

// ── Role ────────────────────────────────────────────────────────────

/// Coarse user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    #[serde(rename = "USUARIO", alias = "USER")]
    Ordinary,
    #[serde(rename = "PROMOTER")]
    Promoter,
    #[serde(rename = "ADMIN")]
    Admin,
}

impl Role {
    /// Parse either spelling: wire (`USER`) or display (`USUARIO`).
    /// Case-insensitive. Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" | "USUARIO" => Some(Role::Ordinary),
            "PROMOTER" => Some(Role::Promoter),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Name used by the API.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Role::Ordinary => "USER",
            Role::Promoter => "PROMOTER",
            Role::Admin => "ADMIN",
        }
    }

    /// Permission tag implied by the role when the API sends no tag list.
    pub fn permission_tag(&self) -> &'static str {
        match self {
            Role::Ordinary => "user",
            Role::Promoter => "promoter",
            Role::Admin => "admin",
        }
    }
}

/// Review state of a promoter request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromoterReview {
    Pending,
    Approved,
    Rejected,
}

impl PromoterReview {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(PromoterReview::Pending),
            "APPROVED" => Some(PromoterReview::Approved),
            "REJECTED" => Some(PromoterReview::Rejected),
            _ => None,
        }
    }
}

// ── User ────────────────────────────────────────────────────────────

/// The logged-in (or listed) user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "tipo")]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoter_status: Option<PromoterReview>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub permissions: BTreeSet<String>,
    /// Admin sign-off on a promoter request. `None` means not approved,
    /// whatever `promoter_status` says.
    #[serde(default)]
    pub approved_at: Option<String>,
}

impl User {
    pub fn has_permission(&self, tag: &str) -> bool {
        self.permissions.contains(tag)
    }
}

// ── Event ───────────────────────────────────────────────────────────

/// Event lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl EventStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(EventStatus::Pending),
            "APPROVED" => Some(EventStatus::Approved),
            "REJECTED" => Some(EventStatus::Rejected),
            "CANCELLED" | "CANCELED" => Some(EventStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "PENDING",
            EventStatus::Approved => "APPROVED",
            EventStatus::Rejected => "REJECTED",
            EventStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Promoter summary embedded in an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoterSummary {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
}

/// A cultural event in display shape.
///
/// Dates are kept as the strings the API sent so that a malformed value
/// still reaches the formatter (which renders a sentinel) instead of being
/// dropped here. Use [`Event::starts_at`] / [`Event::ends_at`] for instants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "localizacao")]
    pub location: String,
    #[serde(rename = "dataInicio")]
    pub start_date: String,
    #[serde(rename = "dataFim")]
    pub end_date: String,
    #[serde(rename = "imagemUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "requerInscricao")]
    pub requires_registration: bool,
    pub status: EventStatus,
    #[serde(rename = "promoterId")]
    pub promoter_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoter: Option<PromoterSummary>,
    #[serde(rename = "inscritos", default)]
    pub registrant_count: u64,
    #[serde(rename = "inscrito", default, skip_serializing_if = "Option::is_none")]
    pub is_registered: Option<bool>,
    #[serde(rename = "favorito", default, skip_serializing_if = "Option::is_none")]
    pub is_saved: Option<bool>,
    #[serde(rename = "rejectionReason", default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Event {
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.start_date)
    }

    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.end_date)
    }

    /// Whether `user_id` owns this event.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        !self.promoter_id.is_empty() && self.promoter_id == user_id
    }
}

// ── Listings ────────────────────────────────────────────────────────

/// Pagination block of a paged listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    /// Single page holding everything that came back.
    pub fn single_page(total: usize) -> Self {
        Self {
            page: 1,
            limit: 10,
            total: total as u64,
            total_pages: 1,
        }
    }
}

/// A page of events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub pagination: Pagination,
}

// ── Saved events / registrations ────────────────────────────────────

/// A bookmark of an event by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedEvent {
    pub id: String,
    #[serde(rename = "eventoId")]
    pub event_id: String,
    #[serde(rename = "usuarioId")]
    pub user_id: String,
    #[serde(rename = "evento", default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Event>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// A user's registration for an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: String,
    #[serde(rename = "eventoId")]
    pub event_id: String,
    #[serde(rename = "usuarioId")]
    pub user_id: String,
    #[serde(rename = "evento", default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Event>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}
