//! Wire shape → display shape.
//!
//! The API has sent events and users in two shapes over time: English
//! wire names (`title`, `startDate`, `_count.registrations`) and the
//! display names the client uses (`titulo`, `dataInicio`, `inscritos`).
//! Every field is looked up under its display name first, then under its
//! wire name, then falls back to a default. Nothing here fails on a
//! missing or mistyped optional field.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::warn;

use crate::date::now_iso;
use crate::model::{
    Event, EventStatus, PromoterReview, PromoterSummary, Registration, Role, SavedEvent, User,
};

type Object = Map<String, Value>;

// ── Field lookup ────────────────────────────────────────────────────

/// First non-empty string (or number, rendered) under any of `keys`.
fn text(obj: &Object, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match obj.get(*k)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn flag(obj: &Object, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|k| obj.get(*k)?.as_bool())
}

fn object<'a>(obj: &'a Object, keys: &[&str]) -> Option<&'a Object> {
    keys.iter().find_map(|k| obj.get(*k)?.as_object())
}

/// Registrant count: explicit count, else `_count.registrations`, else 0.
/// An explicit zero defers to `_count`.
fn registrant_count(obj: &Object) -> u64 {
    obj.get("inscritos")
        .and_then(Value::as_u64)
        .filter(|n| *n > 0)
        .or_else(|| {
            object(obj, &["_count"])
                .and_then(|c| c.get("registrations"))
                .and_then(Value::as_u64)
        })
        .unwrap_or(0)
}

fn promoter_summary(obj: &Object) -> Option<PromoterSummary> {
    let p = object(obj, &["promoter"])?;
    Some(PromoterSummary {
        id: text(p, &["id"]).unwrap_or_default(),
        name: text(p, &["nome", "name"]).unwrap_or_default(),
        email: text(p, &["email"]).unwrap_or_default(),
    })
}

// ── Events ──────────────────────────────────────────────────────────

/// Normalize an event record in either shape.
///
/// Returns `None` only when `raw` is not a JSON object.
pub fn normalize_event(raw: &Value) -> Option<Event> {
    let obj = raw.as_object()?;

    let id = text(obj, &["id"]).unwrap_or_default();
    let created_at = text(obj, &["createdAt"]);

    let start_date = text(obj, &["dataInicio", "startDate"]);
    if start_date.is_none() {
        warn!(event = %id, "event without start date");
    }
    let start_date = start_date
        .or_else(|| created_at.clone())
        .unwrap_or_else(now_iso);
    let end_date = text(obj, &["dataFim", "endDate"])
        .or_else(|| created_at.clone())
        .unwrap_or_else(now_iso);

    let status = match text(obj, &["status"]) {
        Some(s) => EventStatus::parse(&s).unwrap_or_else(|| {
            warn!(event = %id, status = %s, "unknown event status, treating as pending");
            EventStatus::Pending
        }),
        None => EventStatus::Pending,
    };

    let promoter = promoter_summary(obj);
    let promoter_id = text(obj, &["promoterId"])
        .or_else(|| promoter.as_ref().map(|p| p.id.clone()).filter(|s| !s.is_empty()))
        .unwrap_or_default();

    let rejection_reason = match status {
        EventStatus::Rejected => text(obj, &["rejectionReason"]),
        _ => None,
    };

    Some(Event {
        id,
        title: text(obj, &["titulo", "title"]).unwrap_or_default(),
        description: text(obj, &["descricao", "description"]).unwrap_or_default(),
        location: text(obj, &["localizacao", "location"]).unwrap_or_default(),
        start_date,
        end_date,
        image_url: text(obj, &["imagemUrl", "imageUrl"]),
        requires_registration: flag(obj, &["requerInscricao", "requiresRegistration"])
            .unwrap_or(false),
        status,
        promoter_id,
        promoter,
        registrant_count: registrant_count(obj),
        is_registered: flag(obj, &["inscrito", "isRegistered"]),
        is_saved: flag(obj, &["favorito", "isSaved"]),
        rejection_reason,
        created_at: created_at.unwrap_or_else(now_iso),
    })
}

/// Normalize every object in `items`, skipping non-objects.
pub fn normalize_events(items: &[Value]) -> Vec<Event> {
    items.iter().filter_map(normalize_event).collect()
}

// ── Users ───────────────────────────────────────────────────────────

fn string_list(value: &Value) -> Option<BTreeSet<String>> {
    let arr = value.as_array()?;
    Some(
        arr.iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

/// Normalize a user record in either shape.
///
/// Permission tags come from `permissions` when the caller has them (the
/// login response carries them at its root), else from the record's own
/// `permissions` array, else they are inferred from the role.
pub fn normalize_user(raw: &Value, permissions: Option<&[String]>) -> Option<User> {
    let obj = raw.as_object()?;

    let role = match text(obj, &["tipo", "role"]) {
        Some(r) => Role::parse(&r).unwrap_or_else(|| {
            warn!(role = %r, "unknown role, treating as ordinary user");
            Role::Ordinary
        }),
        None => Role::Ordinary,
    };

    let permissions = match permissions {
        Some(tags) => tags.iter().cloned().collect(),
        None => obj
            .get("permissions")
            .and_then(string_list)
            .unwrap_or_else(|| {
                text(obj, &["tipo", "role"])
                    .map(|r| BTreeSet::from([r.to_lowercase()]))
                    .unwrap_or_default()
            }),
    };

    Some(User {
        id: text(obj, &["id"]).unwrap_or_default(),
        name: text(obj, &["nome", "name"]).unwrap_or_default(),
        email: text(obj, &["email"]).unwrap_or_default(),
        role,
        promoter_status: text(obj, &["promoterStatus"]).and_then(|s| PromoterReview::parse(&s)),
        avatar: text(obj, &["avatar"]),
        created_at: text(obj, &["createdAt"]).unwrap_or_else(now_iso),
        permissions,
        approved_at: text(obj, &["approvedAt"]),
    })
}

pub fn normalize_users(items: &[Value]) -> Vec<User> {
    items.iter().filter_map(|v| normalize_user(v, None)).collect()
}

// ── Saved events / registrations ────────────────────────────────────

pub fn normalize_saved_event(raw: &Value) -> Option<SavedEvent> {
    let obj = raw.as_object()?;
    let event = obj
        .get("evento")
        .or_else(|| obj.get("event"))
        .and_then(normalize_event);
    Some(SavedEvent {
        id: text(obj, &["id"]).unwrap_or_default(),
        event_id: text(obj, &["eventoId", "eventId"])
            .or_else(|| event.as_ref().map(|e| e.id.clone()))
            .unwrap_or_default(),
        user_id: text(obj, &["usuarioId", "userId"]).unwrap_or_default(),
        event,
        created_at: text(obj, &["createdAt"]).unwrap_or_else(now_iso),
    })
}

pub fn normalize_registration(raw: &Value) -> Option<Registration> {
    let obj = raw.as_object()?;
    let event = obj
        .get("evento")
        .or_else(|| obj.get("event"))
        .and_then(normalize_event);
    Some(Registration {
        id: text(obj, &["id"]).unwrap_or_default(),
        event_id: text(obj, &["eventoId", "eventId"])
            .or_else(|| event.as_ref().map(|e| e.id.clone()))
            .unwrap_or_default(),
        user_id: text(obj, &["usuarioId", "userId"]).unwrap_or_default(),
        event,
        created_at: text(obj, &["createdAt"]).unwrap_or_else(now_iso),
    })
}
