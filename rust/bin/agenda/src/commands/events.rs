//! Event commands.

use agenda_client::EventQuery;
use agenda_core::{EventAction, EventForm, EventPatch, PromoterStatus, RejectionReason, User};
use agenda_session::Requirement;
use anyhow::Result;

use crate::commands::app::App;
use crate::commands::output;

pub async fn list(app: &App, query: EventQuery) -> Result<()> {
    let page = app.api.eventos().list(&query).await?;
    output::events(app.output, &page)
}

pub async fn get(app: &App, id: &str) -> Result<()> {
    let ev = app.api.eventos().get(id).await?;
    output::event(app.output, &ev)
}

pub async fn create(app: &App, form: EventForm) -> Result<()> {
    let req = form.validate()?;
    let state = app.require(Requirement::Any).await?;
    if let Some(message) = creation_refusal(&state.promoter_status()) {
        anyhow::bail!(message);
    }
    let ev = app.api.eventos().create(&req).await?;
    if !app.output.is_json() {
        println!("Evento criado e enviado para aprovação.");
    }
    output::event(app.output, &ev)
}

/// Why the signed-in user may not create events, if they may not.
fn creation_refusal(status: &PromoterStatus) -> Option<&'static str> {
    if status.can_create_events {
        None
    } else if status.is_pending {
        Some("Promoter account not approved yet; events cannot be created.")
    } else {
        Some("Creating events requires an approved promoter or an admin account.")
    }
}

pub async fn update(app: &App, id: &str, patch: EventPatch) -> Result<()> {
    let req = patch.validate()?;
    if req.is_empty() {
        anyhow::bail!("Nothing to update.");
    }
    check_action(app, id, EventAction::Edit).await?;
    let ev = app.api.eventos().update(id, &req).await?;
    output::event(app.output, &ev)
}

pub async fn delete(app: &App, id: &str) -> Result<()> {
    app.require(Requirement::Any).await?;
    app.api.eventos().delete(id).await?;
    println!("Event \"{id}\" deleted.");
    Ok(())
}

/// Run a lifecycle transition after checking it locally.
pub async fn transition(
    app: &App,
    id: &str,
    action: EventAction,
    reason: Option<&str>,
) -> Result<()> {
    // Validate the reason before anything goes over the wire.
    let reason = match action {
        EventAction::Reject => Some(RejectionReason::new(reason.unwrap_or_default())?),
        _ => None,
    };
    check_action(app, id, action).await?;

    let eventos = app.api.eventos();
    let ev = match (action, &reason) {
        (EventAction::Cancel, _) => eventos.cancel(id).await?,
        (EventAction::Approve, _) => eventos.approve(id).await?,
        (EventAction::Reject, Some(reason)) => eventos.reject(id, reason).await?,
        (EventAction::Revoke, _) => eventos.revoke(id).await?,
        (EventAction::Edit, _) | (EventAction::Reject, None) => {
            anyhow::bail!("unsupported transition")
        }
    };
    output::event(app.output, &ev)
}

async fn check_action(app: &App, id: &str, action: EventAction) -> Result<()> {
    let state = app.require(Requirement::Any).await?;
    let ev = app.api.eventos().get(id).await?;
    let user: Option<&User> = state.user.as_ref();
    if !action.allowed_from(ev.status) {
        anyhow::bail!("Event \"{}\" is {}; {:?} is not possible.", id, ev.status, action);
    }
    if !action.permitted(&ev, user) {
        anyhow::bail!("Not allowed to {:?} event \"{}\".", action, id);
    }
    Ok(())
}

pub async fn mine(app: &App, query: EventQuery) -> Result<()> {
    app.require(Requirement::Promoter).await?;
    let page = app.api.eventos().mine(&query).await?;
    output::events(app.output, &page)
}

pub async fn pending(app: &App, query: EventQuery) -> Result<()> {
    app.require(Requirement::Admin).await?;
    let page = app.api.eventos().pending(&query).await?;
    output::events(app.output, &page)
}
