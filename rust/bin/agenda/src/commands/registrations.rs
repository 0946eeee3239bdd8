//! Event registrations.

use agenda_session::Requirement;
use anyhow::Result;

use crate::commands::app::App;
use crate::commands::output;

pub async fn add(app: &App, event_id: &str) -> Result<()> {
    app.require(Requirement::Any).await?;
    let reg = app.api.inscricoes().register(event_id).await?;
    if app.output.is_json() {
        return output::json(&reg);
    }
    println!("Inscrição realizada.");
    Ok(())
}

pub async fn remove(app: &App, event_id: &str) -> Result<()> {
    app.require(Requirement::Any).await?;
    app.api.inscricoes().cancel(event_id).await?;
    println!("Inscrição cancelada.");
    Ok(())
}

pub async fn mine(app: &App) -> Result<()> {
    app.require(Requirement::Any).await?;
    let items = app.api.inscricoes().mine().await?;
    output::registrations(app.output, &items)
}

/// Registrants of one event (promoter/admin).
pub async fn list(app: &App, event_id: &str) -> Result<()> {
    app.require(Requirement::Any).await?;
    let items = app.api.inscricoes().registrants(event_id).await?;
    output::registrations(app.output, &items)
}
