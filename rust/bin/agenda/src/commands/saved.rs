//! Saved (bookmarked) events.

use agenda_session::Requirement;
use anyhow::Result;

use crate::commands::app::App;
use crate::commands::output;

pub async fn list(app: &App) -> Result<()> {
    app.require(Requirement::Any).await?;
    let items = app.api.eventos_salvos().list().await?;
    output::saved(app.output, &items)
}

pub async fn add(app: &App, event_id: &str) -> Result<()> {
    app.require(Requirement::Any).await?;
    let item = app.api.eventos_salvos().add(event_id).await?;
    if app.output.is_json() {
        return output::json(&item);
    }
    println!("Evento salvo.");
    Ok(())
}

pub async fn remove(app: &App, event_id: &str) -> Result<()> {
    app.require(Requirement::Any).await?;
    app.api.eventos_salvos().remove(event_id).await?;
    println!("Evento removido dos salvos.");
    Ok(())
}
