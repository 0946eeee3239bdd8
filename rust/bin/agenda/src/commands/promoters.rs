//! Promoter requests.

use agenda_session::Requirement;
use anyhow::Result;

use crate::commands::app::App;
use crate::commands::output;

pub async fn pending(app: &App) -> Result<()> {
    app.require(Requirement::Admin).await?;
    let users = app.api.promoters().pending().await?;
    output::users(app.output, &users)
}

/// Ask for promoter rights for the logged-in user.
pub async fn request(app: &App) -> Result<()> {
    app.require(Requirement::Any).await?;
    let user = app.session.request_promoter().await?;
    if app.output.is_json() {
        output::json(&user)?;
    }
    Ok(())
}

pub async fn approve(app: &App, user_id: &str) -> Result<()> {
    app.require(Requirement::Admin).await?;
    let user = app.api.promoters().approve(user_id).await?;
    output::users(app.output, std::slice::from_ref(&user))
}

pub async fn reject(app: &App, user_id: &str) -> Result<()> {
    app.require(Requirement::Admin).await?;
    let user = app.api.promoters().reject(user_id).await?;
    output::users(app.output, std::slice::from_ref(&user))
}
