//! Login / register / logout / whoami.

use agenda_core::{LoginForm, RegisterForm};
use agenda_session::SessionPhase;
use anyhow::Result;
use serde_json::json;

use crate::commands::app::App;
use crate::commands::output;

pub async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    let req = LoginForm {
        email: email.to_string(),
        password: password.to_string(),
    }
    .validate()?;

    let user = app.session.login(&req.email, &req.password).await?;
    if app.output.is_json() {
        output::json(&user)?;
    }
    Ok(())
}

pub async fn register(app: &App, form: RegisterForm) -> Result<()> {
    let req = form.validate()?;
    let user = app.session.register(&req).await?;
    if app.output.is_json() {
        output::json(&user)?;
    }
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    app.session.logout().await;
    Ok(())
}

pub async fn whoami(app: &App) -> Result<()> {
    let state = app.session.check_auth().await;
    let status = state.promoter_status();

    if app.output.is_json() {
        return output::json(&json!({
            "session": state,
            "promoter": status,
        }));
    }

    match (state.phase(), &state.user) {
        (SessionPhase::Authenticated, Some(user)) => {
            println!("{} <{}>", user.name, user.email);
            println!("  id:    {}", user.id);
            println!("  tipo:  {}", user.role.wire_name());
            if !user.permissions.is_empty() {
                let tags: Vec<&str> = user.permissions.iter().map(String::as_str).collect();
                println!("  tags:  {}", tags.join(", "));
            }
            if status.is_pending {
                println!("  promoter aguardando aprovação");
            } else if status.can_create_events {
                println!("  pode criar eventos");
            }
        }
        _ if app.session.has_stored_token() => {
            println!("The server did not answer; your saved login was kept.")
        }
        _ => println!("Not logged in."),
    }
    Ok(())
}
