//! Handlers for `login` and `logout`

use super::common::{HandlerContext, with_pending};
use crate::error::Result;
use dialoguer::{Password, theme::ColorfulTheme};

/// Handle the `login` command
///
/// Prompts for the password when it was not given on the command line.
///
/// # Errors
///
/// Returns an error if the prompt fails or the backend rejects the
/// credentials.
pub async fn handle_login(username: &str, password: Option<String>, ctx: &mut HandlerContext) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Password for {username}"))
            .interact()?,
    };

    with_pending(
        &ctx.formatter,
        &ctx.notifier,
        ctx.session.login(username, &password),
    )
    .await?;

    if ctx.formatter.is_json() {
        ctx.formatter.print_json(&serde_json::json!({
            "status": "success",
            "username": username,
            "base_url": ctx.config.api.base_url,
        }))?;
    }
    Ok(())
}

/// Handle the `logout` command
pub fn handle_logout(ctx: &mut HandlerContext) -> Result<()> {
    ctx.session.logout()?;
    if ctx.formatter.is_json() {
        ctx.formatter.print_json(&serde_json::json!({ "status": "success" }))?;
    } else {
        ctx.formatter.success("Logged out");
    }
    Ok(())
}
