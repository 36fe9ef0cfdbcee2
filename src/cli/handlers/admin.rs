//! Handlers for the `admin` subcommands

use super::common::{HandlerContext, or_dash, with_pending};
use crate::cli::AdminCommands;
use crate::cli::output::OutputFormatter;
use crate::core::{Admin, CreateAdminRequest, UpdateAdminRequest};
use crate::error::Result;
use dialoguer::{Password, theme::ColorfulTheme};

/// Dispatch an `admin` subcommand
pub async fn handle_admin_command(command: AdminCommands, ctx: &mut HandlerContext) -> Result<()> {
    match command {
        AdminCommands::List => {
            let admins = ctx.session.admins().await?;
            if ctx.formatter.is_json() {
                return ctx.formatter.print_json(&admins);
            }
            if admins.is_empty() {
                ctx.formatter.info("No admin accounts found");
                return Ok(());
            }
            ctx.formatter
                .info(&format!("{:<6} {:<20} {:<30} {:<8}", "ID", "USERNAME", "EMAIL", "ACTIVE"));
            for admin in &admins {
                ctx.formatter.info(&format!(
                    "{:<6} {:<20} {:<30} {:<8}",
                    admin.id,
                    admin.username,
                    admin.email.as_deref().unwrap_or("-"),
                    if admin.is_active { "yes" } else { "no" }
                ));
            }
            Ok(())
        },
        AdminCommands::Show { id } => {
            let admin = ctx.session.admin(id).await?;
            print_result(&admin, &ctx.formatter)
        },
        AdminCommands::Create {
            username,
            email,
            password,
        } => {
            let password = match password {
                Some(password) => password,
                None => prompt_new_password()?,
            };
            let request = CreateAdminRequest {
                username,
                email,
                password,
            };
            let admin = with_pending(&ctx.formatter, &ctx.notifier, ctx.session.create_admin(&request)).await?;
            print_result(&admin, &ctx.formatter)
        },
        AdminCommands::Update {
            id,
            username,
            email,
            change_password,
        } => {
            let password = if change_password {
                Some(prompt_new_password()?)
            } else {
                None
            };
            let request = UpdateAdminRequest {
                username,
                email,
                password,
            };
            let admin = with_pending(&ctx.formatter, &ctx.notifier, ctx.session.update_admin(id, &request)).await?;
            print_result(&admin, &ctx.formatter)
        },
        AdminCommands::Delete { id } => {
            with_pending(&ctx.formatter, &ctx.notifier, ctx.session.delete_admin(id)).await?;
            if ctx.formatter.is_json() {
                ctx.formatter.print_json(&serde_json::json!({ "status": "success", "deleted": id }))?;
            }
            Ok(())
        },
        AdminCommands::Toggle { id } => {
            let toggled = with_pending(&ctx.formatter, &ctx.notifier, ctx.session.toggle_admin(id)).await?;
            if ctx.formatter.is_json() {
                ctx.formatter.print_json(&toggled)?;
            }
            Ok(())
        },
    }
}

fn prompt_new_password() -> Result<String> {
    Ok(Password::with_theme(&ColorfulTheme::default())
        .with_prompt("New password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?)
}

fn print_result(admin: &Admin, formatter: &OutputFormatter) -> Result<()> {
    if formatter.is_json() {
        return formatter.print_json(admin);
    }
    formatter.heading(&admin.to_string());
    formatter.field("Email", admin.email.as_deref().unwrap_or("-"));
    formatter.field("Active", if admin.is_active { "yes" } else { "no" });
    formatter.field("Created", &or_dash(admin.created_at));
    formatter.field("Updated", &or_dash(admin.updated_at));
    Ok(())
}
