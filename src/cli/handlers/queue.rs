//! Handlers for the `queue` subcommands

use super::common::{HandlerContext, or_dash, with_pending};
use crate::cli::QueueCommands;
use crate::cli::output::OutputFormatter;
use crate::core::{CalledQueue, ClaimedTicket};
use crate::error::Result;
use crate::session::TicketState;
use dialoguer::{Confirm, theme::ColorfulTheme};

/// Dispatch a `queue` subcommand
pub async fn handle_queue_command(command: QueueCommands, ctx: &mut HandlerContext) -> Result<()> {
    match command {
        QueueCommands::Claim => {
            let ticket = with_pending(&ctx.formatter, &ctx.notifier, ctx.session.claim()).await?;
            print_ticket(&ticket, &ctx.formatter)
        },
        QueueCommands::Release { counter, number } => {
            let released = with_pending(&ctx.formatter, &ctx.notifier, ctx.session.release(counter, number)).await?;
            if ctx.formatter.is_json() {
                ctx.formatter.print_json(&serde_json::json!({
                    "status": "released",
                    "ticket": released,
                }))?;
            }
            Ok(())
        },
        QueueCommands::Status => handle_status(ctx),
        QueueCommands::Next { counter } => {
            let called = with_pending(&ctx.formatter, &ctx.notifier, ctx.session.call_next(counter)).await?;
            print_called(&called, &ctx.formatter)
        },
        QueueCommands::Skip { counter } => {
            let called = with_pending(&ctx.formatter, &ctx.notifier, ctx.session.skip(counter)).await?;
            print_called(&called, &ctx.formatter)
        },
        QueueCommands::Reset { counter, all: _, yes } => {
            if !yes && !confirm_reset(counter)? {
                ctx.formatter.info("Reset cancelled");
                return Ok(());
            }
            let reset = with_pending(&ctx.formatter, &ctx.notifier, ctx.session.reset(counter)).await?;
            if ctx.formatter.is_json() {
                ctx.formatter.print_json(&reset)?;
            }
            Ok(())
        },
        QueueCommands::Search { query } => {
            let records = ctx.session.search(&query).await?;
            if ctx.formatter.is_json() {
                return ctx.formatter.print_json(&records);
            }
            if records.is_empty() {
                ctx.formatter.info(&format!("No queue tickets match '{query}'"));
                return Ok(());
            }
            ctx.formatter
                .info(&format!("{:<8} {:<8} {:>6}  {:<9} {}", "ID", "COUNTER", "NUMBER", "STATUS", "CREATED"));
            for record in &records {
                ctx.formatter.info(&format!(
                    "{:<8} {:<8} {:>6}  {:<9} {}",
                    record.id,
                    or_dash(record.counter_id),
                    record.queue_number,
                    record.status,
                    or_dash(record.created_at)
                ));
            }
            Ok(())
        },
        QueueCommands::Metrics => {
            let metrics = ctx.session.metrics().await?;
            if ctx.formatter.is_json() {
                return ctx.formatter.print_json(&metrics);
            }
            ctx.formatter.heading("Queue metrics");
            ctx.formatter.field("Total", &metrics.total.to_string());
            ctx.formatter.field("Waiting", &metrics.waiting.to_string());
            ctx.formatter.field("Called", &metrics.called.to_string());
            ctx.formatter.field("Served", &metrics.served.to_string());
            ctx.formatter.field("Skipped", &metrics.skipped.to_string());
            ctx.formatter.field("Released", &metrics.released.to_string());
            for (name, value) in &metrics.extra {
                ctx.formatter.field(name, &value.to_string());
            }
            Ok(())
        },
    }
}

fn handle_status(ctx: &HandlerContext) -> Result<()> {
    match ctx.session.ticket_state() {
        TicketState::Claimed(ticket) => print_ticket(ticket, &ctx.formatter),
        TicketState::Idle if ctx.formatter.is_json() => {
            ctx.formatter.print_json(&serde_json::json!({ "state": "idle" }))
        },
        TicketState::Idle => {
            ctx.formatter.info("No ticket is currently held");
            Ok(())
        },
    }
}

fn confirm_reset(counter: Option<u64>) -> Result<bool> {
    let prompt = match counter {
        Some(id) => format!("Reset every queue number at counter {id}?"),
        None => "Reset queue numbers at ALL counters?".to_string(),
    };
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

fn print_ticket(ticket: &ClaimedTicket, formatter: &OutputFormatter) -> Result<()> {
    if formatter.is_json() {
        return formatter.print_json(&serde_json::json!({ "state": "claimed", "ticket": ticket }));
    }
    formatter.heading(&format!("Queue number {}", ticket.queue_number));
    formatter.field("Counter", &format!("{} (#{})", ticket.counter_name, ticket.counter_id));
    formatter.field("Position", &ticket.position.to_string());
    formatter.field("Estimated wait", &format!("{} min", ticket.estimated_wait_time));
    Ok(())
}

fn print_called(called: &CalledQueue, formatter: &OutputFormatter) -> Result<()> {
    if formatter.is_json() {
        return formatter.print_json(called);
    }
    if let Some(name) = &called.counter_name {
        formatter.field("Counter", name);
    }
    formatter.field("Number", &or_dash(called.queue_number));
    formatter.field("Status", &or_dash(called.status));
    Ok(())
}
