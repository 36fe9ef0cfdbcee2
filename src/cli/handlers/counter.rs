//! Handlers for the `counter` subcommands

use super::common::{HandlerContext, or_dash, with_pending};
use crate::cli::CounterCommands;
use crate::cli::output::OutputFormatter;
use crate::core::{Counter, CounterBuilder, CreateCounterRequest, UpdateCounterRequest};
use crate::error::Result;
use std::io::Write;

/// Shown by the dashboard when the backend reports no active counter
pub const EMPTY_DASHBOARD_MESSAGE: &str = "No active counters or the queue data is still empty.";

/// Dispatch a `counter` subcommand
pub async fn handle_counter_command(command: CounterCommands, ctx: &mut HandlerContext) -> Result<()> {
    match command {
        CounterCommands::List { all, csv } => handle_list(all, csv, ctx).await,
        CounterCommands::Show { id } => {
            let counter = ctx.session.counter(id).await?;
            if ctx.formatter.is_json() {
                ctx.formatter.print_json(&counter)
            } else {
                print_counter(&counter, &ctx.formatter);
                Ok(())
            }
        },
        CounterCommands::Create {
            name,
            max_queue,
            inactive,
        } => {
            let request = CreateCounterRequest {
                name,
                max_queue,
                is_active: inactive.then_some(false),
            };
            let counter = with_pending(&ctx.formatter, &ctx.notifier, ctx.session.create_counter(&request)).await?;
            print_result(&counter, &ctx.formatter)
        },
        CounterCommands::Update {
            id,
            name,
            max_queue,
            activate,
            deactivate,
        } => {
            let is_active = match (activate, deactivate) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let request = UpdateCounterRequest {
                name,
                max_queue,
                is_active,
            };
            let counter = with_pending(&ctx.formatter, &ctx.notifier, ctx.session.update_counter(id, &request)).await?;
            print_result(&counter, &ctx.formatter)
        },
        CounterCommands::Delete { id } => {
            with_pending(&ctx.formatter, &ctx.notifier, ctx.session.delete_counter(id)).await?;
            if ctx.formatter.is_json() {
                ctx.formatter.print_json(&serde_json::json!({ "status": "success", "deleted": id }))?;
            }
            Ok(())
        },
        CounterCommands::Dashboard => handle_dashboard(ctx).await,
    }
}

async fn handle_list(all: bool, csv: bool, ctx: &mut HandlerContext) -> Result<()> {
    let mut counters = ctx.session.counters().await?;
    if !all {
        counters.retain(|c| !c.is_deleted());
    }

    if csv {
        return write_csv(&counters, std::io::stdout().lock());
    }
    if ctx.formatter.is_json() {
        return ctx.formatter.print_json(&counters);
    }

    if counters.is_empty() {
        ctx.formatter.info("No counters found");
        return Ok(());
    }

    ctx.formatter.info(&format!(
        "{:<6} {:<24} {:<8} {:>8} {:>8}",
        "ID", "NAME", "ACTIVE", "CURRENT", "MAX"
    ));
    for counter in &counters {
        let active = if counter.is_deleted() {
            "deleted"
        } else if counter.is_active {
            "yes"
        } else {
            "no"
        };
        ctx.formatter.info(&format!(
            "{:<6} {:<24} {:<8} {:>8} {:>8}",
            counter.id, counter.name, active, counter.current_queue, counter.max_queue
        ));
    }
    ctx.formatter.info(&format!("\n{} counter(s)", counters.len()));
    Ok(())
}

/// Write counters as CSV with a header row
pub fn write_csv<W: Write>(counters: &[Counter], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for counter in counters {
        csv.serialize(counter)?;
    }
    csv.flush()?;
    Ok(())
}

async fn handle_dashboard(ctx: &mut HandlerContext) -> Result<()> {
    let rows = ctx.session.current_queues().await?;
    let active: Vec<_> = rows.iter().filter(|row| row.is_active).collect();

    if ctx.formatter.is_json() {
        let cards: Vec<_> = active
            .iter()
            .map(|row| {
                serde_json::json!({
                    "counter": CounterBuilder::from_current(row).build(),
                    "currentQueue": row.queue_number(),
                    "queueStatus": row.next_queue_status,
                })
            })
            .collect();
        return ctx.formatter.print_json(&cards);
    }

    if active.is_empty() {
        ctx.formatter.info(EMPTY_DASHBOARD_MESSAGE);
        return Ok(());
    }

    ctx.formatter.heading("Counter dashboard");
    for row in active {
        let counter = CounterBuilder::from_current(row).build();
        ctx.formatter.info(&format!(
            "{:<24} now serving {:>5}   status {:<9} capacity {}",
            counter.name,
            or_dash(row.queue_number()),
            or_dash(row.next_queue_status),
            counter.max_queue,
        ));
    }
    Ok(())
}

fn print_counter(counter: &Counter, formatter: &OutputFormatter) {
    formatter.heading(&counter.to_string());
    formatter.field("Active", if counter.is_active { "yes" } else { "no" });
    formatter.field("Current queue", &counter.current_queue.to_string());
    formatter.field("Max queue", &counter.max_queue.to_string());
    formatter.field("Remaining", &counter.remaining_capacity().to_string());
    formatter.field("Created", &or_dash(counter.created_at));
    formatter.field("Updated", &or_dash(counter.updated_at));
    if let Some(deleted_at) = counter.deleted_at {
        formatter.field("Deleted", &deleted_at.to_string());
    }
}

fn print_result(counter: &Counter, formatter: &OutputFormatter) -> Result<()> {
    if formatter.is_json() {
        formatter.print_json(counter)
    } else {
        print_counter(counter, formatter);
        Ok(())
    }
}
