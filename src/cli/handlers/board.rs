//! Handler for the `board` command
//!
//! Renders the public display board once, or keeps it refreshed with the
//! background poller until Ctrl-C.

use super::common::HandlerContext;
use crate::cli::output::OutputFormatter;
use crate::display::{BoardPoller, BoardSnapshot};
use crate::error::Result;
use chrono::Local;
use std::time::Duration;

/// Handler for the `board` command
///
/// # Arguments
///
/// * `watch` - Keep polling until interrupted
/// * `interval` - Poll period override in seconds
/// * `ctx` - Handler context
///
/// # Errors
///
/// Returns an error if the single fetch fails (without `watch`), or if
/// printing fails. While watching, failed polls are only logged.
pub async fn handle_board_command(watch: bool, interval: Option<u64>, ctx: &mut HandlerContext) -> Result<()> {
    let poller = BoardPoller::new(
        ctx.session.transport(),
        ctx.tokens.clone(),
        interval.map_or_else(|| ctx.config.display.poll_interval(), |secs| Duration::from_secs(secs.max(1))),
    );

    if !watch {
        let snapshot = poller.poll_once().await?;
        return render(&snapshot, &ctx.formatter, false);
    }

    let handle = poller.spawn();
    let mut snapshots = handle.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = snapshots.borrow_and_update().clone();
                if let Some(snapshot) = latest {
                    render(&snapshot, &ctx.formatter, true)?;
                }
            },
        }
    }
    handle.shutdown().await;
    Ok(())
}

fn render(snapshot: &BoardSnapshot, formatter: &OutputFormatter, clear: bool) -> Result<()> {
    if formatter.is_json() {
        return formatter.print_json(snapshot);
    }
    if clear {
        print!("\x1B[2J\x1B[H");
    }
    formatter.heading("Now serving");
    formatter.info(&snapshot.render());
    formatter.info(&format!(
        "\nUpdated {}",
        snapshot.fetched_at.with_timezone(&Local).format("%H:%M:%S")
    ));
    Ok(())
}
