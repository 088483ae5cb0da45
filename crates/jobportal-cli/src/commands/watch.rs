//! Follow the push channel.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use jobportal_client::push::spawn_push;
use jobportal_client::{NotificationApi, PushUpdate, Session, ToastQueue};
use jobportal_core::auth::peek_identity;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::output;

#[derive(Args)]
pub struct WatchArgs {
    /// Seconds a toast stays up
    #[arg(long, default_value_t = 5)]
    pub toast_secs: u64,

    /// Open each pushed notification as if its toast was clicked
    #[arg(long)]
    pub open: bool,
}

pub async fn execute(args: WatchArgs, api: NotificationApi) -> Result<()> {
    let identity = peek_identity(api.token().unwrap_or_default())
        .context("Session token does not name an identity")?;
    let (mut updates, push_task) = spawn_push(api.ws_url()?, identity.rooms());
    let mut session = Session::with_toasts(api, ToastQueue::new(Duration::from_secs(args.toast_secs)));
    let mut ticker = tokio::time::interval(Duration::from_millis(250));

    println!(
        "{} Watching notifications for {} {}",
        "●".cyan(),
        identity.id.bold(),
        format!("({})", identity.role.as_str()).dimmed()
    );
    println!("{}", "Ctrl+C to stop".dimmed());

    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(update) = update else { break };
                match &update {
                    PushUpdate::Connected => println!("{}", "Connected".green()),
                    PushUpdate::Disconnected => println!("{}", "Disconnected, reconnecting...".yellow()),
                    PushUpdate::Notification(_) => {}
                }

                let shown = session.toasts().len();
                session.on_push(update, Instant::now()).await;
                let fresh: Vec<_> = session.toasts().visible()[shown..].to_vec();
                for toast in &fresh {
                    output::print_toast(toast);
                }
                output::print_unread_line(session.inbox().unread_count());

                if args.open {
                    for toast in fresh {
                        if let Some(destination) = session.click_toast(toast.id, Instant::now()).await {
                            println!("  {} {}", "Open".dimmed(), destination.path().cyan());
                        }
                    }
                }
            }
            _ = ticker.tick() => {
                for toast in session.toasts_mut().tick(Instant::now()) {
                    debug!(toast = toast.id, "Toast dismissed");
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    push_task.abort();
    Ok(())
}
