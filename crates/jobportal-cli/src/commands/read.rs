//! Mark notifications as read.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use jobportal_client::NotificationApi;
use jobportal_core::navigation::destination_for;

#[derive(Args)]
pub struct ReadArgs {
    /// Notification id (a prefix is enough)
    pub id: Option<String>,

    /// Mark every notification read
    #[arg(long, conflicts_with = "id")]
    pub all: bool,
}

pub async fn execute(args: ReadArgs, api: NotificationApi) -> Result<()> {
    if args.all {
        let updated = api
            .mark_all_read()
            .await
            .context("Failed to mark notifications read")?;
        println!("{} Marked {} notification(s) read", "✓".green().bold(), updated);
        return Ok(());
    }

    let Some(prefix) = args.id else {
        bail!("Pass a notification id or --all");
    };
    let id = resolve_id(&api, &prefix).await?;
    let updated = match api.mark_read(&id).await {
        Ok(updated) => updated,
        Err(e) if e.is_not_found() => bail!("No notification '{}' in your inbox", id),
        Err(e) => return Err(e).with_context(|| format!("Failed to mark {} read", id)),
    };

    println!("{} {}", "✓".green().bold(), updated.message);
    if let Some(destination) = destination_for(&updated) {
        println!("  {} {}", "Open".dimmed(), destination.path().cyan());
    }
    Ok(())
}

async fn resolve_id(api: &NotificationApi, prefix: &str) -> Result<String> {
    let list = api.fetch().await.context("Failed to fetch notifications")?;
    let matches: Vec<&str> = list
        .notifications
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| id.starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(id.to_string()),
        [] => Ok(prefix.to_string()),
        _ => bail!("Id prefix '{}' matches {} notifications", prefix, matches.len()),
    }
}
