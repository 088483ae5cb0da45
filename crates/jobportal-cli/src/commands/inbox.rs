//! List the caller's notifications.

use anyhow::{Context, Result};
use clap::Args;
use jobportal_client::NotificationApi;

use crate::output;

#[derive(Args)]
pub struct InboxArgs {
    /// Only print the unread count
    #[arg(long)]
    pub count: bool,

    /// Print raw JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: InboxArgs, api: NotificationApi) -> Result<()> {
    if args.count {
        let count = api
            .unread_count()
            .await
            .context("Failed to fetch unread count")?;
        println!("{}", count);
        return Ok(());
    }

    let list = api.fetch().await.context("Failed to fetch notifications")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        output::print_notifications_table(&list.notifications);
    }
    Ok(())
}
