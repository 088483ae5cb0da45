//! Raise a notification through the internal entry point.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use jobportal_client::NotificationApi;
use jobportal_core::notification::model::{NewNotification, NotificationKind};

#[derive(Args)]
pub struct SendArgs {
    /// Identity to notify, or `admin` for every administrator
    pub recipient: String,

    /// Notification text
    pub message: String,

    /// Notification type (SYSTEM, NEW_APPLICATION, JOB_ALERT)
    #[arg(long = "type", default_value = "SYSTEM")]
    pub kind: String,

    /// Related entity, such as a job id
    #[arg(long)]
    pub related_id: Option<String>,

    /// Shared secret for internal routes
    #[arg(long, env = "JOBPORTAL_INTERNAL_TOKEN", hide_env_values = true)]
    pub internal_token: Option<String>,
}

pub async fn execute(args: SendArgs, api: NotificationApi) -> Result<()> {
    let api = match args.internal_token {
        Some(token) => api.with_internal_token(token),
        None => api,
    };
    let new = NewNotification {
        recipient: args.recipient,
        kind: NotificationKind::from_str(&args.kind.to_uppercase()),
        message: args.message,
        related_id: args.related_id,
    };

    let created = api
        .create(&new)
        .await
        .context("Failed to send notification")?;

    println!(
        "{} Sent {} to {} {}",
        "✓".green().bold(),
        created.kind.as_str().cyan(),
        created.owner.bold(),
        format!("({})", created.id).dimmed()
    );
    Ok(())
}
