//! CLI command definitions and handlers.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use jobportal_client::api::DEFAULT_SERVER_URL;
use jobportal_client::NotificationApi;

pub mod inbox;
pub mod read;
pub mod send;
pub mod serve;
pub mod token;
pub mod watch;

/// Job Portal notification service
#[derive(Parser)]
#[command(name = "jobportal")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Notification server base URL
    #[arg(long, global = true, env = "JOBPORTAL_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// Session token of the signed-in user
    #[arg(long, global = true, env = "JOBPORTAL_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the notification server
    Serve(serve::ServeArgs),

    /// Raise a notification as a portal service would
    Send(send::SendArgs),

    /// List your notifications
    Inbox(inbox::InboxArgs),

    /// Mark notifications as read
    Read(read::ReadArgs),

    /// Follow the push channel and show toasts as they arrive
    Watch(watch::WatchArgs),

    /// Mint a development session token
    Token(token::TokenArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let api = NotificationApi::new(&self.server);
        match self.command {
            Commands::Serve(args) => serve::execute(args).await,
            Commands::Send(args) => send::execute(args, api).await,
            Commands::Inbox(args) => inbox::execute(args, signed_in(api, self.token)?).await,
            Commands::Read(args) => read::execute(args, signed_in(api, self.token)?).await,
            Commands::Watch(args) => watch::execute(args, signed_in(api, self.token)?).await,
            Commands::Token(args) => token::execute(args),
        }
    }
}

fn signed_in(api: NotificationApi, token: Option<String>) -> Result<NotificationApi> {
    match token {
        Some(token) if !token.is_empty() => Ok(api.with_token(token)),
        _ => bail!("No session token. Pass --token or set JOBPORTAL_TOKEN (see `jobportal token`)."),
    }
}
