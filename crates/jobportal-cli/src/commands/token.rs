//! Mint development session tokens.

use anyhow::Result;
use clap::Args;
use jobportal_core::auth::issue_token;
use jobportal_core::{Identity, Role};

#[derive(Args)]
pub struct TokenArgs {
    /// Identity the token names
    pub id: String,

    /// Role: candidate, employer or admin
    #[arg(long, default_value = "candidate")]
    pub role: String,

    /// Hours until the token expires
    #[arg(long, default_value_t = 24)]
    pub ttl_hours: i64,

    /// Secret shared with the server
    #[arg(long, env = "JOBPORTAL_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,
}

pub fn execute(args: TokenArgs) -> Result<()> {
    let identity = Identity::new(args.id, Role::from_str(&args.role))?;
    let token = issue_token(
        &args.jwt_secret,
        &identity,
        chrono::Duration::hours(args.ttl_hours),
    )?;
    println!("{}", token);
    Ok(())
}
