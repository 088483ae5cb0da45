//! Notification server command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use jobportal_core::notification::DEFAULT_RETENTION_DAYS;
use jobportal_db::DEFAULT_REDIS_URL;
use jobportal_web::config::DEFAULT_PORT;
use jobportal_web::ServerConfig;
use std::path::PathBuf;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "JOBPORTAL_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "JOBPORTAL_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Redis connection URL
    #[arg(long, env = "REDIS_URL", default_value = DEFAULT_REDIS_URL)]
    pub redis_url: String,

    /// Keep notifications in memory instead of Redis
    #[arg(long)]
    pub memory: bool,

    /// Secret used to verify session tokens
    #[arg(long, env = "JOBPORTAL_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Shared secret required on /internal routes
    #[arg(long, env = "JOBPORTAL_INTERNAL_TOKEN", hide_env_values = true)]
    pub internal_token: Option<String>,

    /// Days a read notification is kept
    #[arg(
        long,
        env = "JOBPORTAL_RETENTION_DAYS",
        default_value_t = DEFAULT_RETENTION_DAYS,
        value_parser = clap::value_parser!(i64).range(1..)
    )]
    pub retention_days: i64,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file used with --log
    #[arg(long, default_value = "logs/jobportal.log")]
    pub log_file: PathBuf,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let (pool, store) = if args.memory {
        (jobportal_db::memory_pool(), "memory".to_string())
    } else {
        let pool = jobportal_db::init_pool(&args.redis_url)
            .await
            .with_context(|| format!("Failed to connect to Redis at {}", args.redis_url))?;
        (pool, args.redis_url.clone())
    };

    let mut config = ServerConfig::new(args.jwt_secret);
    config.host = args.host;
    config.port = args.port;
    config.internal_token = args.internal_token.filter(|t| !t.is_empty());
    config.retention_days = args.retention_days;

    println!();
    println!("  {} {}", "Job Portal".cyan().bold(), "Notification Server".bold());
    println!();
    println!("  {}        http://{}:{}", "API".green(), config.host, config.port);
    println!("  {}  ws://{}:{}/ws", "WebSocket".green(), config.host, config.port);
    println!("  {}      {}", "Store".green(), store);
    if config.internal_token.is_none() {
        println!(
            "  {}",
            "Internal routes are open (no --internal-token)".yellow()
        );
    }
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    jobportal_web::run_server(pool, config).await
}
