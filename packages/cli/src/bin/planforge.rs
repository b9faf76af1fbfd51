use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;

use planforge_auth::SessionStore;
use planforge_cli::{run_server, Config};
use planforge_core::{classify, extract_business_type};
use planforge_storage::connect;

#[derive(Parser)]
#[command(name = "planforge")]
#[command(about = "Planforge - AI-assisted business plan service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
        /// Address to bind (overrides PLANFORGE_HOST)
        #[arg(long)]
        host: Option<String>,
    },
    /// Manage login sessions
    #[command(subcommand)]
    Session(SessionCommands),
    /// Show how a stage and business idea are classified
    Classify {
        /// Free-text business stage
        #[arg(long, default_value = "")]
        stage: String,
        /// Free-text business idea
        #[arg(long, default_value = "")]
        idea: String,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Issue a session token for a user
    Create {
        user_id: String,
        /// Lifetime in hours (overrides PLANFORGE_SESSION_TTL_HOURS)
        #[arg(long)]
        ttl_hours: Option<i64>,
    },
    /// Revoke a session by id
    Revoke { session_id: String },
    /// Delete expired and revoked sessions
    Purge,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve { port, host } => {
            let mut config = Config::from_env()?;
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            run_server(config).await
        }
        Commands::Session(session_cmd) => handle_session_command(session_cmd).await,
        Commands::Classify { stage, idea } => {
            println!("{} {}", "Category:".bold(), classify(&stage));
            println!("{} {}", "Business type:".bold(), extract_business_type(&idea));
            Ok(())
        }
    }
}

async fn handle_session_command(command: SessionCommands) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let pool = connect(&config.database_url, 1)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    let store = SessionStore::new(pool);

    match command {
        SessionCommands::Create { user_id, ttl_hours } => {
            let ttl = chrono::Duration::hours(ttl_hours.unwrap_or(config.session_ttl_hours));
            let issued = store.create_session(&user_id, ttl).await?;
            println!("{} {}", "Session created:".green().bold(), issued.session_id);
            println!("{} {}", "User:".bold(), issued.user_id);
            println!("{} {}", "Expires:".bold(), issued.expires_at.to_rfc3339());
            println!("{} {}", "Token:".bold(), issued.token);
            println!(
                "{}",
                "Store this token now; it cannot be shown again.".yellow()
            );
        }
        SessionCommands::Revoke { session_id } => {
            store.revoke(&session_id).await?;
            println!("{} {}", "Session revoked:".green().bold(), session_id);
        }
        SessionCommands::Purge => {
            let removed = store.purge_expired().await?;
            println!("{} {}", "Sessions removed:".green().bold(), removed);
        }
    }

    Ok(())
}
