//! CLI administration tool for linkdash.
//!
//! Inspects and moderates links directly against the database, without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Generate an admin bearer token and its ADMIN_TOKEN digest
//! cargo run --bin admin -- token create
//!
//! # Inspect a link
//! cargo run --bin admin -- link show my-link
//!
//! # Suspend, reactivate or delete a link
//! cargo run --bin admin -- link status my-link suspended
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components: PostgreSQL connection (link/db commands)
//! - `ADMIN_TOKEN_SECRET`: HMAC key (token command)

use linkdash::application::services::{AdminAuth, LinkService};
use linkdash::config::{Config, mask_connection_string};
use linkdash::domain::entities::{Link, LinkStatus};
use linkdash::domain::repositories::{LinkRepository, ReportRepository};
use linkdash::infrastructure::persistence::{PgLinkRepository, PgReportRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkdash.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Admin API token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Inspect and moderate links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Generate a bearer token and print its ADMIN_TOKEN digest
    Create {
        /// Custom token value (auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Show a link by short code
    Show { code: String },

    /// Change a link's status
    Status {
        code: String,

        /// active, suspended or deleted
        #[arg(value_parser = parse_status)]
        status: LinkStatus,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

fn parse_status(s: &str) -> Result<LinkStatus, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Token { action } => handle_token_action(action)?,
        Commands::Link { action } => handle_link_action(action, &connect().await?).await?,
        Commands::Db { action } => handle_db_action(action, &connect().await?).await?,
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let database_url = Config::load_database_url()?;

    PgPool::connect(&database_url)
        .await
        .with_context(|| format!("Failed to connect to {}", mask_connection_string(&database_url)))
}

fn handle_token_action(action: TokenAction) -> Result<()> {
    let TokenAction::Create { token } = action;

    let secret = std::env::var("ADMIN_TOKEN_SECRET")
        .ok()
        .filter(|s| !s.is_empty())
        .context("ADMIN_TOKEN_SECRET must be set")?;

    let token_value = match token {
        Some(t) => {
            println!("{}", "Using provided token value".yellow());
            t
        }
        None => generate_token(),
    };

    let digest = AdminAuth::new(secret, None)?
        .digest(&token_value)
        .map_err(|e| anyhow::anyhow!("Failed to hash token: {}", e))?;

    println!("{}", "Admin token".bright_blue().bold());
    println!();
    println!("  Token:       {}", token_value.bright_yellow().bold());
    println!("  ADMIN_TOKEN: {}", digest.cyan());
    println!();
    println!(
        "{}",
        "Save the token now. Only the digest goes into the server environment."
            .red()
            .bold()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -X PUT -H \"Authorization: Bearer {}\" -H 'Content-Type: application/json' \\",
        token_value.bright_yellow()
    );
    println!(
        "       -d '{{\"status\":\"suspended\"}}' http://localhost:3000/api/admin/links/<id>/status"
    );
    println!();

    Ok(())
}

async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
    let report_repository = PgReportRepository::new(pool);

    match action {
        LinkAction::Show { code } => {
            let link = find_link(link_repository.as_ref(), &code).await?;
            let reports = report_repository
                .count_for_code(&code)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to count reports: {}", e))?;

            print_link(&link);
            println!("  Reports:     {}", reports.to_string().bright_white());
            println!();
        }
        LinkAction::Status { code, status, yes } => {
            let link = find_link(link_repository.as_ref(), &code).await?;
            print_link(&link);

            if link.status == status {
                println!("{}", format!("Link is already {status}").yellow());
                return Ok(());
            }

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Change status {} -> {}?", link.status, status))
                    .default(status != LinkStatus::Deleted)
                    .interact()?;

                if !confirmed {
                    println!("{}", "Cancelled".red());
                    return Ok(());
                }
            }

            let service = LinkService::new(link_repository);
            let updated = service
                .set_status(link.id, status)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to change status: {}", e))?;

            println!(
                "{}",
                format!("Status is now {}", updated.status).green().bold()
            );
        }
    }

    Ok(())
}

async fn find_link(repository: &PgLinkRepository, code: &str) -> Result<Link> {
    repository
        .find_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("No link with code '{code}'"))
}

fn print_link(link: &Link) {
    let status = match link.status {
        LinkStatus::Active => link.status.as_str().green(),
        LinkStatus::Suspended => link.status.as_str().yellow(),
        LinkStatus::Deleted => link.status.as_str().red(),
    };

    println!("{}", link.short_code.bright_blue().bold());
    println!("  ID:          {}", link.id.to_string().bright_black());
    println!("  Destination: {}", link.original_url.cyan());
    if let Some(title) = &link.title {
        println!("  Title:       {}", title);
    }
    println!("  Type:        {}", link.redirect_type);
    println!("  Status:      {}", status);
    println!("  Clicks:      {}", link.clicks.to_string().bright_white());
    println!(
        "  Owner:       {}",
        link.owner.as_deref().unwrap_or("anonymous").bright_black()
    );
    println!(
        "  Created:     {}",
        link.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
    );
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
                .fetch_one(pool)
                .await?;
            let reports: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_reports")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Links:      {}", links.to_string().bright_green().bold());
            println!("  Reports:    {}", reports.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}

/// Generates a random 48-character alphanumeric token.
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
