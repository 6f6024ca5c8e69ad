//! Command-line front end for the shortcode engine.
//!
//! # Usage
//!
//! ```bash
//! # Create a short link valid for one week
//! shortener shorten example.com/some/page --expires 7d --owner 42
//!
//! # Resolve a code (counts a click)
//! shortener resolve aB3xYz9
//!
//! # List an owner's links
//! shortener list --owner 42 --json
//!
//! # Apply migrations / check the connection
//! shortener db migrate
//! shortener db check
//! ```
//!
//! Configuration comes from the environment (and `.env`), see [`shortcode_engine::config`].

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use shortcode_engine::application::services::{ResolutionService, ShorteningService, StatsService};
use shortcode_engine::config::{self, Config};
use shortcode_engine::domain::click_worker::run_click_worker;
use shortcode_engine::infrastructure::persistence::{PgLinkRepository, pool};

/// Shortcode engine CLI.
#[derive(Parser)]
#[command(name = "shortener")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a short link
    Shorten {
        /// URL to shorten (scheme optional)
        url: String,

        /// Lifetime token: <N>m, <N>h, <N>d, <N>M or <N>y
        #[arg(short, long, default_value = "1d")]
        expires: String,

        /// Owner to attribute the link to
        #[arg(long)]
        owner: Option<i64>,
    },

    /// Resolve a short code and count a click
    Resolve {
        /// Short code
        code: String,
    },

    /// List an owner's links with click counts
    List {
        #[arg(long)]
        owner: i64,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Apply pending migrations
    Migrate,

    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    init_tracing(&config)?;
    config.print_summary();

    let pool = pool::connect(&config)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Shorten {
            url,
            expires,
            owner,
        } => shorten(&config, &pool, &url, &expires, owner).await?,
        Commands::Resolve { code } => resolve(&config, &pool, &code).await?,
        Commands::List { owner, json } => list(&pool, owner, json).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Installs the global subscriber. Logs go to stderr so command output stays clean.
fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("Invalid RUST_LOG filter '{}'", config.log_level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

fn link_repository(pool: &PgPool) -> Arc<PgLinkRepository> {
    Arc::new(PgLinkRepository::new(Arc::new(pool.clone())))
}

async fn shorten(
    config: &Config,
    pool: &PgPool,
    url: &str,
    expires: &str,
    owner: Option<i64>,
) -> Result<()> {
    let service =
        ShorteningService::new(link_repository(pool)).with_max_attempts(config.code_max_attempts);

    let link = service
        .shorten(url, expires, owner)
        .await
        .with_context(|| format!("Failed to shorten '{url}'"))?;

    println!("{}", "Short link created".green().bold());
    println!("  Code:    {}", link.code.bright_yellow().bold());
    println!("  URL:     {}", link.long_url.cyan());
    println!(
        "  Expires: {}",
        link.expires_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    Ok(())
}

/// Resolves through the click queue so the worker path is the one exercised.
async fn resolve(config: &Config, pool: &PgPool, code: &str) -> Result<()> {
    let repository = link_repository(pool);

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        repository.clone(),
        config.click_worker_concurrency,
    ));

    let service = ResolutionService::with_click_queue(repository, click_tx);
    let result = service.resolve(code).await;

    // Closing the queue lets the worker drain and exit.
    drop(service);
    worker.await.context("Click worker panicked")?;

    match result {
        Ok(long_url) => {
            println!("{long_url}");
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            eprintln!("{} {}", "Not found:".red().bold(), code);
            std::process::exit(1);
        }
        Err(e) => Err(e).with_context(|| format!("Failed to resolve '{code}'")),
    }
}

async fn list(pool: &PgPool, owner: i64, json: bool) -> Result<()> {
    let service = StatsService::new(link_repository(pool));
    let links = service
        .list_by_owner(owner)
        .await
        .context("Failed to list links")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
        return Ok(());
    }

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<9} {:<8} {:<20} {:<8} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Expires".bright_white().bold(),
        "Status".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "-".repeat(75).bright_black());

    for link in &links {
        let status = if link.is_expired() {
            "EXPIRED".red()
        } else {
            "ACTIVE".green()
        };

        println!(
            "  {:<9} {:<8} {:<20} {:<8} {}",
            link.code.cyan(),
            link.clicks,
            link.expires_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status,
            link.long_url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Migrate => {
            pool::run_migrations(pool)
                .await
                .context("Failed to apply migrations")?;
            println!("{}", "Migrations applied".green().bold());
        }
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
    }

    Ok(())
}
