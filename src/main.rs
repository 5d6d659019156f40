//! Console front end for shortlink.
//!
//! With no subcommand the binary enters an interactive menu bound to a fresh
//! random session owner. Subcommands exist for scripted use; pass `--owner`
//! (or set `SHORTLINK_OWNER`) to act as a stable identity across invocations.
//!
//! # Usage
//!
//! ```bash
//! # Interactive menu
//! shortlink
//!
//! # One-shot commands
//! shortlink --owner 6f9e...c1 create https://example.com --max-clicks 5
//! shortlink --owner 6f9e...c1 open Ab3xY_9
//! shortlink --owner 6f9e...c1 list --json
//! shortlink --owner 6f9e...c1 edit Ab3xY_9 --ttl-hours 48
//! shortlink --owner 6f9e...c1 delete Ab3xY_9
//! shortlink cleanup
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: SQLite connection string (default `sqlite://shortlink.db?mode=rwc`)
//! - `LINK_TTL_HOURS`, `DEFAULT_MAX_CLICKS`, `CLEANUP_INTERVAL_SECONDS`
//! - `SHORTLINK_OWNER`: owner UUID used when `--owner` is not given

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Select};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use shortlink::application::services::LinkService;
use shortlink::config::Config;
use shortlink::domain::entities::Link;
use shortlink::domain::repositories::LinkRepository;
use shortlink::error::AppError;
use shortlink::infrastructure::browser::BrowserLauncher;
use shortlink::state::AppState;

/// Personal short-link manager.
#[derive(Parser)]
#[command(name = "shortlink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Owner identity for this invocation. A fresh random UUID when omitted.
    #[arg(short, long, env = "SHORTLINK_OWNER", global = true)]
    owner: Option<Uuid>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a short link for a URL
    Create {
        /// Target URL (must have a scheme and a host)
        url: String,

        /// Click budget; configured default when omitted
        #[arg(short, long)]
        max_clicks: Option<u32>,
    },

    /// Open a short link in the browser
    Open {
        /// Short code to redeem
        code: String,
    },

    /// List links owned by the current session
    List {
        /// Print machine-readable JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Change a link's TTL and/or click budget
    Edit {
        /// Short code to edit
        code: String,

        /// New TTL in hours, measured from now
        #[arg(long)]
        ttl_hours: Option<u32>,

        /// New click budget
        #[arg(long)]
        max_clicks: Option<u32>,
    },

    /// Delete a link
    Delete {
        /// Short code to delete
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Remove all expired links now
    Cleanup,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let state = AppState::connect(&config).await?;
    let service = state.link_service.clone();

    let owner = cli.owner.unwrap_or_else(Uuid::new_v4);

    match cli.command {
        Some(Commands::Create { url, max_clicks }) => {
            create_link(&service, owner, &url, max_clicks).await;
        }
        Some(Commands::Open { code }) => {
            open_link(&service, owner, &code).await;
        }
        Some(Commands::List { json }) => {
            list_links(&service, owner, json).await;
        }
        Some(Commands::Edit {
            code,
            ttl_hours,
            max_clicks,
        }) => {
            edit_link(&service, owner, &code, ttl_hours, max_clicks).await;
        }
        Some(Commands::Delete { code, yes }) => {
            delete_link(&service, owner, &code, yes).await?;
        }
        Some(Commands::Cleanup) => {
            cleanup(&service).await;
        }
        None => {
            run_menu(&config, service, owner).await?;
        }
    }

    Ok(())
}

/// Interactive menu loop with a background expiry sweep.
async fn run_menu<R, B>(config: &Config, service: Arc<LinkService<R, B>>, owner: Uuid) -> Result<()>
where
    R: LinkRepository + 'static,
    B: BrowserLauncher + 'static,
{
    spawn_cleanup_task(config, service.clone());

    println!("{}", "shortlink".bright_blue().bold());
    println!("Session owner: {}", owner.to_string().bright_yellow());
    println!();

    loop {
        let choice = Select::new()
            .with_prompt("What would you like to do?")
            .items(&[
                "Create link",
                "Open link",
                "My links",
                "Edit link",
                "Delete link",
                "Cleanup expired",
                "Quit",
            ])
            .default(0)
            .interact()?;

        match choice {
            0 => {
                let url: String = Input::new().with_prompt("Target URL").interact_text()?;
                let max_clicks = prompt_optional_u32("Click budget (empty for default)")?;
                create_link(&service, owner, url.trim(), max_clicks).await;
            }
            1 => {
                let code: String = Input::new().with_prompt("Short code").interact_text()?;
                open_link(&service, owner, code.trim()).await;
            }
            2 => {
                list_links(&service, owner, false).await;
            }
            3 => {
                let code: String = Input::new().with_prompt("Short code").interact_text()?;
                let ttl = prompt_optional_u32("New TTL in hours (empty to keep)")?;
                let max = prompt_optional_u32("New click budget (empty to keep)")?;
                edit_link(&service, owner, code.trim(), ttl, max).await;
            }
            4 => {
                let code: String = Input::new().with_prompt("Short code").interact_text()?;
                delete_link(&service, owner, code.trim(), false).await?;
            }
            5 => {
                cleanup(&service).await;
            }
            _ => break,
        }

        println!();
    }

    Ok(())
}

/// Runs the expiry sweep every `cleanup_interval_seconds` for the lifetime of
/// the menu session.
fn spawn_cleanup_task<R, B>(config: &Config, service: Arc<LinkService<R, B>>)
where
    R: LinkRepository + 'static,
    B: BrowserLauncher + 'static,
{
    let period = std::time::Duration::from_secs(config.cleanup_interval_seconds);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            if let Err(e) = service.cleanup_expired_links().await {
                tracing::warn!(error = %e, "expiry sweep failed");
            }
        }
    });
}

fn prompt_optional_u32(prompt: &str) -> Result<Option<u32>> {
    let raw: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;

    if raw.trim().is_empty() {
        return Ok(None);
    }

    match raw.trim().parse() {
        Ok(n) => Ok(Some(n)),
        Err(_) => {
            println!("{} Not a number, ignoring", "⚠".yellow());
            Ok(None)
        }
    }
}

async fn create_link<R, B>(
    service: &LinkService<R, B>,
    owner: Uuid,
    url: &str,
    max_clicks: Option<u32>,
) where
    R: LinkRepository,
    B: BrowserLauncher,
{
    match service.create_link(owner, url, max_clicks).await {
        Ok(link) => {
            println!("{} Link created: {}", "✔".green(), link.short_code.bold());
            println!("  Expires at:   {}", link.expires_at);
            println!("  Click budget: {}", link.max_clicks);
        }
        Err(e) => print_error(&e),
    }
}

async fn open_link<R, B>(service: &LinkService<R, B>, owner: Uuid, code: &str)
where
    R: LinkRepository,
    B: BrowserLauncher,
{
    match service.open_link(owner, code).await {
        Ok(link) => {
            println!(
                "{} Opened {} ({}/{})",
                "⮕".green(),
                link.original_url,
                link.current_clicks,
                link.max_clicks
            );
        }
        Err(e) => print_error(&e),
    }
}

async fn list_links<R, B>(service: &LinkService<R, B>, owner: Uuid, json: bool)
where
    R: LinkRepository,
    B: BrowserLauncher,
{
    match service.list_links(owner).await {
        Ok(links) if json => match serde_json::to_string_pretty(&links) {
            Ok(out) => println!("{out}"),
            Err(e) => println!("{} Failed to serialize links: {e}", "✖".red()),
        },
        Ok(links) => {
            if links.is_empty() {
                println!("No links yet");
                return;
            }

            for link in links {
                println!("{}", format_link(&link));
            }
        }
        Err(e) => print_error(&e),
    }
}

async fn edit_link<R, B>(
    service: &LinkService<R, B>,
    owner: Uuid,
    code: &str,
    ttl_hours: Option<u32>,
    max_clicks: Option<u32>,
) where
    R: LinkRepository,
    B: BrowserLauncher,
{
    if ttl_hours.is_none() && max_clicks.is_none() {
        println!("{} Nothing to change", "⚠".yellow());
        return;
    }

    match service.edit_link(owner, code, ttl_hours, max_clicks).await {
        Ok(link) => {
            println!("{} Link updated", "✔".green());
            println!("{}", format_link(&link));
        }
        Err(e) => print_error(&e),
    }
}

async fn delete_link<R, B>(
    service: &LinkService<R, B>,
    owner: Uuid,
    code: &str,
    skip_confirm: bool,
) -> Result<()>
where
    R: LinkRepository,
    B: BrowserLauncher,
{
    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete link '{code}'?"))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Cancelled");
            return Ok(());
        }
    }

    match service.delete_link(owner, code).await {
        Ok(()) => println!("{} Link deleted", "✔".green()),
        Err(e) => print_error(&e),
    }

    Ok(())
}

async fn cleanup<R, B>(service: &LinkService<R, B>)
where
    R: LinkRepository,
    B: BrowserLauncher,
{
    match service.cleanup_expired_links().await {
        Ok(removed) => println!("{} Removed {} expired link(s)", "✔".green(), removed),
        Err(e) => print_error(&e),
    }
}

fn format_link(link: &Link) -> String {
    let status = if link.can_be_used() {
        "active".green()
    } else if link.is_expired() {
        "expired".red()
    } else {
        "inactive".red()
    };

    format!(
        "  {}  {}  {}/{}  expires {}  [{}]",
        link.short_code.bold(),
        link.original_url,
        link.current_clicks,
        link.max_clicks,
        link.expires_at,
        status
    )
}

/// Prints a failure the way the menu reports it: expected outcomes get a
/// short status line, infrastructure problems also reach the log.
fn print_error(err: &AppError) {
    match err {
        AppError::Validation { .. } | AppError::Conflict { .. } => {
            println!("{} {err}", "✖".red());
        }
        AppError::NotFound { .. } => {
            println!("{} Link not found", "✖".red());
        }
        AppError::PermissionDenied { .. } => {
            println!("{} You do not have access to this link", "✖".red());
        }
        AppError::Gone { .. } => {
            println!("{} {err}", "⚠".yellow());
        }
        AppError::Infrastructure { .. } => {
            tracing::error!(error = %err, "operation failed");
            println!("{} {err}", "✖".red());
        }
    }
}
