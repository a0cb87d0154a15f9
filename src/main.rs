// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! EmployWise console
//!
//! Command-line front end for managing users behind the reqres demo API.
//! The session token persists between invocations, so `login` once and the
//! other commands reuse it until `logout`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use employwise::{
    config::Config,
    error::AppError,
    models::{PageState, User, UserUpdate},
    services::{ChannelNotifier, FileTokenStore, Level, Notification},
    AppState,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "employwise")]
#[command(version, about = "EmployWise user management console", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Remote API base URL (overrides EMPLOYWISE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides EMPLOYWISE_SESSION_FILE)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session token
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "EMPLOYWISE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the session token
    Logout,
    /// Show whether a session is active
    Status,
    /// List one page of users, optionally filtered
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Case-insensitive match on first name, last name or email (loaded page only)
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a single user
    Show {
        id: u64,
    },
    /// Edit a user on the given page
    Edit {
        id: u64,

        /// Page the user is listed on
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a user on the given page
    Delete {
        id: u64,

        /// Page the user is listed on
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api_url = url.trim_end_matches('/').to_string();
    }
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }
    tracing::debug!(api_url = %config.api_url, "Starting EmployWise console");

    let store = Arc::new(FileTokenStore::new(&config.session_file));
    let (notifier, mut notifications) = ChannelNotifier::new();
    let state = AppState::new(config, store, Arc::new(notifier))?;

    let result = run(&state, cli.command).await;

    while let Ok(notification) = notifications.try_recv() {
        print_notification(&notification);
    }

    result
}

async fn run(state: &AppState, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            if !state.session.login(&email, &password).await {
                bail!("Login failed");
            }
        }
        Commands::Logout => state.session.logout().await,
        Commands::Status => {
            if state.session.is_authenticated().await {
                println!("Logged in ({})", state.config.api_url);
            } else {
                println!("Not logged in");
            }
        }
        Commands::List { page, search } => {
            require_login(state).await?;
            if let Some(query) = search {
                state.users.set_search_query(query).await;
            }
            let fetched = state.users.fetch_page(page).await;
            // The stale-but-visible page is still worth printing on failure.
            render_page(&state.users.snapshot().await);
            fetched.map_err(explain)?;
        }
        Commands::Show { id } => {
            require_login(state).await?;
            let user = state.users.fetch_record(id).await.map_err(explain)?;
            render_user(&user);
        }
        Commands::Edit {
            id,
            page,
            first_name,
            last_name,
            email,
        } => {
            require_login(state).await?;
            state.users.fetch_page(page).await.map_err(explain)?;
            let update = UserUpdate {
                first_name,
                last_name,
                email,
            };
            let user = state
                .users
                .update_record(id, update)
                .await
                .map_err(|e| explain_on_page(e, page))?;
            render_user(&user);
        }
        Commands::Delete { id, page } => {
            require_login(state).await?;
            state.users.fetch_page(page).await.map_err(explain)?;
            state
                .users
                .delete_record(id)
                .await
                .map_err(|e| explain_on_page(e, page))?;
            render_page(&state.users.snapshot().await);
        }
    }
    Ok(())
}

/// Stand-in for redirecting to the login screen.
async fn require_login(state: &AppState) -> Result<()> {
    if !state.session.is_authenticated().await {
        bail!("Not logged in. Run `employwise login` first.");
    }
    Ok(())
}

fn explain(error: AppError) -> anyhow::Error {
    if error.is_unauthorized() {
        return anyhow::Error::new(error)
            .context("The session was rejected; run `employwise login` again");
    }
    anyhow::Error::new(error)
}

fn explain_on_page(error: AppError, page: u32) -> anyhow::Error {
    if let AppError::UnknownRecord(id) = error {
        return anyhow::anyhow!("User {} is not on page {}; pass --page", id, page);
    }
    explain(error)
}

fn render_page(state: &PageState) {
    if let Some(error) = &state.error_message {
        println!("{}", error);
    }

    println!("{}", state.summary());
    for user in state.filtered() {
        println!("{}", user_line(&user));
    }

    if state.no_matches() {
        println!("No users found matching your search.");
    }

    if state.pagination_visible() {
        println!(
            "Page {} of {}{}{}",
            state.current_page,
            state.total_pages,
            if state.has_previous() { "  [--page N-1]" } else { "" },
            if state.has_next() { "  [--page N+1]" } else { "" },
        );
    }
}

fn user_line(user: &User) -> String {
    format!(
        "{:>4}  [{:<2}] {:<24} {}",
        user.id,
        user.initials(),
        user.full_name(),
        user.email
    )
}

fn render_user(user: &User) {
    println!("{}", user_line(user));
    println!("      avatar: {}", user.avatar);
}

fn print_notification(notification: &Notification) {
    let tag = match notification.level {
        Level::Success => "ok",
        Level::Info => "info",
        Level::Error => "error",
    };
    eprintln!("[{}] {}", tag, notification.message);
}

/// Initialize logging to stderr. `EMPLOYWISE_LOG_FORMAT=json` switches to JSON lines.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("employwise=info,warn"));

    let json = std::env::var("EMPLOYWISE_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
