//! Autotemu Console Kernel
//!
//! Module registry, navigation composition and the console's HTTP API.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use clap::{Parser, Subcommand};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use autotemu_kernel::cli::{self, MenuTarget};
use autotemu_kernel::config::Config;
use autotemu_kernel::permissions::AccessChecks;
use autotemu_kernel::routes;
use autotemu_kernel::state::AppState;

/// Autotemu admin console.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Inspect registered modules.
    Modules {
        #[command(subcommand)]
        action: ModulesAction,
    },

    /// Print the navigation a session would see, as JSON.
    Menu {
        /// Compose as a superuser.
        #[arg(long)]
        superuser: bool,

        /// Session user id.
        #[arg(long)]
        user_id: Option<String>,

        /// Compose with no session at all.
        #[arg(long, conflicts_with_all = ["superuser", "user_id"])]
        no_session: bool,

        /// Current route, used to mark active entries.
        #[arg(long)]
        path: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ModulesAction {
    /// List every module and its status.
    List,
    /// Validate ids and access check references.
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_tracing();

    let config = Config::from_env().context("failed to load configuration")?;

    // Feature crates register their named access checks here.
    let checks = AccessChecks::new();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, checks).await,
        Command::Modules {
            action: ModulesAction::List,
        } => cli::cmd_modules_list(&config),
        Command::Modules {
            action: ModulesAction::Check,
        } => cli::cmd_modules_check(&config, &checks),
        Command::Menu {
            superuser,
            user_id,
            no_session,
            path,
        } => cli::cmd_menu(
            &config,
            &checks,
            &MenuTarget {
                no_session,
                user_id,
                superuser,
                path,
            },
        ),
    }
}

async fn serve(config: Config, checks: AccessChecks) -> Result<()> {
    info!(port = config.port, "Starting Autotemu console");

    let state = AppState::new(&config, checks).context("failed to initialize application state")?;

    let app = routes::router(state).layer(build_cors_layer(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    if config.cors_allowed_origins.len() == 1 && config.cors_allowed_origins[0] == "*" {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
