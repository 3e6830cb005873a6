//! Panel CLI - session client for the Antizapret admin panel API.
//!
//! Logs in, keeps the session token on disk between runs, verifies it with
//! the server and runs navigations through the panel's route guard.

use panel::commands::{self, navigation, session};
use panel::error::PanelError;
use panel::logger::initialize as LoggerInitialize;
use panel::state::AppState;

use session_core::config::PanelConfig;

use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};
use serde::Serialize;

const LOG_DIR_NAME: &str = "logs";

#[derive(Parser)]
#[command(name = "panel")]
#[command(author, version, about = "Antizapret panel session client", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding config.json and logs (or set PANEL_CONFIG_DIR env var)
    #[arg(long, env = "PANEL_CONFIG_DIR", global = true)]
    config_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Show debug logs on stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(long, short)]
        username: String,

        /// Password (or set PANEL_PASSWORD env var)
        #[arg(long, short, env = "PANEL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Drop the stored session
    Logout,

    /// Check the stored session with the server
    Verify,

    /// Navigate to a path through the route guard
    Navigate {
        /// Target path, e.g. /settings
        path: String,
    },

    /// Show the current session
    Status,

    /// List the route table
    Routes,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), PanelError> {
    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => PanelConfig::default_dir()
            .ok_or_else(|| PanelError::panel("Could not determine a config directory, pass --config-dir"))?,
    };

    LoggerInitialize(&config_dir.join(LOG_DIR_NAME), cli.verbose)?;
    info!("Panel CLI starting, config directory: {}", config_dir.display());

    let state = AppState::load(&config_dir)?;
    let json = cli.json;

    match cli.command {
        Commands::Login { username, password } => {
            let report = session::login(&state, &username, &password).await?;
            print_output(&report, json)
        }
        Commands::Logout => print_output(&session::logout(&state), json),
        Commands::Verify => {
            let outcome = session::verify(&state).await;
            if json {
                print_json(&format!("{outcome:?}"))
            } else {
                println!("{}", session::describe_outcome(outcome));
                Ok(())
            }
        }
        Commands::Navigate { path } => print_output(&navigation::navigate(&state, &path)?, json),
        Commands::Status => print_output(&session::status(&state), json),
        Commands::Routes => {
            let routes: Vec<commands::RouteSummary> = navigation::routes(&state);
            if json {
                print_json(&routes)
            } else {
                for route in &routes {
                    println!("{route}");
                }
                Ok(())
            }
        }
    }
}

fn print_output<T: Serialize + Display>(value: &T, json: bool) -> Result<(), PanelError> {
    if json {
        print_json(value)
    } else {
        println!("{value}");
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), PanelError> {
    let output = serde_json::to_string_pretty(value)
        .map_err(|e| PanelError::panel(format!("Failed to serialize output: {e}")))?;
    println!("{output}");
    Ok(())
}
