mod commands;
mod config;
mod console;
mod poll;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ansible_sync::AnsibleState;
use fluence_api::FluenceClient;

use crate::config::Config;
use crate::console::StdConsole;

#[derive(Parser)]
#[command(name = "fvm", about = "Provision and manage Fluence VMs for an AR.IO node fleet")]
struct Cli {
    /// Path to the YAML config file
    #[arg(short, long, default_value = "fluence-vm.yml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a VM and wait for it to become active
    Create { name: String },
    /// Show active and launching VMs
    List,
    /// Interactively pick a VM and delete it
    Delete,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Usage errors exit 1, not clap's default 2.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let client = FluenceClient::new(config.api_key.clone());
    let state = AnsibleState::new();

    match cli.command {
        Commands::Create { name } => commands::create::run(&client, &config, &state, &name).await,
        Commands::List => commands::list::run(&client).await,
        Commands::Delete => commands::delete::run(&client, &state, &mut StdConsole).await,
    }
}
