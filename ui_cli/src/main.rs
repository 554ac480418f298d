// Glue utilities CLI
//
// Command-line front end for the ORC client, the Datahose client, the Docker
// image builder and the JSON API server.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use observability::{init_tracing, TracingConfig};
use user_config::UserConfig;

mod commands;
mod error;
mod output;

use commands::{build, hose, orc, serve};

#[derive(Parser)]
#[command(name = "dal")]
#[command(version = "0.1.0")]
#[command(about = "Glue utilities - ORC, Datahose, Docker builds and a JSON API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: $XDG_CONFIG_HOME/dalloriam/config.toml)
    #[arg(long, global = true, env = "DAL_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Debug logging for the glue crates
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API
    Serve(serve::ServeArgs),

    /// Talk to the ORC server
    Orc(orc::OrcArgs),

    /// Push an event to Datahose
    Push(hose::PushArgs),

    /// Send a notification through Datahose
    Notify(hose::NotifyArgs),

    /// Build a Docker image
    Build(build::BuildArgs),
}

/// How command results are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

const GLUE_CRATES: &[&str] = &[
    "ui_cli",
    "json_api",
    "orc_client",
    "datahose_client",
    "docker_builder",
    "tower_http",
];

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let tracing_config = if cli.verbose {
        TracingConfig::verbose_for(GLUE_CRATES)
    } else if matches!(cli.command, Commands::Serve(_)) {
        TracingConfig::default()
    } else {
        TracingConfig {
            default_directive: "warn".to_string(),
            ..TracingConfig::default()
        }
    };
    init_tracing(&tracing_config)?;

    let config_path = match cli.config {
        Some(path) => path,
        None => UserConfig::default_path()?,
    };
    let config = UserConfig::load_or_default(&config_path)?;
    tracing::debug!("Using config {:?}", config_path);

    match cli.command {
        Commands::Serve(args) => serve::execute(args, &config).await,
        Commands::Orc(args) => orc::execute(args, &config, cli.format).await,
        Commands::Push(args) => hose::execute_push(args, &config).await,
        Commands::Notify(args) => hose::execute_notify(args, &config).await,
        Commands::Build(args) => build::execute(args, &config).await,
    }
}
