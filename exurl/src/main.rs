use clap::{Parser, Subcommand};
use exurl_core::config::ExurlConfig;
use exurl_core::logging::init_logging;
use exurl_core::{cli, server};
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "config/exurl.toml";

#[derive(Parser, Debug)]
#[command(
    name = "exurl",
    version,
    about = "exurl: redirect inspection and file relay edge service"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the exurl server (default)
    Run {
        /// Path to the exurl config file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Validate configuration and exit
    Check {
        /// Path to the exurl config file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Check { config }) => cli::check(&config),

        Some(Command::Run { config }) => start(config),

        None => start(PathBuf::from(DEFAULT_CONFIG)),
    }
}

fn start(config: PathBuf) -> anyhow::Result<()> {
    init_logging();

    let cfg = ExurlConfig::from_file(&config)?;
    tracing::info!(config = %config.display(), "config loaded");

    server::run(cfg)
}
