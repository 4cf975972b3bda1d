//! ContentLayer CLI - inspect and toggle content packages
//!
//! A thin host over the `contentlayer` library: lists and toggles packages,
//! resolves content paths and loads campaigns the way the game would.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use console::style;
use contentlayer::config::ConfigFile;
use contentlayer::logging::{init_logging, LoggingConfig};

use commands::campaigns::CampaignsCommands;
use commands::common::{CommandContext, DirOverrides};
use commands::config::ConfigCommands;
use commands::packages::PackagesCommands;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "contentlayer", version, about, long_about = None)]
struct Cli {
    /// Installed base game content directory (overrides content.base_dir)
    #[arg(long, global = true, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// User data directory holding Mods/ and TexturePacks/ (overrides content.data_dir)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage content packages
    #[command(subcommand)]
    Packages(PackagesCommands),

    /// Show the file a content path resolves to
    Resolve {
        /// Logical content path, e.g. Sounds/alarm.ogg
        path: String,
    },

    /// List and load campaigns
    #[command(subcommand)]
    Campaigns(CampaignsCommands),

    /// View or change configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    let loaded = ConfigFile::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.app_dirs().user_data_path());
    let mut logging = LoggingConfig::from_config(&config, data_dir);
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    let _guard = init_logging(&logging);
    if let Err(e) = &loaded {
        tracing::warn!(error = %e, "Ignoring unreadable configuration, using defaults");
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style("error:").red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let overrides = DirOverrides {
        base_dir: cli.base_dir,
        data_dir: cli.data_dir,
    };

    match cli.command {
        Commands::Packages(command) => {
            commands::packages::run(command, &CommandContext::load(&overrides)?)
        }
        Commands::Resolve { path } => {
            commands::resolve::run(&path, &CommandContext::load(&overrides)?)
        }
        Commands::Campaigns(command) => {
            commands::campaigns::run(command, &CommandContext::load(&overrides)?)
        }
        Commands::Config(command) => commands::config::run(command),
    }
}
