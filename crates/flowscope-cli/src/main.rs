use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::Result;
use flowscope_core::{Config, RunState};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "flowscope")]
#[command(about = "List and draw the components of a NiFi flow", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args)]
struct GlobalArgs {
    /// Config file to use instead of the default locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// NiFi server URL, e.g. https://nifi.example.com:8443
    #[arg(long, global = true)]
    server: Option<String>,

    /// Bearer token for the NiFi API
    #[arg(long, global = true)]
    token: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Which components to look at and where their status comes from.
#[derive(Args)]
pub struct SelectArgs {
    /// Process group ids (defaults to the flow root)
    ids: Vec<String>,

    /// Comma-separated kinds, e.g. processor,inputport
    #[arg(long, conflicts_with = "all_types")]
    types: Option<String>,

    /// Include every kind, connections too
    #[arg(long)]
    all_types: bool,

    /// Only components whose name contains this text
    #[arg(long)]
    name: Option<String>,

    /// Read a saved status response instead of contacting the server
    #[arg(long)]
    file: Option<PathBuf>,

    /// Root process group id of the saved response
    #[arg(long, requires = "file")]
    root_id: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List components, one per line
    List {
        #[command(flatten)]
        select: SelectArgs,

        /// Only the requested groups and their direct children
        #[arg(long)]
        no_recursive: bool,

        /// Print a JSON array instead of lines
        #[arg(long)]
        json: bool,
    },
    /// Draw the ownership tree
    Tree {
        #[command(flatten)]
        select: SelectArgs,
    },
    /// Print a process group's entity as JSON
    Info {
        /// Process group id
        id: String,
    },
    /// Start every component of a process group
    Start {
        /// Process group id
        id: String,
    },
    /// Stop every component of a process group
    Stop {
        /// Process group id
        id: String,
    },
    /// Print the default configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let config = load_config(&cli.global)?;

    match cli.command {
        Commands::List {
            select,
            no_recursive,
            json,
        } => commands::list(&config, &select, !no_recursive, json).await,
        Commands::Tree { select } => commands::tree(&config, &select).await,
        Commands::Info { id } => commands::info(&config, &id).await,
        Commands::Start { id } => commands::set_state(&config, &id, RunState::Running).await,
        Commands::Stop { id } => commands::set_state(&config, &id, RunState::Stopped).await,
        Commands::Config => {
            print!("{}", Config::default_config_string());
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load configuration, then apply command line overrides.
fn load_config(global: &GlobalArgs) -> Result<Config> {
    let mut config = match &global.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    if let Some(server) = &global.server {
        config.server.url = server.clone();
    }
    if let Some(token) = &global.token {
        config.server.token = Some(token.clone());
    }
    if global.insecure {
        config.server.insecure = true;
    }

    config.validate()?;
    debug!(server = %config.server.url, "configuration loaded");
    Ok(config)
}
