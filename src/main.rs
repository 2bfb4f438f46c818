use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "infra-widgets")]
#[command(version, about = "Infrastructure dashboard widgets")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding widgets.toml (defaults to the current directory)
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decorate log messages: link hashes, tasks, callsigns and code spans
    Decorate {
        /// Message to decorate. Reads one message per stdin line if omitted.
        message: Option<String>,
    },
    /// Render the container registry repositories and tags
    Registry {
        /// Registry API URL. Overrides widgets.toml and WIDGETS_REGISTRY_URL.
        #[arg(long)]
        url: Option<String>,
    },
    /// Render the list of servers managed by Salt
    Servers,
    /// Render the Salt states applied to one server
    States {
        /// Server id, as listed by `servers`
        server: String,
    },
    /// Serve the widgets over HTTP
    Serve {
        /// Port to serve on. Overrides widgets.toml.
        #[arg(short, long)]
        port: Option<u16>,

        /// Open the browser once the server starts
        #[arg(long)]
        open: bool,

        /// Enable dev mode (listen on all interfaces, permissive CORS)
        #[arg(long)]
        dev: bool,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default widgets.toml file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    infra_widgets::logging::init_logging(cli.verbose);

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match &cli.command {
        Commands::Decorate { message } => cmd::cmd_decorate(&project_dir, message.as_deref())?,
        Commands::Registry { url } => cmd::cmd_registry(&project_dir, url.as_deref()).await?,
        Commands::Servers => cmd::cmd_servers(&project_dir).await?,
        Commands::States { server } => cmd::cmd_states(&project_dir, server).await?,
        Commands::Serve { port, open, dev } => {
            cmd::cmd_serve(&project_dir, *port, *open, *dev).await?
        }
        Commands::Config { command } => cmd::cmd_config(&project_dir, command.clone())?,
    }

    Ok(())
}
