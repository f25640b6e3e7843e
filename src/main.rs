use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

/// arbe-events - Event registrations with capacity and waitlists
#[derive(Parser)]
#[command(name = "arbe-events")]
#[command(about = "Event registration service", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Manage events
    Event {
        #[command(subcommand)]
        command: cli::event::EventCommands,
    },
    /// Admin access
    Admin {
        #[command(subcommand)]
        command: cli::admin::AdminCommands,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = arbe_events::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    arbe_events::observability::init_observability(&config.observability)?;

    match cli.command {
        Commands::Serve { host, port } => cli::server::serve(config, host, port).await,
        Commands::Migrate => cli::migrate::migrate(&config).await,
        Commands::Reset => cli::migrate::reset(&config).await,
        Commands::Event { command } => cli::event::run(&config, command).await,
        Commands::Admin { command } => cli::admin::run(&config, command),
    }
}
