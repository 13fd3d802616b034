use anyhow::Result;
use clap::{Parser, Subcommand};
use repairdesk_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "repairdesk")]
#[command(about = "Repair-shop search, quote calling and booking service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        #[arg(short, long, default_value = "3001")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Print persisted quote-call sessions as JSON
    Sessions,
    /// Print persisted bookings as JSON
    Bookings,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(config, &host, port).await?,
        Commands::Sessions => commands::sessions::print_call_sessions(&config).await?,
        Commands::Bookings => commands::sessions::print_bookings(&config).await?,
    }

    Ok(())
}
