mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();
    let config = config::Config::load()?;

    match cli.command {
        cli::Commands::Build(args) => commands::build::handle(args, &config).await,
        cli::Commands::Export(args) => commands::export::handle(args, &config).await,
        cli::Commands::Serve(args) => commands::serve::handle(args, &config).await,
    }
}
