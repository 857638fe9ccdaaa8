mod args;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let filter = match cli.verbose {
        0 => "yt2flac=info",
        1 => "yt2flac=debug",
        2 => "yt2flac=trace",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Some(Commands::Doctor) => commands::doctor::run().await,
        Some(Commands::Config) => commands::config::run(cli.config.as_deref()).await,
        None => {
            commands::convert::run(
                cli.url.as_deref(),
                cli.output.as_deref(),
                cli.keep_temp,
                cli.config.as_deref(),
            )
            .await
        }
    }
}
