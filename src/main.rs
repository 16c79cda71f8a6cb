//! sidebyside - compare two languages' solutions to the same task

use anyhow::Result;
use sidebyside::cli::{cache, extract, overlap, show_config, tasks, Cli, Commands};
use sidebyside::Config;
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Setup logging; stdout is reserved for command output
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = Config::resolve(cli.config.as_deref().map(Path::new))?;

    // Execute command
    match cli.command {
        Commands::Extract(args) => {
            extract(&config, &args.task, &args.lang1, &args.lang2, cli.format).await?;
        }

        Commands::Overlap(args) => {
            overlap(&config, &args.lang1, &args.lang2, cli.format).await?;
        }

        Commands::Tasks(args) => {
            tasks(&config, &args.language, cli.format).await?;
        }

        Commands::Cache(args) => {
            cache(&config, args.action, cli.format)?;
        }

        Commands::Config => {
            show_config(&config, cli.format)?;
        }
    }

    Ok(())
}
