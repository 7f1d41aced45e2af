use clap::Parser;
use jerry_discord::{Config, config, logging::init_logging, run_discord_bot};
use miette::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "jerry", about = "Jerry Discord bot", version)]
struct Cli {
    /// Path to the TOML config file (defaults to $JERRY_CONFIG, then jerry.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    config::load_dotenv();

    let config = Config::load(cli.config.as_deref())?;
    config.validate()?;

    let _guard = init_logging(&config.logging);
    info!(
        "Starting Jerry (game timeout {}s)",
        config.games.timeout_secs
    );

    run_discord_bot(config).await?;

    Ok(())
}
