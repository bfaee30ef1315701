use anyhow::{Context, Result};
use clap::Parser;

use snapfeed::cli::Cli;
use snapfeed::{commands, logging};
use snapfeed_auth::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Dropping the guard at the end of main flushes the log file.
    let (log_path, _log_guard) = logging::init_logging(cli.verbose)?;
    tracing::debug!(log = %log_path.display(), "Logging initialized");

    let settings = Settings::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config))
        .inspect_err(|e| tracing::error!(error = ?e, "Startup failed"))?;
    let session = snapfeed_auth::connect(&settings)
        .inspect_err(|e| tracing::error!(error = %e, "Startup failed"))?;

    let output = commands::execute(cli.command, &session).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
