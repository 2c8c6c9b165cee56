//! CLI entry point for the emoji backup tool.

use anyhow::Result;
use clap::Parser;
use emoji_backup_core::run_backup;
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = args.to_config();
    info!(target_dir = %config.target_dir.display(), "emoji backup starting");

    // Listing failures are fatal and surface here with the API message intact.
    let report = run_backup(&config).await?;

    info!(
        listed = report.listed,
        saved = report.downloads.saved(),
        existing = report.downloads.existing(),
        linked = report.aliases.linked,
        copied = report.aliases.copied,
        "backup complete"
    );

    let failed = report.failed();
    if failed > 0 {
        warn!(
            failed,
            "some emoji could not be backed up; re-run to retry the missing ones"
        );
    }

    Ok(())
}
