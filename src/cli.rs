//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use emoji_backup_core::{
    ApiToken, BackupConfig, DEFAULT_CONCURRENCY, DEFAULT_LISTING_ENDPOINT, DEFAULT_TARGET_DIR,
    LinkMode,
};

/// Back up a Slack workspace's custom emoji to local disk.
///
/// Downloads every custom emoji image into TARGET_DIR and recreates aliases
/// as hardlinks (or copies) of their target image. Files that already exist
/// are skipped, so re-running resumes an interrupted backup.
#[derive(Parser, Debug)]
#[command(name = "emoji-backup")]
#[command(author, version, about)]
pub struct Args {
    /// Slack API token with the emoji:read scope
    #[arg(short, long, env = "SLACK_API_TOKEN", hide_env_values = true)]
    pub token: ApiToken,

    /// Directory to write emoji into (created if missing)
    #[arg(default_value = DEFAULT_TARGET_DIR)]
    pub target_dir: PathBuf,

    /// Number of concurrent downloads (1-100)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,

    /// How alias files are created
    #[arg(long, value_enum, default_value_t = LinkModeArg::Auto)]
    pub link_mode: LinkModeArg,

    /// Emoji listing endpoint
    #[arg(long, default_value = DEFAULT_LISTING_ENDPOINT)]
    pub api_url: String,

    /// Connect timeout in seconds (0 to disable)
    #[arg(long, default_value_t = 30)]
    pub connect_timeout: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

/// CLI spelling of [`LinkMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LinkModeArg {
    /// Hardlink only
    Hardlink,
    /// Byte copy only
    Copy,
    /// Hardlink, copying when linking fails
    Auto,
}

impl From<LinkModeArg> for LinkMode {
    fn from(arg: LinkModeArg) -> Self {
        match arg {
            LinkModeArg::Hardlink => Self::HardLink,
            LinkModeArg::Copy => Self::Copy,
            LinkModeArg::Auto => Self::Auto,
        }
    }
}

impl Args {
    /// Converts parsed arguments into the library configuration.
    pub fn to_config(&self) -> BackupConfig {
        let connect_timeout =
            (self.connect_timeout > 0).then(|| Duration::from_secs(self.connect_timeout));
        BackupConfig::new(self.token.clone(), &self.target_dir)
            .with_concurrency(usize::from(self.concurrency))
            .with_link_mode(self.link_mode.into())
            .with_listing_endpoint(&self.api_url)
            .with_connect_timeout(connect_timeout)
    }
}
