//! Alias resolution: materializing `alias:` entries from downloaded images.
//!
//! Runs after the download phase has drained. Each alias is resolved to the
//! direct entry it ultimately points at, its file name is derived from that
//! entry's URL (so it inherits the extension), and the file is created as a
//! hardlink or copy of the target's file. Aliases are processed one at a
//! time; every failure is logged and counted, never returned.

mod link;

pub use link::LinkMode;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::download::{InvalidEmojiName, emoji_path};
use crate::slack::{EmojiListing, EmojiTarget};
use link::{MaterializeError, Materialized, materialize};

/// Errors for a single alias. Logged by the resolver, never propagated.
#[derive(Debug, Error)]
pub enum AliasError {
    /// The alias points at a name that is not in the listing
    /// (typically one of Slack's built-in emoji).
    #[error("alias {alias} points at unknown emoji {target}")]
    UnknownTarget {
        /// Alias name.
        alias: String,
        /// Referenced name.
        target: String,
    },

    /// Following the alias chain revisits a name.
    #[error("alias {alias} is part of an alias cycle")]
    Cycle {
        /// Alias name.
        alias: String,
    },

    /// The alias or target name cannot be used as a file name.
    #[error(transparent)]
    InvalidName(#[from] InvalidEmojiName),

    /// The target's image is not on disk (its download failed or was skipped).
    #[error("alias {alias}: target file {path} does not exist")]
    MissingTargetFile {
        /// Alias name.
        alias: String,
        /// Expected target path.
        path: PathBuf,
    },

    /// Creating the hardlink failed.
    #[error("failed to link {path}: {source}")]
    Link {
        /// Alias path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Copying the target's bytes failed.
    #[error("failed to copy to {path}: {source}")]
    Copy {
        /// Alias path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Checking for an existing file failed.
    #[error("IO error checking {path}: {source}")]
    Io {
        /// Path being checked.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// What happened to one alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasOutcome {
    /// The alias file already existed.
    Exists(PathBuf),
    /// Created as a hardlink of the target file.
    Linked(PathBuf),
    /// Created as a copy of the target file.
    Copied(PathBuf),
}

/// Counts from one alias pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AliasStats {
    /// Aliases created as hardlinks.
    pub linked: usize,
    /// Aliases created as copies.
    pub copied: usize,
    /// Aliases whose file already existed.
    pub existing: usize,
    /// Aliases that could not be materialized.
    pub failed: usize,
}

impl AliasStats {
    /// Total number of aliases processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.linked + self.copied + self.existing + self.failed
    }
}

/// Follows `alias -> target -> ...` to the first direct entry.
///
/// Returns `(direct_name, url)`.
///
/// # Errors
///
/// [`AliasError::UnknownTarget`] if a hop names an emoji missing from the
/// listing, [`AliasError::Cycle`] if the chain loops.
pub fn resolve_target<'a>(
    listing: &'a EmojiListing,
    alias: &str,
    target: &'a str,
) -> Result<(&'a str, &'a str), AliasError> {
    let mut seen = HashSet::from([alias]);
    let mut current = target;
    loop {
        if !seen.insert(current) {
            return Err(AliasError::Cycle {
                alias: alias.to_string(),
            });
        }
        match listing.target_of(current) {
            Some(EmojiTarget::Direct(url)) => return Ok((current, url)),
            Some(EmojiTarget::Alias(next)) => current = next,
            None => {
                return Err(AliasError::UnknownTarget {
                    alias: alias.to_string(),
                    target: current.to_string(),
                });
            }
        }
    }
}

/// Creates alias files next to the downloaded images.
#[derive(Debug, Clone)]
pub struct AliasResolver {
    target_dir: PathBuf,
    mode: LinkMode,
}

impl AliasResolver {
    /// Creates a resolver writing into `target_dir`.
    pub fn new(target_dir: impl Into<PathBuf>, mode: LinkMode) -> Self {
        Self {
            target_dir: target_dir.into(),
            mode,
        }
    }

    /// Materializes every alias in `listing`, in name order.
    #[instrument(skip(self, listing), fields(target_dir = %self.target_dir.display(), mode = %self.mode))]
    pub async fn resolve_aliases(&self, listing: &EmojiListing) -> AliasStats {
        let mut stats = AliasStats::default();

        for (name, target) in listing.alias_entries() {
            match self.resolve_one(listing, name, target).await {
                Ok(AliasOutcome::Exists(path)) => {
                    info!(emoji = name, path = %path.display(), "exists");
                    stats.existing += 1;
                }
                Ok(AliasOutcome::Linked(path)) => {
                    info!(emoji = name, path = %path.display(), "linked");
                    stats.linked += 1;
                }
                Ok(AliasOutcome::Copied(path)) => {
                    info!(emoji = name, path = %path.display(), "copied");
                    stats.copied += 1;
                }
                Err(e) => {
                    warn!(emoji = name, alias_target = target, error = %e, "alias failed");
                    stats.failed += 1;
                }
            }
        }

        info!(
            linked = stats.linked,
            copied = stats.copied,
            existing = stats.existing,
            failed = stats.failed,
            "aliases complete"
        );
        stats
    }

    /// Materializes a single alias `name -> alias:target`.
    ///
    /// # Errors
    ///
    /// Returns [`AliasError`] when the target cannot be resolved, its file is
    /// missing, or the alias file cannot be created.
    pub async fn resolve_one(
        &self,
        listing: &EmojiListing,
        name: &str,
        target: &str,
    ) -> Result<AliasOutcome, AliasError> {
        let (direct_name, url) = resolve_target(listing, name, target)?;
        let alias_path = emoji_path(&self.target_dir, name, url)?;

        if path_exists(&alias_path).await? {
            return Ok(AliasOutcome::Exists(alias_path));
        }

        let target_path = emoji_path(&self.target_dir, direct_name, url)?;
        if !path_exists(&target_path).await? {
            return Err(AliasError::MissingTargetFile {
                alias: name.to_string(),
                path: target_path,
            });
        }

        match materialize(&target_path, &alias_path, self.mode).await {
            Ok(Materialized::Linked) => Ok(AliasOutcome::Linked(alias_path)),
            Ok(Materialized::Copied) => Ok(AliasOutcome::Copied(alias_path)),
            Err(MaterializeError::AlreadyExists) => Ok(AliasOutcome::Exists(alias_path)),
            Err(MaterializeError::Link(source)) => Err(AliasError::Link {
                path: alias_path,
                source,
            }),
            Err(MaterializeError::Copy(source)) => Err(AliasError::Copy {
                path: alias_path,
                source,
            }),
        }
    }
}

async fn path_exists(path: &Path) -> Result<bool, AliasError> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|source| AliasError::Io {
            path: path.to_path_buf(),
            source,
        })
}
