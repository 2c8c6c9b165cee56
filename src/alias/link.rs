//! Materializing an alias file from its target's file.

use std::fmt;
use std::io::ErrorKind;
use std::path::Path;

use tokio::fs::{File, OpenOptions};
use tracing::{debug, warn};

/// How alias files are created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkMode {
    /// Hardlink only; failures are reported.
    HardLink,
    /// Byte-for-byte copy only.
    Copy,
    /// Hardlink, falling back to a copy when linking fails
    /// (e.g. filesystems without hardlink support).
    #[default]
    Auto,
}

impl LinkMode {
    /// Returns the CLI string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HardLink => "hardlink",
            Self::Copy => "copy",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an alias file ended up on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Materialized {
    Linked,
    Copied,
}

/// Why materializing failed; carries which strategy was last attempted.
#[derive(Debug)]
pub(crate) enum MaterializeError {
    /// The destination appeared before it could be created.
    AlreadyExists,
    Link(std::io::Error),
    Copy(std::io::Error),
}

/// Creates `dest` with the same bytes as `source`, never overwriting `dest`.
pub(crate) async fn materialize(
    source: &Path,
    dest: &Path,
    mode: LinkMode,
) -> Result<Materialized, MaterializeError> {
    match mode {
        LinkMode::HardLink => hard_link(source, dest).await,
        LinkMode::Copy => copy_new(source, dest).await,
        LinkMode::Auto => match hard_link(source, dest).await {
            Err(MaterializeError::Link(e)) => {
                debug!(error = %e, dest = %dest.display(), "hardlink failed, copying instead");
                copy_new(source, dest).await
            }
            other => other,
        },
    }
}

async fn hard_link(source: &Path, dest: &Path) -> Result<Materialized, MaterializeError> {
    match tokio::fs::hard_link(source, dest).await {
        Ok(()) => Ok(Materialized::Linked),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(MaterializeError::AlreadyExists),
        Err(e) => Err(MaterializeError::Link(e)),
    }
}

async fn copy_new(source: &Path, dest: &Path) -> Result<Materialized, MaterializeError> {
    let mut reader = File::open(source).await.map_err(MaterializeError::Copy)?;
    let mut writer = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(MaterializeError::AlreadyExists);
        }
        Err(e) => return Err(MaterializeError::Copy(e)),
    };

    let copied = async {
        tokio::io::copy(&mut reader, &mut writer).await?;
        writer.sync_all().await
    }
    .await;

    if let Err(e) = copied {
        drop(writer);
        // A leftover partial file would be mistaken for a finished alias.
        if let Err(cleanup) = tokio::fs::remove_file(dest).await {
            warn!(path = %dest.display(), error = %cleanup, "failed to remove partial alias file");
        }
        return Err(MaterializeError::Copy(e));
    }
    Ok(Materialized::Copied)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_link_mode_display_and_default() {
        assert_eq!(LinkMode::HardLink.to_string(), "hardlink");
        assert_eq!(LinkMode::Copy.to_string(), "copy");
        assert_eq!(LinkMode::Auto.to_string(), "auto");
        assert_eq!(LinkMode::default(), LinkMode::Auto);
    }

    #[tokio::test]
    async fn test_materialize_hardlink_shares_content() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("smile.png");
        let dest = temp_dir.path().join("grin.png");
        std::fs::write(&source, b"smile-bytes").unwrap();

        let result = materialize(&source, &dest, LinkMode::HardLink).await.unwrap();

        assert_eq!(result, Materialized::Linked);
        assert_eq!(std::fs::read(&dest).unwrap(), b"smile-bytes");
    }

    #[tokio::test]
    async fn test_materialize_copy_duplicates_content() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("smile.png");
        let dest = temp_dir.path().join("grin.png");
        std::fs::write(&source, b"smile-bytes").unwrap();

        let result = materialize(&source, &dest, LinkMode::Copy).await.unwrap();

        assert_eq!(result, Materialized::Copied);
        assert_eq!(std::fs::read(&dest).unwrap(), b"smile-bytes");
    }

    #[tokio::test]
    async fn test_materialize_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("smile.png");
        let dest = temp_dir.path().join("grin.png");
        std::fs::write(&source, b"new").unwrap();
        std::fs::write(&dest, b"old").unwrap();

        for mode in [LinkMode::HardLink, LinkMode::Copy, LinkMode::Auto] {
            let result = materialize(&source, &dest, mode).await;
            assert!(matches!(result, Err(MaterializeError::AlreadyExists)), "{mode}");
        }
        assert_eq!(std::fs::read(&dest).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_materialize_auto_falls_back_to_copy() {
        // Linking a directory fails on every platform; copying it fails too,
        // but the error must come from the copy attempt.
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("dir");
        std::fs::create_dir(&source).unwrap();
        let dest = temp_dir.path().join("alias.png");

        let result = materialize(&source, &dest, LinkMode::Auto).await;

        assert!(matches!(result, Err(MaterializeError::Copy(_))), "got {result:?}");
        assert!(!dest.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_copy_failure_removes_partial_alias() {
        // Opening a directory succeeds on unix but reading it fails, so the
        // destination is created and must be cleaned up again.
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("dir");
        std::fs::create_dir(&source).unwrap();
        let dest = temp_dir.path().join("alias.gif");

        let result = materialize(&source, &dest, LinkMode::Copy).await;

        assert!(matches!(result, Err(MaterializeError::Copy(_))), "got {result:?}");
        assert!(!dest.exists());
    }
}
