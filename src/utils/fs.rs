//! File system utilities
//!
//! The rendered output is written atomically: the content goes to a temporary
//! file in the destination directory, is synced, and is then renamed over the
//! destination. A failed write never leaves a truncated file behind.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `content` to `path`.
///
/// The parent directory must already exist; it is not created. An existing
/// file at `path` is replaced.
///
/// # Errors
///
/// Returns an error if the parent directory is missing or not writable, or if
/// writing, syncing or renaming the temporary file fails.
///
/// # Examples
///
/// ```rust,no_run
/// use ctxgen_cli::utils::fs::atomic_write;
/// use std::path::Path;
///
/// atomic_write(Path::new("context.md"), b"Hello Ada")?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in: {}", parent.display()))?;

    temp.write_all(content)
        .with_context(|| format!("Failed to write to temp file: {}", temp.path().display()))?;

    temp.as_file().sync_all().with_context(|| "Failed to sync file to disk")?;

    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    tracing::debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
