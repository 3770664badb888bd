use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, info};

use crate::error::Result;

/// Deletes every regular file under `dir` (recursively) last modified more
/// than `max_age` ago. Returns how many files were removed.
///
/// A missing directory is treated as empty. Symlinks are neither followed nor
/// removed.
pub fn sweep(dir: &Path, max_age: Duration) -> Result<usize> {
    sweep_at(dir, max_age, SystemTime::now())
}

fn sweep_at(dir: &Path, max_age: Duration, now: SystemTime) -> Result<usize> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut deleted = 0usize;
    for entry in entries {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();

        if file_type.is_dir() {
            deleted += sweep_at(&path, max_age, now)?;
        } else if file_type.is_file() {
            let modified = entry.metadata()?.modified()?;
            // Files stamped in the future have age zero.
            let age = now.duration_since(modified).unwrap_or_default();
            if age > max_age {
                fs::remove_file(&path)?;
                debug!("[ARCHIVE] deleted {} (age {}s)", path.display(), age.as_secs());
                deleted += 1;
            }
        }
    }

    if deleted > 0 {
        info!(deleted, "[ARCHIVE] swept {}: {deleted} old files removed", dir.display());
    }
    Ok(deleted)
}

/// Copies `report` into `dir` under the same file name, creating `dir` first
/// if needed. Returns the destination path.
pub fn copy_into(report: &Path, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let file_name = report.file_name().ok_or_else(|| {
        std::io::Error::new(
            ErrorKind::InvalidInput,
            format!("{} has no file name", report.display()),
        )
    })?;
    let dest = dir.join(file_name);
    fs::copy(report, &dest)?;
    info!("[ARCHIVE] copied report to {}", dest.display());
    Ok(dest)
}
