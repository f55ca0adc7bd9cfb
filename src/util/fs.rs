//! Filesystem utilities.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Recursively copy a directory.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)
        .with_context(|| format!("failed to create directory: {}", dst.display()))?;

    for entry in fs::read_dir(src)
        .with_context(|| format!("failed to read directory: {}", src.display()))?
    {
        let entry = entry?;
        let ty = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if ty.is_dir() {
            copy_dir_all(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    src_path.display(),
                    dst_path.display()
                )
            })?;
        }
    }
    Ok(())
}

/// Copy every entry of `src` into `dst`: files one by one, directories
/// recursively. Returns the number of top-level entries copied.
pub fn copy_entries(src: &Path, dst: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in fs::read_dir(src)
        .with_context(|| format!("failed to read directory: {}", src.display()))?
    {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_dir_all(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    src_path.display(),
                    dst_path.display()
                )
            })?;
        }
        count += 1;
    }
    Ok(count)
}

/// Move every entry of `src` into `dst`, replacing entries of the same name.
///
/// Falls back to copy-then-delete when a rename crosses filesystems.
pub fn move_entries(src: &Path, dst: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in fs::read_dir(src)
        .with_context(|| format!("failed to read directory: {}", src.display()))?
    {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let is_dir = entry.file_type()?.is_dir();

        if dst_path.is_dir() {
            fs::remove_dir_all(&dst_path)?;
        } else if dst_path.exists() {
            fs::remove_file(&dst_path)?;
        }

        if fs::rename(&src_path, &dst_path).is_err() {
            if is_dir {
                copy_dir_all(&src_path, &dst_path)?;
                fs::remove_dir_all(&src_path)?;
            } else {
                fs::copy(&src_path, &dst_path).with_context(|| {
                    format!(
                        "failed to move {} to {}",
                        src_path.display(),
                        dst_path.display()
                    )
                })?;
                fs::remove_file(&src_path)?;
            }
        }
        count += 1;
    }
    Ok(count)
}

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Remove `path` if present and create it again, empty.
pub fn recreate_dir(path: &Path) -> Result<()> {
    remove_dir_all_if_exists(path)?;
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

/// Whether a directory has no entries. A missing directory counts as empty.
pub fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    let mut entries = fs::read_dir(path)
        .with_context(|| format!("failed to read directory: {}", path.display()))?;
    Ok(entries.next().is_none())
}
