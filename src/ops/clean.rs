//! Remove build outputs.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::Layout;
use crate::util::fs::remove_dir_all_if_exists;

/// Directories that were removed.
#[derive(Debug, Clone, Default)]
pub struct CleanResult {
    pub removed: Vec<PathBuf>,
}

/// Remove the build root and the managed staging directory.
pub fn clean(layout: &Layout) -> Result<CleanResult> {
    let mut result = CleanResult::default();

    for dir in [&layout.build_dir, &layout.managed_staging] {
        if dir.exists() {
            remove_dir_all_if_exists(dir)?;
            tracing::debug!("Removed {}", dir.display());
            result.removed.push(dir.clone());
        }
    }

    Ok(result)
}
