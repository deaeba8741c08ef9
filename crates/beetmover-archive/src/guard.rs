use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};

/// Fail when any path occurs twice across all archives extracted for `task_id`.
///
/// Only meaningful once every archive of the task has been extracted. Paths
/// are compared whole, so equal base names in different output directories
/// do not collide.
pub fn check_no_overwrite<P: AsRef<Path>>(task_id: &str, extracted_paths: &[P]) -> Result<()> {
    let mut seen = HashSet::with_capacity(extracted_paths.len());
    let mut reported = HashSet::new();
    let mut overwritten: Vec<PathBuf> = Vec::new();

    for path in extracted_paths.iter().map(AsRef::as_ref) {
        if !seen.insert(path) && reported.insert(path) {
            overwritten.push(path.to_path_buf());
        }
    }

    if !overwritten.is_empty() {
        warn!(task_id, paths = ?overwritten, "files were overwritten");
        return Err(Error::OverwrittenFile {
            task_id: task_id.to_string(),
            paths: overwritten,
        });
    }

    info!(task_id, files = seen.len(), "no file got overwritten");
    Ok(())
}
