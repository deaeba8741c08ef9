//! Inflating a checked archive next to itself and confirming what landed on disk.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::source::ArchiveSource;

const OUTPUT_SUFFIX: &str = ".out";

/// Directory an archive is inflated into: `<archive_path>.out`.
pub fn output_dir(archive_path: &Path) -> PathBuf {
    let mut dir = OsString::from(archive_path.as_os_str());
    dir.push(OUTPUT_SUFFIX);
    PathBuf::from(dir)
}

/// Inflate every entry of `source` into [`output_dir`] of `archive_path`.
///
/// Returns the absolute path of each of `expected_names` under the output
/// directory, in the order given.
pub fn extract<S, N>(archive_path: &Path, source: &mut S, expected_names: &[N]) -> Result<Vec<PathBuf>>
where
    S: ArchiveSource,
    N: AsRef<str>,
{
    if !archive_path.is_absolute() {
        return Err(Error::RelativePathNotSupported {
            path: archive_path.to_path_buf(),
        });
    }

    let destination = output_dir(archive_path);
    info!(
        archive = %archive_path.display(),
        destination = %destination.display(),
        "extracting archive"
    );
    fs::create_dir_all(&destination).map_err(|source| Error::DirectoryCreationFailed {
        path: destination.clone(),
        source,
    })?;

    let entries = source.entries()?;
    for entry in &entries {
        source.extract_entry(&entry.name, &destination)?;
    }
    info!(archive = %archive_path.display(), entries = entries.len(), "extracted archive");

    Ok(expected_names
        .iter()
        .map(|name| destination.join(name.as_ref()))
        .collect())
}

/// Check that every path exists and is a regular file.
///
/// Symlinks are not followed, so a link left in place of an expected file
/// counts as not regular.
pub fn verify_materialized<P: AsRef<Path>>(archive_path: &Path, expected_paths: &[P]) -> Result<()> {
    let mut missing = Vec::new();
    let mut irregular = Vec::new();

    for path in expected_paths.iter().map(AsRef::as_ref) {
        match fs::symlink_metadata(path) {
            Ok(metadata) if metadata.file_type().is_file() => {}
            Ok(_) => irregular.push(path.to_path_buf()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => missing.push(path.to_path_buf()),
            Err(source) => {
                return Err(Error::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }

    if !missing.is_empty() {
        return Err(Error::MissingOutputFile {
            archive: archive_path.to_path_buf(),
            missing,
        });
    }
    if !irregular.is_empty() {
        return Err(Error::NotARegularFile {
            archive: archive_path.to_path_buf(),
            paths: irregular,
        });
    }
    Ok(())
}
