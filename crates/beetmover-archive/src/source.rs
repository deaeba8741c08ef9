use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::entry::EntryMetadata;
use crate::error::{Error, Result};
use crate::sanitize::resolve_under;

/// The two things validation and extraction need from an archive.
pub trait ArchiveSource {
    /// List every entry with its sizes, in central-directory order.
    fn entries(&mut self) -> Result<Vec<EntryMetadata>>;

    /// Inflate the entry called `name` to the matching path under `destination`.
    fn extract_entry(&mut self, name: &str, destination: &Path) -> Result<PathBuf>;
}

pub struct ZipSource<R: Read + Seek> {
    path: PathBuf,
    archive: zip::ZipArchive<R>,
}

impl ZipSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(path, BufReader::new(file))
    }
}

impl<R: Read + Seek> ZipSource<R> {
    /// `path` names the archive in errors; `reader` supplies its bytes.
    pub fn new(path: &Path, reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader).map_err(|e| malformed(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }
}

fn malformed(path: &Path, e: zip::result::ZipError) -> Error {
    Error::MalformedArchive {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

impl<R: Read + Seek> ArchiveSource for ZipSource<R> {
    fn entries(&mut self) -> Result<Vec<EntryMetadata>> {
        let mut entries = Vec::with_capacity(self.archive.len());
        for index in 0..self.archive.len() {
            let file = self
                .archive
                .by_index_raw(index)
                .map_err(|e| malformed(&self.path, e))?;
            entries.push(EntryMetadata::new(
                file.name(),
                file.compressed_size(),
                file.size(),
            ));
        }
        Ok(entries)
    }

    fn extract_entry(&mut self, name: &str, destination: &Path) -> Result<PathBuf> {
        let target = resolve_under(&self.path, name, destination)?;
        let mut file = self
            .archive
            .by_name(name)
            .map_err(|e| malformed(&self.path, e))?;

        if file.is_dir() {
            ensure_directory(&target)?;
            return Ok(target);
        }

        if let Some(parent) = target.parent() {
            ensure_directory(parent)?;
        }

        let mut out = File::create(&target).map_err(|source| Error::ExtractionFailed {
            path: target.clone(),
            source,
        })?;
        // Read one byte past the declared size to catch entries that lie about it.
        let declared = file.size();
        let written = io::copy(&mut (&mut file).take(declared.saturating_add(1)), &mut out)
            .map_err(|source| Error::ExtractionFailed {
                path: target.clone(),
                source,
            })?;
        if written > declared {
            warn!(
                archive = %self.path.display(),
                entry = name,
                declared_size = declared,
                "entry inflates past its declared size"
            );
            return Err(Error::MalformedArchive {
                path: self.path.clone(),
                reason: format!("entry '{name}' inflates past its declared size of {declared} bytes"),
            });
        }

        debug!(entry = name, target = %target.display(), bytes = written, "inflated entry");
        Ok(target)
    }
}

fn ensure_directory(path: &Path) -> Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|source| Error::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
