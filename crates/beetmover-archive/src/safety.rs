//! Size and structure checks that run before any entry is inflated.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::entry::EntryMetadata;
use crate::error::{Error, Result};
use crate::format::{self, ArchiveFormat};
use crate::limits::{Limits, bytes_to_mb};

/// Check the archive file itself: size ceiling first, then container structure.
///
/// The size is read from file metadata, so an oversized file is rejected
/// without reading any of it.
pub fn validate_container(path: &Path, limits: &Limits) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let size_mb = bytes_to_mb(metadata.len());

    if size_mb > limits.max_size_mb {
        warn!(
            archive = %path.display(),
            size_mb,
            max_size_mb = limits.max_size_mb,
            "archive exceeds size ceiling"
        );
        return Err(Error::OversizeArchive {
            path: path.to_path_buf(),
            size_mb,
            max_size_mb: limits.max_size_mb,
        });
    }

    let file = File::open(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    let malformed = |reason: String| Error::MalformedArchive {
        path: path.to_path_buf(),
        reason,
    };

    match format::detect_from_reader(&mut reader)? {
        Some(ArchiveFormat::Zip) => {}
        None => return Err(malformed("unrecognized file signature".into())),
    }
    zip::ZipArchive::new(reader).map_err(|e| malformed(e.to_string()))?;

    info!(archive = %path.display(), size_mb, "structure of archive is sane");
    Ok(())
}

/// Check every listed entry against the compressed-size ceiling and the
/// compression ratio ceiling.
pub fn validate_entries(archive: &Path, entries: &[EntryMetadata], limits: &Limits) -> Result<()> {
    debug!(
        archive = %archive.display(),
        entries = entries.len(),
        max_uncompressed_entry_bytes = limits.max_uncompressed_entry_bytes(),
        "checking entry sizes"
    );

    for entry in entries {
        let size_mb = bytes_to_mb(entry.compressed_size);
        if size_mb > limits.max_size_mb {
            warn!(
                archive = %archive.display(),
                entry = %entry.name,
                size_mb,
                max_size_mb = limits.max_size_mb,
                "compressed entry exceeds size ceiling"
            );
            return Err(Error::OversizeEntry {
                archive: archive.to_path_buf(),
                entry: entry.name.clone(),
                size_mb,
                max_size_mb: limits.max_size_mb,
            });
        }

        let ratio = entry.compression_ratio();
        if ratio > limits.max_compression_ratio {
            warn!(
                archive = %archive.display(),
                entry = %entry.name,
                compressed_size = entry.compressed_size,
                uncompressed_size = entry.uncompressed_size,
                max_ratio = limits.max_compression_ratio,
                "entry compression ratio is suspicious"
            );
            return Err(Error::SuspiciousCompressionRatio {
                archive: archive.to_path_buf(),
                entry: entry.name.clone(),
                compressed_size: entry.compressed_size,
                uncompressed_size: entry.uncompressed_size,
                max_ratio: limits.max_compression_ratio,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const MB: u64 = 1024 * 1024;

    fn archive() -> &'static Path {
        Path::new("/some/archive.zip")
    }

    #[test]
    fn decent_sizes_pass() {
        let entries = [
            EntryMetadata::new("file1", 1000, 1000),
            EntryMetadata::new("file2", 1000, 2000),
        ];
        validate_entries(archive(), &entries, &Limits::new(100)).unwrap();
    }

    #[test]
    fn small_files_may_grow_when_compressed() {
        let entries = [EntryMetadata::new("file1", 50, 10)];
        validate_entries(archive(), &entries, &Limits::new(100)).unwrap();
    }

    #[test]
    fn compressed_entry_over_ceiling_fails() {
        let entries = [EntryMetadata::new("file1", 101 * MB, 101 * MB)];
        let err = validate_entries(archive(), &entries, &Limits::new(100)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OversizeEntry);

        let entries = [EntryMetadata::new("file1", 2 * MB, 2 * MB)];
        let err = validate_entries(archive(), &entries, &Limits::new(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OversizeEntry);
    }

    #[test]
    fn compressed_entry_at_ceiling_passes() {
        let entries = [EntryMetadata::new("file1", MB, MB)];
        validate_entries(archive(), &entries, &Limits::new(1)).unwrap();
    }

    #[test]
    fn zip_bomb_ratio_fails() {
        let entries = [EntryMetadata::new("file1", 100, MB)];
        let err = validate_entries(archive(), &entries, &Limits::new(100)).unwrap_err();
        assert!(matches!(
            err,
            Error::SuspiciousCompressionRatio {
                compressed_size: 100,
                uncompressed_size: MB,
                ..
            }
        ));
    }

    #[test]
    fn ratio_boundary_is_inclusive() {
        let entries = [EntryMetadata::new("file1", 100, 1000)];
        validate_entries(archive(), &entries, &Limits::new(100)).unwrap();

        let entries = [EntryMetadata::new("file1", 100, 1001)];
        let err = validate_entries(archive(), &entries, &Limits::new(100)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SuspiciousCompressionRatio);
    }

    #[test]
    fn zero_length_stored_entry_passes() {
        let entries = [EntryMetadata::new("empty", 0, 0)];
        validate_entries(archive(), &entries, &Limits::new(1)).unwrap();
    }

    #[test]
    fn content_from_zero_compressed_bytes_fails() {
        let entries = [EntryMetadata::new("phantom", 0, 1)];
        let err = validate_entries(archive(), &entries, &Limits::new(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SuspiciousCompressionRatio);
    }

    #[test]
    fn custom_ratio_ceiling() {
        let entries = [EntryMetadata::new("file1", 100, 1500)];
        let limits = Limits::new(100).max_compression_ratio(20.0);
        validate_entries(archive(), &entries, &limits).unwrap();
    }

    #[test]
    fn missing_archive_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_container(&dir.path().join("absent.zip"), &Limits::new(1)).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn oversize_archive_is_rejected_before_sniffing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.zip");
        fs::write(&path, vec![0u8; (2 * MB) as usize]).unwrap();

        let err = validate_container(&path, &Limits::new(1)).unwrap_err();
        assert!(matches!(
            err,
            Error::OversizeArchive {
                size_mb: 2,
                max_size_mb: 1,
                ..
            }
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.zip");
        fs::write(&path, [0xDE, 0xAD, 0xBE, 0xEF]).unwrap();

        let err = validate_container(&path, &Limits::new(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedArchive);
    }

    #[test]
    fn truncated_zip_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("truncated.zip");
        let mut data = vec![0x50, 0x4B, 0x03, 0x04];
        data.extend_from_slice(&[0u8; 60]);
        fs::write(&path, data).unwrap();

        let err = validate_container(&path, &Limits::new(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedArchive);
    }
}
