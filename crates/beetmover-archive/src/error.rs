use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "archive '{path}' is too big: {size_mb} MB exceeds the accepted maximum of {max_size_mb} MB"
    )]
    OversizeArchive {
        path: PathBuf,
        size_mb: u64,
        max_size_mb: u64,
    },

    #[error("archive '{path}' is not a valid zip file: {reason}")]
    MalformedArchive { path: PathBuf, reason: String },

    #[error(
        "in archive '{archive}', compressed file '{entry}' is too big: {size_mb} MB exceeds the accepted maximum of {max_size_mb} MB"
    )]
    OversizeEntry {
        archive: PathBuf,
        entry: String,
        size_mb: u64,
        max_size_mb: u64,
    },

    #[error(
        "in archive '{archive}', file '{entry}' has a suspicious compression ratio: {uncompressed_size} bytes from {compressed_size} compressed bytes exceeds {max_ratio}x"
    )]
    SuspiciousCompressionRatio {
        archive: PathBuf,
        entry: String,
        compressed_size: u64,
        uncompressed_size: u64,
        max_ratio: f64,
    },

    #[error("expected files for archive '{archive}' contain duplicates: {names:?}")]
    DuplicateExpectedFile { archive: PathBuf, names: Vec<String> },

    #[error("archive '{archive}' lists the same entry more than once: {names:?}")]
    DuplicateEntry { archive: PathBuf, names: Vec<String> },

    #[error("archive '{archive}' contains an absolute path: '{entry}'")]
    AbsolutePath { archive: PathBuf, entry: String },

    #[error("archive '{archive}' contains an unsafe path: '{entry}' (normalized: '{normalized}')")]
    UnsafePath {
        archive: PathBuf,
        entry: String,
        normalized: String,
    },

    #[error(
        "archive '{archive}' contains unexpected files: {unexpected:?} (expected files missing: {missing:?})"
    )]
    UnexpectedFile {
        archive: PathBuf,
        unexpected: Vec<String>,
        missing: Vec<String>,
    },

    #[error("archive '{archive}' is missing expected files: {missing:?}")]
    MissingFile { archive: PathBuf, missing: Vec<String> },

    #[error("extraction of '{archive}' did not produce expected files: {missing:?}")]
    MissingOutputFile {
        archive: PathBuf,
        missing: Vec<PathBuf>,
    },

    #[error("extraction of '{archive}' produced paths that are not regular files: {paths:?}")]
    NotARegularFile { archive: PathBuf, paths: Vec<PathBuf> },

    #[error("archives of task '{task_id}' overwrote files: {paths:?}")]
    OverwrittenFile { task_id: String, paths: Vec<PathBuf> },

    #[error("archive path '{path}' is relative; extraction requires an absolute path")]
    RelativePathNotSupported { path: PathBuf },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to create directory: {path}: {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Fieldless tag of an [`Error`], for callers that branch on the failure kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OversizeArchive,
    MalformedArchive,
    OversizeEntry,
    SuspiciousCompressionRatio,
    DuplicateExpectedFile,
    DuplicateEntry,
    AbsolutePath,
    UnsafePath,
    UnexpectedFile,
    MissingFile,
    MissingOutputFile,
    NotARegularFile,
    OverwrittenFile,
    RelativePathNotSupported,
    Io,
}

/// Broad grouping of error kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Authoring mistake upstream of the archive (manifest or task payload).
    Manifest,
    /// Hostile or corrupt container.
    Safety,
    /// Listing does not match the expected files.
    Conformance,
    /// Filesystem state after extraction is not what was expected.
    PostExtraction,
    /// Caller broke the API contract.
    Usage,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OversizeArchive { .. } => ErrorKind::OversizeArchive,
            Self::MalformedArchive { .. } => ErrorKind::MalformedArchive,
            Self::OversizeEntry { .. } => ErrorKind::OversizeEntry,
            Self::SuspiciousCompressionRatio { .. } => ErrorKind::SuspiciousCompressionRatio,
            Self::DuplicateExpectedFile { .. } => ErrorKind::DuplicateExpectedFile,
            Self::DuplicateEntry { .. } => ErrorKind::DuplicateEntry,
            Self::AbsolutePath { .. } => ErrorKind::AbsolutePath,
            Self::UnsafePath { .. } => ErrorKind::UnsafePath,
            Self::UnexpectedFile { .. } => ErrorKind::UnexpectedFile,
            Self::MissingFile { .. } => ErrorKind::MissingFile,
            Self::MissingOutputFile { .. } => ErrorKind::MissingOutputFile,
            Self::NotARegularFile { .. } => ErrorKind::NotARegularFile,
            Self::OverwrittenFile { .. } => ErrorKind::OverwrittenFile,
            Self::RelativePathNotSupported { .. } => ErrorKind::RelativePathNotSupported,
            Self::ExtractionFailed { .. }
            | Self::DirectoryCreationFailed { .. }
            | Self::Read { .. }
            | Self::Io(_) => ErrorKind::Io,
        }
    }
}

impl ErrorKind {
    pub fn category(self) -> Category {
        match self {
            Self::DuplicateExpectedFile => Category::Manifest,
            Self::OversizeArchive
            | Self::MalformedArchive
            | Self::OversizeEntry
            | Self::SuspiciousCompressionRatio => Category::Safety,
            Self::DuplicateEntry
            | Self::AbsolutePath
            | Self::UnsafePath
            | Self::UnexpectedFile
            | Self::MissingFile => Category::Conformance,
            Self::MissingOutputFile | Self::NotARegularFile | Self::OverwrittenFile => {
                Category::PostExtraction
            }
            Self::RelativePathNotSupported => Category::Usage,
            Self::Io => Category::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
