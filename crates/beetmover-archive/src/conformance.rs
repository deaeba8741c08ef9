//! Exact match between an archive's listing and the files it is expected to hold.

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::sanitize::{is_absolute_entry_name, is_unsafe_entry_name, normalize_entry_name};

/// Check that `entry_names` is exactly `expected_names`, with no unsafe names.
///
/// Absolute and unsafe names fail on the first offender. Unexpected names are
/// collected over the whole listing and reported together with any expected
/// names that are missing.
pub fn validate_contents<E, X>(archive: &Path, entry_names: &[E], expected_names: &[X]) -> Result<()>
where
    E: AsRef<str>,
    X: AsRef<str>,
{
    let duplicated_expected = duplicates(expected_names);
    if !duplicated_expected.is_empty() {
        return Err(Error::DuplicateExpectedFile {
            archive: archive.to_path_buf(),
            names: duplicated_expected,
        });
    }

    let duplicated_entries = duplicates(entry_names);
    if !duplicated_entries.is_empty() {
        warn!(archive = %archive.display(), names = ?duplicated_entries, "duplicate entries");
        return Err(Error::DuplicateEntry {
            archive: archive.to_path_buf(),
            names: duplicated_entries,
        });
    }

    let expected: HashSet<&str> = expected_names.iter().map(AsRef::as_ref).collect();
    let mut unexpected = Vec::new();

    for name in entry_names.iter().map(AsRef::as_ref) {
        if is_absolute_entry_name(name) {
            warn!(archive = %archive.display(), entry = name, "absolute entry name");
            return Err(Error::AbsolutePath {
                archive: archive.to_path_buf(),
                entry: name.to_string(),
            });
        }

        if is_unsafe_entry_name(name) {
            let normalized = normalize_entry_name(name);
            warn!(archive = %archive.display(), entry = name, %normalized, "unsafe entry name");
            return Err(Error::UnsafePath {
                archive: archive.to_path_buf(),
                entry: name.to_string(),
                normalized,
            });
        }

        if !expected.contains(name) {
            unexpected.push(name.to_string());
        }
    }

    let present: HashSet<&str> = entry_names.iter().map(AsRef::as_ref).collect();
    let missing: Vec<String> = expected_names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !present.contains(name))
        .map(str::to_string)
        .collect();

    if !unexpected.is_empty() {
        warn!(
            archive = %archive.display(),
            unexpected = ?unexpected,
            missing = ?missing,
            "archive holds unexpected files"
        );
        return Err(Error::UnexpectedFile {
            archive: archive.to_path_buf(),
            unexpected,
            missing,
        });
    }

    if !missing.is_empty() {
        warn!(archive = %archive.display(), missing = ?missing, "archive misses expected files");
        return Err(Error::MissingFile {
            archive: archive.to_path_buf(),
            missing,
        });
    }

    info!(archive = %archive.display(), files = entry_names.len(), "content of archive is sane");
    Ok(())
}

/// Names that occur more than once, each reported once, in first-repeat order.
pub(crate) fn duplicates<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut repeated = Vec::new();

    for name in names.iter().map(AsRef::as_ref) {
        if !seen.insert(name) && reported.insert(name) {
            repeated.push(name.to_string());
        }
    }

    repeated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn check(files_in_archive: &[&str], expected_files: &[&str]) -> Result<()> {
        validate_contents(Path::new("/some/archive.zip"), files_in_archive, expected_files)
    }

    #[test]
    fn exact_match_passes() {
        check(&["some_file", "some/other/file"], &["some_file", "some/other/file"]).unwrap();
    }

    #[test]
    fn order_does_not_matter() {
        check(&["b", "a"], &["a", "b"]).unwrap();
    }

    #[test]
    fn empty_archive_with_nothing_expected_passes() {
        check(&[], &[]).unwrap();
    }

    #[test]
    fn absolute_path_fails() {
        let err = check(&["/some/absolute/path"], &["/some/absolute/path"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AbsolutePath);
    }

    #[test]
    fn redundant_separators_fail() {
        let err = check(&["some/.///redundant/path"], &["some/.///redundant/path"]).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsafePath { ref normalized, .. } if normalized == "some/redundant/path"
        ));
    }

    #[test]
    fn traversal_fails() {
        let err = check(&["some/../../../etc/passwd"], &["some/../../../etc/passwd"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsafePath);

        let err = check(&["../etc/passwd"], &["../etc/passwd"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsafePath);
    }

    #[test]
    fn directory_entries_fail() {
        let err = check(&["some/", "some/file"], &["some/file"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsafePath);
    }

    #[test]
    fn wrong_file_reports_both_sides() {
        let err = check(&["some_file", "some_wrong_file"], &["some_file", "some_other_file"])
            .unwrap_err();
        match err {
            Error::UnexpectedFile {
                unexpected,
                missing,
                ..
            } => {
                assert_eq!(unexpected, vec!["some_wrong_file".to_string()]);
                assert_eq!(missing, vec!["some_other_file".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_fails() {
        let err = check(&["some_file"], &["some_file", "some_missing_file"]).unwrap_err();
        match err {
            Error::MissingFile { missing, .. } => {
                assert_eq!(missing, vec!["some_missing_file".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unexpected_file_fails() {
        let err = check(&["some_file", "some_unexpected_file"], &["some_file"]).unwrap_err();
        match err {
            Error::UnexpectedFile {
                unexpected,
                missing,
                ..
            } => {
                assert_eq!(unexpected, vec!["some_unexpected_file".to_string()]);
                assert!(missing.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_expected_files_fail() {
        let err = check(&["a"], &["a", "b", "a", "b", "a"]).unwrap_err();
        match err {
            Error::DuplicateExpectedFile { names, .. } => {
                assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_entries_fail() {
        let err = check(&["a", "a"], &["a"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateEntry);
    }

    #[test]
    fn duplicates_empty_for_unique_names() {
        assert!(duplicates(&["a", "b", "c"]).is_empty());
    }
}
