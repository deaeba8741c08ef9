use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Lexically normalize a `/`-separated entry name.
///
/// Drops `.` and empty segments and folds `..` into the preceding segment.
/// Leading `..` segments of a relative name are kept. One or three-plus
/// leading slashes collapse to one, exactly two are kept, and an empty
/// result is `.`.
pub fn normalize_entry_name(name: &str) -> String {
    if name.is_empty() {
        return ".".into();
    }

    let leading_slashes = if name.starts_with("//") && !name.starts_with("///") {
        2
    } else if name.starts_with('/') {
        1
    } else {
        0
    };

    let mut parts: Vec<&str> = Vec::new();
    for part in name.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if leading_slashes == 0 && parts.last().is_none_or(|last| *last == "..") {
                    parts.push("..");
                } else {
                    parts.pop();
                }
            }
            other => parts.push(other),
        }
    }

    let normalized = format!("{}{}", "/".repeat(leading_slashes), parts.join("/"));
    if normalized.is_empty() {
        ".".into()
    } else {
        normalized
    }
}

/// Whether `name` is absolute on either a POSIX or a Windows reading.
pub fn is_absolute_entry_name(name: &str) -> bool {
    name.starts_with('/') || Path::new(name).has_root() || Path::new(name).is_absolute()
}

/// Whether `name` carries anything that could move a write outside its
/// extraction directory or hide its real target.
pub fn is_unsafe_entry_name(name: &str) -> bool {
    name.contains('\\')
        || name.contains('\0')
        || name.split('/').any(|part| part == "..")
        || normalize_entry_name(name) != name
}

/// Resolve `entry` under `base`, failing when the result leaves `base`.
pub fn resolve_under(archive: &Path, entry: &str, base: &Path) -> Result<PathBuf> {
    let relative = Path::new(entry);
    let unsafe_path = |resolved: &Path| Error::UnsafePath {
        archive: archive.to_path_buf(),
        entry: entry.to_string(),
        normalized: resolved.display().to_string(),
    };

    if relative.is_absolute() || relative.has_root() {
        return Err(unsafe_path(relative));
    }

    let resolved = normalize_path(&base.join(relative));
    if !resolved.starts_with(base) || resolved == base {
        return Err(unsafe_path(&resolved));
    }
    Ok(resolved)
}

/// Normalize path separators and resolve relative components.
fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => result.push(part),
            Component::RootDir => result.push(component.as_os_str()),
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::CurDir => {}
        }
    }

    result
}
