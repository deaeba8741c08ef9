use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where one build output ends up once published.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destinations: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Resolved release mapping: locale, then file name, then destination.
///
/// Key order follows the source document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MappingManifest {
    pub mapping: IndexMap<String, IndexMap<String, Destination>>,
    pub s3_bucket_path: String,
}

impl MappingManifest {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| Error::Parse {
            what: "mapping manifest",
            source,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// File names mapped for `locale`, in manifest order.
    pub fn files_for_locale(&self, locale: &str) -> Result<impl Iterator<Item = &str>> {
        self.mapping
            .get(locale)
            .map(|files| files.keys().map(String::as_str))
            .ok_or_else(|| Error::MissingLocale {
                locale: locale.to_string(),
            })
    }

    /// Bucket path without its first segment.
    ///
    /// That segment is the server-side repository root (`maven2/...`), which
    /// exists on the remote host but is never part of the archive.
    pub fn archive_prefix(&self) -> &str {
        self.s3_bucket_path
            .split_once('/')
            .map_or("", |(_, rest)| rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "mapping": {
            "en-US": {
                "geckoview-beta-x86-62.0b3.pom": {"s3_key": "geckoview-beta-x86-62.0b3.pom", "destinations": ["geckoview-beta-x86-62.0b3.pom"]},
                "geckoview-beta-x86-62.0b3.aar": {},
                "geckoview-beta-x86-62.0b3.aar.md5": {"checksums_path": "x"}
            }
        },
        "s3_bucket_path": "maven2/org/mozilla/geckoview-beta-x86/62.0b3/"
    }"#;

    #[test]
    fn keeps_document_order() {
        let manifest = MappingManifest::from_json_str(MANIFEST).unwrap();
        let files: Vec<_> = manifest.files_for_locale("en-US").unwrap().collect();
        assert_eq!(
            files,
            vec![
                "geckoview-beta-x86-62.0b3.pom",
                "geckoview-beta-x86-62.0b3.aar",
                "geckoview-beta-x86-62.0b3.aar.md5",
            ]
        );
    }

    #[test]
    fn keeps_destination_metadata() {
        let manifest = MappingManifest::from_json_str(MANIFEST).unwrap();
        let files = &manifest.mapping["en-US"];
        let pom = &files["geckoview-beta-x86-62.0b3.pom"];
        assert_eq!(pom.s3_key.as_deref(), Some("geckoview-beta-x86-62.0b3.pom"));
        assert_eq!(pom.destinations.len(), 1);
        let md5 = &files["geckoview-beta-x86-62.0b3.aar.md5"];
        assert_eq!(md5.extra["checksums_path"], "x");
    }

    #[test]
    fn unknown_locale_fails() {
        let manifest = MappingManifest::from_json_str(MANIFEST).unwrap();
        assert!(matches!(
            manifest.files_for_locale("fr"),
            Err(Error::MissingLocale { .. })
        ));
    }

    #[test]
    fn archive_prefix_drops_repository_root() {
        let manifest = MappingManifest::from_json_str(MANIFEST).unwrap();
        assert_eq!(manifest.archive_prefix(), "org/mozilla/geckoview-beta-x86/62.0b3/");
    }

    #[test]
    fn archive_prefix_of_single_segment_is_empty() {
        let manifest = MappingManifest {
            mapping: IndexMap::new(),
            s3_bucket_path: "maven2".into(),
        };
        assert_eq!(manifest.archive_prefix(), "");
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MappingManifest::from_path(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(Error::Read { .. })));
    }
}
