//! Which archive each upstream task owns, and which files that archive must hold.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::manifest::MappingManifest;
use crate::task::UpstreamTask;

/// Archive produced by Android library builds.
pub const MAVEN_ARCHIVE_NAME: &str = "target.maven.zip";

/// Untranslated locale whose mapping lists every file of the release.
pub const REFERENCE_LOCALE: &str = "en-US";

/// Outcome of looking up the one task that produced an archive.
#[derive(Debug, PartialEq, Eq)]
pub enum SourceLookup<'a> {
    Found(&'a UpstreamTask),
    NotFound,
    Ambiguous(Vec<&'a UpstreamTask>),
}

pub fn find_source<'a>(tasks: &'a [UpstreamTask], archive_name: &str) -> SourceLookup<'a> {
    let mut claimants: Vec<&UpstreamTask> =
        tasks.iter().filter(|task| task.claims(archive_name)).collect();

    match claimants.len() {
        0 => SourceLookup::NotFound,
        1 => SourceLookup::Found(claimants.remove(0)),
        _ => SourceLookup::Ambiguous(claimants),
    }
}

/// Expected relative paths: task id, then archive name, then paths.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpectedFileSet(IndexMap<String, IndexMap<String, Vec<String>>>);

impl ExpectedFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        task_id: impl Into<String>,
        archive_name: impl Into<String>,
        paths: Vec<String>,
    ) -> Option<Vec<String>> {
        self.0
            .entry(task_id.into())
            .or_default()
            .insert(archive_name.into(), paths)
    }

    pub fn get(&self, task_id: &str, archive_name: &str) -> Option<&[String]> {
        self.0
            .get(task_id)
            .and_then(|archives| archives.get(archive_name))
            .map(Vec::as_slice)
    }

    /// `(task_id, archive_name, paths)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &[String])> {
        self.0.iter().flat_map(|(task_id, archives)| {
            archives
                .iter()
                .map(move |(archive, paths)| (task_id.as_str(), archive.as_str(), paths.as_slice()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(IndexMap::is_empty)
    }
}

/// Paths the archive must hold: every file mapped for `locale`, under the
/// manifest's archive prefix.
pub fn expected_files_in_archive(manifest: &MappingManifest, locale: &str) -> Result<Vec<String>> {
    let prefix = manifest.archive_prefix();
    Ok(manifest
        .files_for_locale(locale)?
        .map(|file| join(prefix, file))
        .collect())
}

/// Resolve the expected contents of `archive_name` for the single task producing it.
pub fn resolve(
    tasks: &[UpstreamTask],
    manifest: &MappingManifest,
    archive_name: &str,
    locale: &str,
) -> Result<ExpectedFileSet> {
    let task = match find_source(tasks, archive_name) {
        SourceLookup::Found(task) => task,
        SourceLookup::NotFound => {
            return Err(Error::MissingSource {
                archive: archive_name.to_string(),
            });
        }
        SourceLookup::Ambiguous(tasks) => {
            return Err(Error::AmbiguousSource {
                archive: archive_name.to_string(),
                task_ids: tasks.iter().map(|task| task.task_id.clone()).collect(),
            });
        }
    };

    let mut expected = ExpectedFileSet::new();
    expected.insert(
        task.task_id.as_str(),
        archive_name,
        expected_files_in_archive(manifest, locale)?,
    );
    Ok(expected)
}

/// [`resolve`] for the maven archive against the reference locale.
pub fn resolve_maven(tasks: &[UpstreamTask], manifest: &MappingManifest) -> Result<ExpectedFileSet> {
    resolve(tasks, manifest, MAVEN_ARCHIVE_NAME, REFERENCE_LOCALE)
}

fn join(prefix: &str, file: &str) -> String {
    if prefix.is_empty() {
        file.to_string()
    } else if prefix.ends_with('/') {
        format!("{prefix}{file}")
    } else {
        format!("{prefix}/{file}")
    }
}
