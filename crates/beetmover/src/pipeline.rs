//! Check, extract, and clean up every archive a set of upstream tasks handed over.

use std::fs;
use std::path::{Path, PathBuf};

use beetmover_archive::{
    ArchiveSource, Limits, ZipSource, check_no_overwrite, extract, output_dir, validate_container,
    validate_contents, validate_entries, verify_materialized,
};
use beetmover_manifest::{ExpectedFileSet, UpstreamTask};
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::sink::{EventSink, PipelineEvent};

/// Files ready for publishing, grouped by the task that produced them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Deliverables(IndexMap<String, Vec<PathBuf>>);

impl Deliverables {
    pub fn for_task(&self, task_id: &str) -> Option<&[PathBuf]> {
        self.0.get(task_id).map(Vec::as_slice)
    }

    /// Every file, task after task.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.0.values().flatten().map(PathBuf::as_path)
    }

    pub fn into_files(self) -> Vec<PathBuf> {
        self.0.into_values().flatten().collect()
    }

    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct Pipeline<S> {
    limits: Limits,
    sink: S,
}

impl<S: EventSink> Pipeline<S> {
    pub fn new(limits: Limits, sink: S) -> Self {
        Self { limits, sink }
    }

    /// Validate, extract, verify, then delete one archive.
    ///
    /// Returns the absolute paths of `expected` under the archive's output
    /// directory. Any failure leaves the archive on disk.
    pub fn process_archive(&self, archive: &Path, expected: &[String]) -> Result<Vec<PathBuf>> {
        self.check_and_extract(archive, expected)
            .and_then(|files| {
                fs::remove_file(archive).map_err(|source| Error::DeleteArchive {
                    path: archive.to_path_buf(),
                    source,
                })?;
                self.sink.record(&PipelineEvent::ArchiveDeleted {
                    archive: archive.to_path_buf(),
                });
                Ok(files)
            })
            .inspect_err(|err| {
                self.sink.record(&PipelineEvent::ArchiveRejected {
                    archive: archive.to_path_buf(),
                    reason: err.to_string(),
                });
            })
    }

    fn check_and_extract(&self, archive: &Path, expected: &[String]) -> Result<Vec<PathBuf>> {
        if !archive.is_absolute() {
            return Err(beetmover_archive::Error::RelativePathNotSupported {
                path: archive.to_path_buf(),
            }
            .into());
        }

        validate_container(archive, &self.limits)?;
        self.sink.record(&PipelineEvent::ArchiveStructureSane {
            archive: archive.to_path_buf(),
        });

        // The reader is dropped before the caller deletes the archive.
        let mut source = ZipSource::open(archive)?;
        let entries = source.entries()?;
        validate_entries(archive, &entries, &self.limits)?;

        let names: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
        validate_contents(archive, &names, expected)?;
        self.sink.record(&PipelineEvent::ArchiveContentSane {
            archive: archive.to_path_buf(),
            entries: entries.len(),
        });

        self.sink.record(&PipelineEvent::Extracting {
            archive: archive.to_path_buf(),
            destination: output_dir(archive),
        });
        let files = extract(archive, &mut source, expected)?;
        drop(source);

        verify_materialized(archive, &files)?;
        self.sink.record(&PipelineEvent::Extracted {
            archive: archive.to_path_buf(),
            files: files.clone(),
        });
        Ok(files)
    }

    /// Deliverables of one task.
    ///
    /// Archives of a `must_extract` task are processed one after the other,
    /// then the overwrite guard runs over everything they produced. Artifacts
    /// of other tasks are passed through as they are.
    pub fn process_task(&self, task: &UpstreamTask, expected: &ExpectedFileSet) -> Result<Vec<PathBuf>> {
        if !task.must_extract {
            return Ok(task
                .paths
                .iter()
                .map(|path| {
                    let path = PathBuf::from(path);
                    self.sink.record(&PipelineEvent::ArtifactPassedThrough {
                        task_id: task.task_id.clone(),
                        path: path.clone(),
                    });
                    path
                })
                .collect());
        }

        let mut files = Vec::new();
        for (path, archive) in task.paths.iter().zip(task.archive_names()) {
            let names = expected
                .get(&task.task_id, archive)
                .ok_or_else(|| Error::UnresolvedArchive {
                    task_id: task.task_id.clone(),
                    archive: archive.to_string(),
                })?;
            files.extend(self.process_archive(Path::new(path), names)?);
        }

        check_no_overwrite(&task.task_id, &files)?;
        self.sink.record(&PipelineEvent::TaskVerified {
            task_id: task.task_id.clone(),
            files: files.len(),
        });
        Ok(files)
    }

    /// Process `tasks` in order, stopping at the first failure.
    pub fn run(&self, tasks: &[UpstreamTask], expected: &ExpectedFileSet) -> Result<Deliverables> {
        let mut deliverables = Deliverables::default();
        for task in tasks {
            let files = self.process_task(task, expected)?;
            deliverables
                .0
                .entry(task.task_id.clone())
                .or_default()
                .extend(files);
        }
        Ok(deliverables)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use beetmover_archive::{Category, ErrorKind};
    use zip::write::SimpleFileOptions;

    use super::*;
    use crate::sink::RecordingSink;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn archive_kind(err: &Error) -> Option<ErrorKind> {
        match err {
            Error::Archive(err) => Some(err.kind()),
            _ => None,
        }
    }

    #[test]
    fn processed_archive_is_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("target.maven.zip");
        write_zip(&archive, &[("a.txt", "a"), ("b/c.txt", "c")]);
        let sink = RecordingSink::new();
        let pipeline = Pipeline::new(Limits::new(100), &sink);

        let files = pipeline
            .process_archive(&archive, &names(&["a.txt", "b/c.txt"]))
            .unwrap();

        let out = dir.path().join("target.maven.zip.out");
        assert_eq!(files, vec![out.join("a.txt"), out.join("b/c.txt")]);
        assert!(!archive.exists());
        assert_eq!(
            sink.events().last(),
            Some(&PipelineEvent::ArchiveDeleted {
                archive: archive.clone()
            })
        );
    }

    #[test]
    fn rejected_archive_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("target.maven.zip");
        write_zip(&archive, &[("a.txt", "a"), ("rogue.txt", "r")]);
        let sink = RecordingSink::new();
        let pipeline = Pipeline::new(Limits::new(100), &sink);

        let err = pipeline
            .process_archive(&archive, &names(&["a.txt"]))
            .unwrap_err();

        assert_eq!(archive_kind(&err), Some(ErrorKind::UnexpectedFile));
        assert!(archive.exists());
        assert!(!dir.path().join("target.maven.zip.out").exists());
        assert!(matches!(
            sink.events().last(),
            Some(PipelineEvent::ArchiveRejected { .. })
        ));
    }

    #[test]
    fn untouched_tasks_pass_through() {
        let sink = RecordingSink::new();
        let pipeline = Pipeline::new(Limits::new(100), &sink);
        let task = UpstreamTask::new("t0", vec!["/work/t0/build.log".into()], false);

        let files = pipeline
            .process_task(&task, &ExpectedFileSet::new())
            .unwrap();

        assert_eq!(files, vec![PathBuf::from("/work/t0/build.log")]);
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn extract_task_without_expected_files_fails() {
        let pipeline = Pipeline::new(Limits::new(100), RecordingSink::new());
        let task = UpstreamTask::new("t1", vec!["/work/t1/target.maven.zip".into()], true);

        let err = pipeline
            .process_task(&task, &ExpectedFileSet::new())
            .unwrap_err();

        assert!(matches!(err, Error::UnresolvedArchive { ref archive, .. } if archive == "target.maven.zip"));
        assert_eq!(err.category(), Category::Manifest);
    }

    #[test]
    fn run_keeps_task_order() {
        let dir = tempfile::tempdir().unwrap();
        let task_dir = dir.path().join("t1");
        fs::create_dir_all(&task_dir).unwrap();
        let archive = task_dir.join("target.maven.zip");
        write_zip(&archive, &[("org/x/x.pom", "<project/>")]);

        let tasks = vec![
            UpstreamTask::new("t0", vec!["/work/t0/log.txt".into()], false),
            UpstreamTask::new("t1", vec![archive.display().to_string()], true),
        ];
        let mut expected = ExpectedFileSet::new();
        expected.insert("t1", "target.maven.zip", names(&["org/x/x.pom"]));

        let pipeline = Pipeline::new(Limits::new(100), RecordingSink::new());
        let deliverables = pipeline.run(&tasks, &expected).unwrap();

        assert_eq!(deliverables.len(), 2);
        assert_eq!(
            deliverables.for_task("t0"),
            Some(&[PathBuf::from("/work/t0/log.txt")][..])
        );
        assert_eq!(
            deliverables.into_files(),
            vec![
                PathBuf::from("/work/t0/log.txt"),
                task_dir.join("target.maven.zip.out/org/x/x.pom"),
            ]
        );
    }
}
