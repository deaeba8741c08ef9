//! Where the pipeline reports what it did.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, error, info};

/// Milestones of archive processing, in the order they happen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineEvent {
    ArchiveStructureSane {
        archive: PathBuf,
    },
    ArchiveContentSane {
        archive: PathBuf,
        entries: usize,
    },
    Extracting {
        archive: PathBuf,
        destination: PathBuf,
    },
    Extracted {
        archive: PathBuf,
        files: Vec<PathBuf>,
    },
    ArchiveDeleted {
        archive: PathBuf,
    },
    ArchiveRejected {
        archive: PathBuf,
        reason: String,
    },
    ArtifactPassedThrough {
        task_id: String,
        path: PathBuf,
    },
    TaskVerified {
        task_id: String,
        files: usize,
    },
}

pub trait EventSink {
    fn record(&self, event: &PipelineEvent);
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn record(&self, event: &PipelineEvent) {
        (**self).record(event);
    }
}

/// Forwards every event to `tracing`.
///
/// Validation and extraction milestones go out at debug level since the
/// archive layer already logs them at info.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::ArchiveStructureSane { archive } => {
                debug!(archive = %archive.display(), "structure of archive is sane");
            }
            PipelineEvent::ArchiveContentSane { archive, entries } => {
                debug!(archive = %archive.display(), entries, "content of archive is sane");
            }
            PipelineEvent::Extracting {
                archive,
                destination,
            } => {
                debug!(
                    archive = %archive.display(),
                    destination = %destination.display(),
                    "extracting archive"
                );
            }
            PipelineEvent::Extracted { archive, files } => {
                debug!(archive = %archive.display(), files = files.len(), "extracted archive");
            }
            PipelineEvent::ArchiveDeleted { archive } => {
                info!(archive = %archive.display(), "deleted archive");
            }
            PipelineEvent::ArchiveRejected { archive, reason } => {
                error!(archive = %archive.display(), reason, "archive rejected");
            }
            PipelineEvent::ArtifactPassedThrough { task_id, path } => {
                info!(task_id, path = %path.display(), "passing artifact through untouched");
            }
            PipelineEvent::TaskVerified { task_id, files } => {
                info!(task_id, files, "task deliverables verified");
            }
        }
    }
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &PipelineEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
