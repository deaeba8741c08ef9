use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One upstream build task and the artifacts it handed over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamTask {
    #[serde(rename = "taskId", alias = "task_id")]
    pub task_id: String,
    pub paths: Vec<String>,
    /// Whether each of `paths` is an archive to check and inflate before publishing.
    #[serde(rename = "zipExtract", alias = "must_extract", default)]
    pub must_extract: bool,
}

impl UpstreamTask {
    pub fn new(task_id: impl Into<String>, paths: Vec<String>, must_extract: bool) -> Self {
        Self {
            task_id: task_id.into(),
            paths,
            must_extract,
        }
    }

    /// True when one of the artifact paths ends with `archive_name`.
    pub fn claims(&self, archive_name: &str) -> bool {
        self.paths.iter().any(|path| path.ends_with(archive_name))
    }

    /// Base file name of every artifact path.
    pub fn archive_names(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(|path| base_name(path))
    }
}

/// Last `/`-separated segment of `path`.
pub fn base_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

/// Parse a JSON array of upstream task descriptors.
pub fn load_upstream_tasks<R: Read>(reader: R) -> Result<Vec<UpstreamTask>> {
    serde_json::from_reader(reader).map_err(|source| Error::Parse {
        what: "upstream tasks",
        source,
    })
}
