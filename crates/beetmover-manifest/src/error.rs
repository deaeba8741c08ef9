use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("more than one upstream task provides archive '{archive}': {task_ids:?}")]
    AmbiguousSource { archive: String, task_ids: Vec<String> },

    #[error("no upstream task provides archive '{archive}'")]
    MissingSource { archive: String },

    #[error("locale '{locale}' is not present in the mapping manifest")]
    MissingLocale { locale: String },

    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
