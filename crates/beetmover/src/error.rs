use std::io;
use std::path::PathBuf;

use beetmover_archive::Category;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Manifest(#[from] beetmover_manifest::Error),

    #[error(transparent)]
    Archive(#[from] beetmover_archive::Error),

    #[error("task '{task_id}' must extract '{archive}' but no expected files were resolved for it")]
    UnresolvedArchive { task_id: String, archive: String },

    #[error("failed to delete extracted archive '{path}': {source}")]
    DeleteArchive { path: PathBuf, source: io::Error },
}

impl Error {
    pub fn category(&self) -> Category {
        match self {
            Self::Manifest(err) => match err {
                beetmover_manifest::Error::Read { .. } => Category::Io,
                _ => Category::Manifest,
            },
            Self::Archive(err) => err.kind().category(),
            Self::UnresolvedArchive { .. } => Category::Manifest,
            Self::DeleteArchive { .. } => Category::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_errors_are_authoring_mistakes() {
        let err = Error::from(beetmover_manifest::Error::MissingSource {
            archive: "target.maven.zip".into(),
        });
        assert_eq!(err.category(), Category::Manifest);

        let err = Error::UnresolvedArchive {
            task_id: "t1".into(),
            archive: "target.maven.zip".into(),
        };
        assert_eq!(err.category(), Category::Manifest);
    }

    #[test]
    fn archive_errors_keep_their_category() {
        let err = Error::from(beetmover_archive::Error::RelativePathNotSupported {
            path: PathBuf::from("some.zip"),
        });
        assert_eq!(err.category(), Category::Usage);
        assert!(err.to_string().contains("some.zip"));
    }
}
