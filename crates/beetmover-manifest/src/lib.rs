//! Release inputs for archive extraction: upstream task descriptors, the
//! resolved mapping manifest, and the file set each archive must contain.
//!
//! # Example
//!
//! ```
//! use beetmover_manifest::{MappingManifest, UpstreamTask, resolve_maven};
//!
//! let manifest = MappingManifest::from_json_str(r#"{
//!     "mapping": {"en-US": {"x-1.0.pom": {}}},
//!     "s3_bucket_path": "maven2/org/x/1.0/"
//! }"#).unwrap();
//! let tasks = [UpstreamTask::new("t1", vec!["public/build/target.maven.zip".into()], true)];
//!
//! let expected = resolve_maven(&tasks, &manifest).unwrap();
//! assert_eq!(expected.get("t1", "target.maven.zip").unwrap(), ["org/x/1.0/x-1.0.pom"]);
//! ```

pub use error::{Error, Result};
pub use manifest::{Destination, MappingManifest};
pub use resolve::{
    ExpectedFileSet, MAVEN_ARCHIVE_NAME, REFERENCE_LOCALE, SourceLookup, expected_files_in_archive,
    find_source, resolve, resolve_maven,
};
pub use task::{UpstreamTask, base_name, load_upstream_tasks};

mod error;
mod manifest;
mod resolve;
mod task;
