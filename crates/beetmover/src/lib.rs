//! Turn the archives upstream build tasks hand over into files ready to publish.
//!
//! Every archive a task flags for extraction is checked against the files the
//! mapping manifest says it must hold, inflated next to itself into
//! `<archive>.out`, and deleted once its contents are verified on disk.
//!
//! ```no_run
//! use beetmover::{Pipeline, TracingSink};
//! use beetmover_archive::Limits;
//! use beetmover_manifest::{MappingManifest, UpstreamTask, resolve_maven};
//!
//! # fn main() -> anyhow::Result<()> {
//! let manifest = MappingManifest::from_path("manifest.json".as_ref())?;
//! let tasks = vec![UpstreamTask::new(
//!     "t1",
//!     vec!["/work/t1/target.maven.zip".to_string()],
//!     true,
//! )];
//! let expected = resolve_maven(&tasks, &manifest)?;
//!
//! let pipeline = Pipeline::new(Limits::new(100), TracingSink);
//! for file in pipeline.run(&tasks, &expected)?.files() {
//!     println!("{}", file.display());
//! }
//! # Ok(())
//! # }
//! ```

pub use config::{Config, ConfigError, LogFormat, LoggingConfig};
pub use error::{Error, Result};
pub use pipeline::{Deliverables, Pipeline};
pub use sink::{EventSink, PipelineEvent, RecordingSink, TracingSink};

pub mod cli;
pub mod config;
mod error;
pub mod logging;
pub mod pipeline;
pub mod sink;
