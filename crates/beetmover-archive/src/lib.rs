//! Zip archive checks and extraction for release artifacts.
//!
//! # Architecture
//!
//! - `format.rs` - Format sniffing
//! - `safety.rs` - Archive and entry size ceilings, zip-bomb ratio check
//! - `conformance.rs` - Listing must equal the expected file set
//! - `sanitize.rs` - Entry name normalization (zip-slip prevention)
//! - `source.rs` - Archive access seam and the zip implementation
//! - `extract.rs` - Extraction to `<archive>.out` and on-disk verification
//! - `guard.rs` - Cross-archive overwrite detection

pub use conformance::validate_contents;
pub use entry::EntryMetadata;
pub use error::{Category, Error, ErrorKind, Result};
pub use extract::{extract, output_dir, verify_materialized};
pub use format::{ArchiveFormat, detect_format};
pub use guard::check_no_overwrite;
pub use limits::{Limits, MAX_COMPRESSION_RATIO, bytes_to_mb};
pub use safety::{validate_container, validate_entries};
pub use sanitize::normalize_entry_name;
pub use source::{ArchiveSource, ZipSource};

mod conformance;
pub mod entry;
mod error;
pub mod extract;
pub mod format;
mod guard;
pub mod limits;
mod safety;
mod sanitize;
pub mod source;
