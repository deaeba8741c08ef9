/// Largest accepted uncompressed-to-compressed size ratio for a single entry.
///
/// Rule of thumb sized for Android library bundles; raise it through
/// [`Limits::max_compression_ratio`] for data that packs tighter.
pub const MAX_COMPRESSION_RATIO: f64 = 10.0;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Size ceilings applied to an archive before anything is extracted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Limits {
    /// Ceiling for the whole archive and for every compressed entry, in MB.
    pub max_size_mb: u64,
    pub max_compression_ratio: f64,
}

impl Limits {
    pub fn new(max_size_mb: u64) -> Self {
        Self {
            max_size_mb,
            max_compression_ratio: MAX_COMPRESSION_RATIO,
        }
    }

    pub fn max_compression_ratio(mut self, ratio: f64) -> Self {
        self.max_compression_ratio = ratio;
        self
    }

    /// Worst case number of bytes a single entry may inflate to.
    pub fn max_uncompressed_entry_bytes(&self) -> f64 {
        self.max_compression_ratio * self.max_size_mb.saturating_mul(BYTES_PER_MB) as f64
    }
}

/// Whole megabytes in `bytes`, truncating.
pub fn bytes_to_mb(bytes: u64) -> u64 {
    bytes / BYTES_PER_MB
}
