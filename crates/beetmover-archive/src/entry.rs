/// Sizes and name of one entry, as listed by the archive's central directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryMetadata {
    pub name: String,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
}

impl EntryMetadata {
    pub fn new(name: impl Into<String>, compressed_size: u64, uncompressed_size: u64) -> Self {
        Self {
            name: name.into(),
            compressed_size,
            uncompressed_size,
        }
    }

    /// Uncompressed size over compressed size.
    ///
    /// An empty entry has ratio 0. Any content inflated out of zero compressed
    /// bytes is infinite.
    pub fn compression_ratio(&self) -> f64 {
        match (self.compressed_size, self.uncompressed_size) {
            (0, 0) => 0.0,
            (0, _) => f64::INFINITY,
            (compressed, uncompressed) => uncompressed as f64 / compressed as f64,
        }
    }
}
