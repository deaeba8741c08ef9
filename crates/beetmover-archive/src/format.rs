use std::io::{self, Read, Seek};

/// Container formats the extractor understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
}

const LOCAL_FILE_HEADER: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const END_OF_CENTRAL_DIRECTORY: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

pub fn detect_format(data: &[u8]) -> Option<ArchiveFormat> {
    // An archive without entries is only an end-of-central-directory record.
    if data.starts_with(&LOCAL_FILE_HEADER) || data.starts_with(&END_OF_CENTRAL_DIRECTORY) {
        Some(ArchiveFormat::Zip)
    } else {
        None
    }
}

/// Sniff the format from the first bytes of `reader`, leaving it rewound.
///
/// Short inputs are reported as unknown instead of failing.
pub fn detect_from_reader<R: Read + Seek>(reader: &mut R) -> io::Result<Option<ArchiveFormat>> {
    let mut header = [0u8; 4];
    let mut filled = 0;
    while filled < header.len() {
        let n = reader.read(&mut header[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    reader.rewind()?;
    Ok(detect_format(&header[..filled]))
}
