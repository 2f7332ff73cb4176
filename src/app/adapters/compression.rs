//! Compression codec for observation files
//!
//! Handles the gzip wrapping recommended by the IGS and plain files.
//! Legacy Unix compress (.Z) is recognized by extension but the codec
//! cannot decode or re-encode it.

use crate::app::models::CompressionKind;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{self, Read, Write};
use std::path::Path;

/// Unwrap raw file bytes according to the detected compression kind.
pub fn decompress(raw: &[u8], kind: CompressionKind) -> io::Result<Vec<u8>> {
    match kind {
        CompressionKind::Plain => Ok(raw.to_vec()),
        CompressionKind::Gzip => {
            let mut decoded = Vec::new();
            GzDecoder::new(raw).read_to_end(&mut decoded)?;
            Ok(decoded)
        }
        CompressionKind::LegacyZ => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "legacy Unix compress (.Z) archives are not supported by the built-in codec",
        )),
    }
}

/// Write file content to `path` with the requested compression kind.
pub fn write_file(path: &Path, data: &[u8], kind: CompressionKind) -> io::Result<()> {
    match kind {
        CompressionKind::Plain => std::fs::write(path, data),
        CompressionKind::Gzip => {
            let file = std::fs::File::create(path)?;
            let mut encoder = GzEncoder::new(file, Compression::default());
            encoder.write_all(data)?;
            encoder.finish()?;
            Ok(())
        }
        CompressionKind::LegacyZ => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "legacy Unix compress (.Z) output is not supported by the built-in codec",
        )),
    }
}
