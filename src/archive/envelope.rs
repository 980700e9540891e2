//! Per-entry compression envelope used by ZWAD archives
//!
//! Each payload starts with a 4-byte little-endian length prefix:
//!
//! ```text
//! bytes 0..3 : uncompressed length; 0 means the rest is stored raw
//! bytes 4..  : compressed block of that length (or the raw payload)
//! ```
//!
//! Payloads below [`MIN_COMPRESSION_SIZE`] and payloads the block codec cannot
//! shrink are stored raw behind a zero prefix.

use crate::archive::block::{BlockCodec, BlockMethod};
use crate::archive::entry::Entry;
use crate::error::{WadError, Result};
use tracing::debug;

/// Threshold below which payloads are stored raw (1KB)
pub const MIN_COMPRESSION_SIZE: usize = 1024;

/// Size of the length prefix
pub const PREFIX_SIZE: usize = 4;

/// Block codec plus the raw-storage threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionSettings {
    pub method: BlockMethod,
    pub min_size: usize,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            method: BlockMethod::Lz4,
            min_size: MIN_COMPRESSION_SIZE,
        }
    }
}

/// Wrap a raw payload in the envelope
pub fn wrap<C: BlockCodec>(codec: &C, min_size: usize, data: &[u8]) -> Result<Vec<u8>> {
    if !data.is_empty() && data.len() >= min_size {
        // Only accept output strictly smaller than the input
        let bound = data.len() - 1;
        if let Some(block) = codec.compress_bounded(data, bound)? {
            let original_len = u32::try_from(data.len())
                .map_err(|_| WadError::ArchiveTooLarge(data.len() as u64))?;

            let mut out = Vec::with_capacity(PREFIX_SIZE + block.len());
            out.extend_from_slice(&original_len.to_le_bytes());
            out.extend_from_slice(&block);
            return Ok(out);
        }
        debug!(size = data.len(), "block is incompressible, storing raw");
    }

    let mut out = Vec::with_capacity(PREFIX_SIZE + data.len());
    out.extend_from_slice(&[0u8; PREFIX_SIZE]);
    out.extend_from_slice(data);
    Ok(out)
}

/// Strip the envelope and return the raw payload
///
/// `name` is only used for error reporting.
pub fn unwrap<C: BlockCodec>(codec: &C, name: &str, data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < PREFIX_SIZE {
        return Err(WadError::CorruptEntry {
            name: name.to_string(),
            reason: format!("payload of {} bytes has no length prefix", data.len()),
        });
    }

    let mut prefix = [0u8; PREFIX_SIZE];
    prefix.copy_from_slice(&data[..PREFIX_SIZE]);
    let uncompressed_len = u32::from_le_bytes(prefix) as usize;
    let body = &data[PREFIX_SIZE..];

    if uncompressed_len == 0 {
        return Ok(body.to_vec());
    }

    codec
        .decompress_exact(body, uncompressed_len)
        .map_err(|e| WadError::CorruptEntry {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

/// Envelope an entry in place
pub fn compress_entry(settings: &CompressionSettings, entry: &mut Entry) -> Result<()> {
    let wrapped = wrap(&settings.method, settings.min_size, &entry.data)?;
    debug!(
        name = %entry.name,
        before = entry.data.len(),
        after = wrapped.len(),
        "compressed entry"
    );
    entry.data = wrapped;
    Ok(())
}

/// Remove the envelope from an entry in place; the entry is untouched on error
pub fn decompress_entry(settings: &CompressionSettings, entry: &mut Entry) -> Result<()> {
    let raw = unwrap(&settings.method, &entry.name.display(), &entry.data)?;
    debug!(
        name = %entry.name,
        before = entry.data.len(),
        after = raw.len(),
        "decompressed entry"
    );
    entry.data = raw;
    Ok(())
}
