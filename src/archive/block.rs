use crate::error::{WadError, Result};

/// Default zstd level, matching the balanced level used for archive frames
pub const DEFAULT_ZSTD_LEVEL: i32 = 6;

/// Generic byte-block compressor used inside the compression envelope
pub trait BlockCodec {
    /// Compress `src` into at most `max_out` bytes.
    ///
    /// Returns `Ok(None)` when the block does not fit, i.e. it is not worth
    /// compressing.
    fn compress_bounded(&self, src: &[u8], max_out: usize) -> Result<Option<Vec<u8>>>;

    /// Decompress `src`, which must expand to exactly `expected_len` bytes
    fn decompress_exact(&self, src: &[u8], expected_len: usize) -> Result<Vec<u8>>;
}

/// Built-in block compressors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMethod {
    /// Raw LZ4 block, no size prefix
    Lz4,
    /// Single zstd frame
    Zstd { level: i32 },
}

impl Default for BlockMethod {
    fn default() -> Self {
        Self::Lz4
    }
}

impl BlockCodec for BlockMethod {
    fn compress_bounded(&self, src: &[u8], max_out: usize) -> Result<Option<Vec<u8>>> {
        let compressed = match self {
            Self::Lz4 => lz4_flex::block::compress(src),
            Self::Zstd { level } => zstd::bulk::compress(src, *level).map_err(|e| {
                WadError::CompressionFailed(format!("Zstd compression failed: {}", e))
            })?,
        };

        if compressed.len() > max_out {
            return Ok(None);
        }
        Ok(Some(compressed))
    }

    fn decompress_exact(&self, src: &[u8], expected_len: usize) -> Result<Vec<u8>> {
        let decompressed = match self {
            Self::Lz4 => lz4_flex::block::decompress(src, expected_len)
                .map_err(|e| WadError::CompressionFailed(format!("LZ4: {}", e)))?,
            Self::Zstd { .. } => zstd::bulk::decompress(src, expected_len)
                .map_err(|e| WadError::CompressionFailed(format!("Zstd: {}", e)))?,
        };

        if decompressed.len() != expected_len {
            return Err(WadError::CompressionFailed(format!(
                "size mismatch: expected {}, got {}",
                expected_len,
                decompressed.len()
            )));
        }
        Ok(decompressed)
    }
}
