use std::io;
use thiserror::Error;

/// Result type for WAD operations
pub type Result<T> = std::result::Result<T, WadError>;

/// Unified error type for all WAD operations
#[derive(Debug, Error)]
pub enum WadError {
    // Codec errors
    #[error("Unknown archive format tag: {0:?}")]
    UnknownFormat(String),

    #[error("Archive truncated: {0}")]
    Truncated(String),

    #[error("Cannot encode an archive without a valid format tag")]
    InvalidArchive,

    #[error("Archive too large for 32-bit offsets: {0} bytes")]
    ArchiveTooLarge(u64),

    // Compression errors
    #[error("Corrupt entry {name}: {reason}")]
    CorruptEntry { name: String, reason: String },

    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    #[error("Archive is already {0}")]
    AlreadyInTargetState(&'static str),

    #[error("Cannot decompress into format {0}")]
    UnsupportedTarget(String),

    // Editing errors
    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Entry name {0:?} is not a valid file name")]
    InvalidEntryName(String),

    #[error("Index {index} out of range for {len} entries")]
    OutOfRange { index: i64, len: usize },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WadError {
    /// Map a read failure during decoding, turning early EOF into `Truncated`
    pub(crate) fn from_read(err: io::Error, what: &str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            WadError::Truncated(format!("stream ended while reading {}", what))
        } else {
            WadError::Io(err)
        }
    }
}

impl From<toml::de::Error> for WadError {
    fn from(err: toml::de::Error) -> Self {
        WadError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for WadError {
    fn from(err: toml::ser::Error) -> Self {
        WadError::Config(err.to_string())
    }
}
