//! Tunables for compression, naming and extraction
//!
//! Loaded from TOML; every field has a default, so an empty document is a
//! valid configuration.
//!
//! ```toml
//! [compression]
//! method = "zstd"
//! min_size = 2048
//! zstd_level = 9
//!
//! [naming]
//! truncate_to = 8
//!
//! [extract]
//! with_extension = false
//! ```

use crate::archive::{
    AddOptions, BlockMethod, CompressionSettings, DEFAULT_TRUNCATE_LENGTH, DEFAULT_ZSTD_LEVEL,
    MIN_COMPRESSION_SIZE, NAME_LENGTH,
};
use crate::error::{WadError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WadConfig {
    pub compression: CompressionConfig,
    pub naming: NamingConfig,
    pub extract: ExtractConfig,
}

/// Block codec selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecName {
    #[default]
    Lz4,
    Zstd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    pub method: CodecName,
    /// Payloads smaller than this are stored raw
    pub min_size: usize,
    pub zstd_level: i32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            method: CodecName::Lz4,
            min_size: MIN_COMPRESSION_SIZE,
            zstd_level: DEFAULT_ZSTD_LEVEL,
        }
    }
}

impl CompressionConfig {
    pub fn settings(&self) -> CompressionSettings {
        let method = match self.method {
            CodecName::Lz4 => BlockMethod::Lz4,
            CodecName::Zstd => BlockMethod::Zstd {
                level: self.zstd_level,
            },
        };
        CompressionSettings {
            method,
            min_size: self.min_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Bytes kept when an overlong name is truncated
    pub truncate_to: usize,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            truncate_to: DEFAULT_TRUNCATE_LENGTH,
        }
    }
}

impl NamingConfig {
    /// Base add options carrying the configured truncation length
    pub fn add_options(&self) -> AddOptions {
        AddOptions {
            truncate_to: self.truncate_to,
            ..AddOptions::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub with_extension: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            with_extension: true,
        }
    }
}

impl WadConfig {
    /// Parse a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        if self.naming.truncate_to == 0 || self.naming.truncate_to > NAME_LENGTH {
            return Err(WadError::Config(format!(
                "naming.truncate_to must be between 1 and {}, got {}",
                NAME_LENGTH, self.naming.truncate_to
            )));
        }
        Ok(())
    }
}
