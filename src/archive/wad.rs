use crate::archive::entry::Entry;
use crate::archive::envelope::{unwrap, wrap, CompressionSettings};
use crate::archive::format::{WadType, HEADER_SIZE};
use crate::error::{WadError, Result};
use std::ops::Index;
use tracing::info;

/// Name given to archives created from scratch
pub const DEFAULT_ARCHIVE_NAME: &str = "new.wad";

/// In-memory model of one WAD file: a format tag and an ordered entry list
///
/// Entry order is both the on-disk order and the logical grouping order;
/// marker entries bound ranges purely by position. Offsets are recomputed
/// from scratch on every encode.
#[derive(Debug, Clone)]
pub struct Archive {
    pub(crate) wad_type: WadType,
    pub(crate) name: String,
    pub(crate) directory_offset: u32,
    pub(crate) entries: Vec<Entry>,
    pub(crate) compression: CompressionSettings,
}

impl Archive {
    /// Create an empty archive of the given type
    pub fn new(name: impl Into<String>, wad_type: WadType) -> Self {
        Self {
            wad_type,
            name: name.into(),
            directory_offset: HEADER_SIZE as u32,
            entries: Vec::new(),
            compression: CompressionSettings::default(),
        }
    }

    /// Use a different block codec or raw-storage threshold
    pub fn with_compression(mut self, settings: CompressionSettings) -> Self {
        self.compression = settings;
        self
    }

    pub fn wad_type(&self) -> WadType {
        self.wad_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Directory offset as of the last decode or encode
    pub fn directory_offset(&self) -> u32 {
        self.directory_offset
    }

    pub fn compression(&self) -> &CompressionSettings {
        &self.compression
    }

    pub fn is_compressed(&self) -> bool {
        self.wad_type.is_compressed()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Position of the first entry named `name`
    pub fn find(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.name.matches(name.as_bytes()))
    }

    /// Sum of stored entry sizes, the informational offset for appended entries
    pub(crate) fn stored_size_total(&self) -> u32 {
        self.entries
            .iter()
            .fold(0u32, |total, entry| total.wrapping_add(entry.size()))
    }

    /// Envelope every entry and switch to ZWAD
    ///
    /// Nothing is modified unless every entry compresses.
    pub fn compress_archive(&mut self) -> Result<()> {
        if self.wad_type.is_compressed() {
            return Err(WadError::AlreadyInTargetState("compressed"));
        }

        let settings = self.compression;
        let wrapped = self
            .entries
            .iter()
            .map(|entry| wrap(&settings.method, settings.min_size, &entry.data))
            .collect::<Result<Vec<_>>>()?;

        let before: usize = self.entries.iter().map(|e| e.data.len()).sum();
        for (entry, data) in self.entries.iter_mut().zip(wrapped) {
            entry.data = data;
        }
        self.wad_type = WadType::Zwad;

        let after: usize = self.entries.iter().map(|e| e.data.len()).sum();
        info!(archive = %self.name, entries = self.entries.len(), before, after, "compressed archive");
        Ok(())
    }

    /// Strip the envelope from every entry and retag the archive as `into`
    ///
    /// Nothing is modified unless every entry decompresses.
    pub fn decompress_archive(&mut self, into: WadType) -> Result<()> {
        if into.is_compressed() || into == WadType::Invalid {
            return Err(WadError::UnsupportedTarget(into.to_string()));
        }
        if !self.wad_type.is_compressed() {
            return Err(WadError::AlreadyInTargetState("uncompressed"));
        }

        let settings = self.compression;
        let raw = self
            .entries
            .iter()
            .map(|entry| unwrap(&settings.method, &entry.name.display(), &entry.data))
            .collect::<Result<Vec<_>>>()?;

        for (entry, data) in self.entries.iter_mut().zip(raw) {
            entry.data = data;
        }
        self.wad_type = into;

        info!(archive = %self.name, entries = self.entries.len(), into = %into, "decompressed archive");
        Ok(())
    }
}

impl Default for Archive {
    fn default() -> Self {
        Self::new(DEFAULT_ARCHIVE_NAME, WadType::Pwad)
    }
}

impl Index<usize> for Archive {
    type Output = Entry;

    fn index(&self, index: usize) -> &Entry {
        &self.entries[index]
    }
}
