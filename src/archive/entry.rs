use crate::archive::format::NAME_LENGTH;
use std::fmt;

/// Raw entry name bytes
///
/// Decoded names keep all 8 on-disk bytes, zero padding included, so an
/// unedited archive re-encodes byte for byte. Names built in memory (marker
/// names such as `FOO_START`) may be longer than 8 bytes; they are truncated
/// only when written. Comparisons stop at the first zero byte.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct EntryName(Vec<u8>);

impl EntryName {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// All stored bytes, including any zero padding
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Bytes up to the first zero byte
    pub fn trimmed(&self) -> &[u8] {
        match self.0.iter().position(|&b| b == 0) {
            Some(end) => &self.0[..end],
            None => &self.0,
        }
    }

    /// Whether this name matches `other`, both compared up to their first zero
    pub fn matches(&self, other: &[u8]) -> bool {
        let other_end = other.iter().position(|&b| b == 0).unwrap_or(other.len());
        self.trimmed() == &other[..other_end]
    }

    /// Name padded or truncated to the on-disk width
    pub fn to_wire(&self) -> [u8; NAME_LENGTH] {
        let mut wire = [0u8; NAME_LENGTH];
        let len = self.0.len().min(NAME_LENGTH);
        wire[..len].copy_from_slice(&self.0[..len]);
        wire
    }

    /// Printable form (trimmed, lossy UTF-8)
    pub fn display(&self) -> String {
        String::from_utf8_lossy(self.trimmed()).into_owned()
    }
}

impl From<&str> for EntryName {
    fn from(name: &str) -> Self {
        Self::new(name.as_bytes())
    }
}

impl From<String> for EntryName {
    fn from(name: String) -> Self {
        Self::new(name.into_bytes())
    }
}

impl From<[u8; NAME_LENGTH]> for EntryName {
    fn from(name: [u8; NAME_LENGTH]) -> Self {
        Self::new(name.to_vec())
    }
}

impl PartialEq<str> for EntryName {
    fn eq(&self, other: &str) -> bool {
        self.matches(other.as_bytes())
    }
}

impl PartialEq<&str> for EntryName {
    fn eq(&self, other: &&str) -> bool {
        self.matches(other.as_bytes())
    }
}

impl fmt::Debug for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.display())
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// One named byte blob ("lump") inside an archive
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    pub name: EntryName,

    /// Informational only. Refreshed by decode and encode; may be stale
    /// between edits and is never read when encoding.
    pub stored_offset: u32,

    /// Bytes as currently stored, enveloped when the archive is compressed
    pub data: Vec<u8>,
}

impl Entry {
    pub fn new(name: impl Into<EntryName>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            stored_offset: 0,
            data,
        }
    }

    /// Zero-length entry, as used for range markers
    pub fn marker(name: impl Into<EntryName>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Size of the payload as currently stored
    ///
    /// Saturates at `u32::MAX`; payloads that large cannot be encoded and
    /// fail with `ArchiveTooLarge` when written.
    pub fn size(&self) -> u32 {
        u32::try_from(self.data.len()).unwrap_or(u32::MAX)
    }

    pub fn is_marker(&self) -> bool {
        self.data.is_empty()
    }
}
