use crate::error::{WadError, Result};
use std::fmt;
use std::io::{Read, Write};

/// Header size in bytes: tag, entry count, directory offset
pub const HEADER_SIZE: usize = 12;

/// Directory record size in bytes: offset, size, name
pub const DIRECTORY_RECORD_SIZE: usize = 16;

/// Entry names occupy exactly this many bytes on disk
pub const NAME_LENGTH: usize = 8;

/// Archive variants, selected by the 4-byte tag at offset 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WadType {
    /// Internal WAD ("IWAD")
    Iwad,
    /// Patch WAD ("PWAD")
    Pwad,
    /// Every entry wrapped in the compression envelope ("ZWAD")
    Zwad,
    /// Legacy "SDLL" container
    Sdll,
    /// Caller-chosen tag; never produced by decoding
    Custom([u8; 4]),
    /// Not a WAD; cannot be encoded
    Invalid,
}

impl WadType {
    /// Recognize one of the four known tags
    pub fn from_tag(tag: &[u8; 4]) -> Self {
        match tag {
            b"IWAD" => Self::Iwad,
            b"PWAD" => Self::Pwad,
            b"ZWAD" => Self::Zwad,
            b"SDLL" => Self::Sdll,
            _ => Self::Invalid,
        }
    }

    /// Tag bytes written at offset 0, `None` for `Invalid`
    pub fn tag(&self) -> Option<[u8; 4]> {
        match self {
            Self::Iwad => Some(*b"IWAD"),
            Self::Pwad => Some(*b"PWAD"),
            Self::Zwad => Some(*b"ZWAD"),
            Self::Sdll => Some(*b"SDLL"),
            Self::Custom(tag) => Some(*tag),
            Self::Invalid => None,
        }
    }

    /// Whether entries carry the compression envelope
    pub fn is_compressed(&self) -> bool {
        matches!(self, Self::Zwad)
    }
}

impl Default for WadType {
    fn default() -> Self {
        Self::Pwad
    }
}

impl fmt::Display for WadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag() {
            Some(tag) => f.write_str(&String::from_utf8_lossy(&tag)),
            None => f.write_str("INVALID"),
        }
    }
}

/// Fixed header at the beginning of the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub tag: [u8; 4],
    pub entry_count: u32,
    pub directory_offset: u32,
}

impl Header {
    /// Write header to a writer
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.tag)?;
        writer.write_all(&self.entry_count.to_le_bytes())?;
        writer.write_all(&self.directory_offset.to_le_bytes())?;
        Ok(())
    }

    /// Read header from a reader, rejecting unknown tags
    pub fn read_from<R: Read>(mut reader: R) -> Result<(Self, WadType)> {
        let mut tag = [0u8; 4];
        reader
            .read_exact(&mut tag)
            .map_err(|e| WadError::from_read(e, "format tag"))?;

        let wad_type = WadType::from_tag(&tag);
        if wad_type == WadType::Invalid {
            return Err(WadError::UnknownFormat(
                String::from_utf8_lossy(&tag).into_owned(),
            ));
        }

        let entry_count = read_u32(&mut reader, "entry count")?;
        let directory_offset = read_u32(&mut reader, "directory offset")?;

        Ok((
            Self {
                tag,
                entry_count,
                directory_offset,
            },
            wad_type,
        ))
    }
}

/// One record of the trailing directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryRecord {
    pub offset: u32,
    pub size: u32,
    pub name: [u8; NAME_LENGTH],
}

impl DirectoryRecord {
    /// Write record to the directory
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.offset.to_le_bytes())?;
        writer.write_all(&self.size.to_le_bytes())?;
        writer.write_all(&self.name)?;
        Ok(())
    }

    /// Read record from the directory
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let offset = read_u32(&mut reader, "directory record offset")?;
        let size = read_u32(&mut reader, "directory record size")?;

        let mut name = [0u8; NAME_LENGTH];
        reader
            .read_exact(&mut name)
            .map_err(|e| WadError::from_read(e, "directory record name"))?;

        Ok(Self { offset, size, name })
    }
}

fn read_u32<R: Read>(mut reader: R, what: &str) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .map_err(|e| WadError::from_read(e, what))?;
    Ok(u32::from_le_bytes(buf))
}
