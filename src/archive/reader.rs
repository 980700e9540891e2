use crate::archive::entry::{Entry, EntryName};
use crate::archive::envelope::CompressionSettings;
use crate::archive::format::{DirectoryRecord, Header};
use crate::archive::wad::Archive;
use crate::error::{WadError, Result};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, info};

/// Upper bound on directory entries reserved up front
const MAX_PREALLOCATED_ENTRIES: usize = 4096;

impl Archive {
    /// Open and decode a WAD file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::read_from(BufReader::new(file), name)
    }

    /// Decode an archive held in memory
    pub fn from_bytes(bytes: &[u8], name: impl Into<String>) -> Result<Self> {
        Self::read_from(Cursor::new(bytes), name)
    }

    /// Decode an archive from a seekable stream
    ///
    /// Reads the header, walks the directory and pulls each payload from its
    /// recorded offset. Any read past the end of the stream fails with
    /// [`WadError::Truncated`]; no partial archive is returned.
    pub fn read_from<R: Read + Seek>(mut reader: R, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let base = reader.stream_position()?;

        let (header, wad_type) = Header::read_from(&mut reader)?;
        debug!(
            archive = %name,
            tag = %wad_type,
            count = header.entry_count,
            directory = header.directory_offset,
            "read header"
        );

        reader.seek(SeekFrom::Start(base + u64::from(header.directory_offset)))?;

        let count = header.entry_count as usize;
        let mut entries = Vec::with_capacity(count.min(MAX_PREALLOCATED_ENTRIES));

        for index in 0..count {
            let record = DirectoryRecord::read_from(&mut reader)?;
            let directory_cursor = reader.stream_position()?;

            reader.seek(SeekFrom::Start(base + u64::from(record.offset)))?;
            let data = read_payload(&mut reader, record.size as usize, index)?;
            reader.seek(SeekFrom::Start(directory_cursor))?;

            entries.push(Entry {
                name: EntryName::from(record.name),
                stored_offset: record.offset,
                data,
            });
        }

        info!(archive = %name, tag = %wad_type, entries = entries.len(), "decoded archive");

        Ok(Self {
            wad_type,
            name,
            directory_offset: header.directory_offset,
            entries,
            compression: CompressionSettings::default(),
        })
    }
}

/// Read exactly `size` payload bytes without trusting `size` for allocation
fn read_payload<R: Read>(reader: &mut R, size: usize, index: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader
        .by_ref()
        .take(size as u64)
        .read_to_end(&mut data)
        .map_err(|e| WadError::from_read(e, "entry payload"))?;

    if data.len() != size {
        return Err(WadError::Truncated(format!(
            "entry {} expects {} bytes, only {} available",
            index,
            size,
            data.len()
        )));
    }
    Ok(data)
}
