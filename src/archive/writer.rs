use crate::archive::format::{DirectoryRecord, Header, HEADER_SIZE};
use crate::archive::wad::Archive;
use crate::error::{WadError, Result};
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, info};

impl Archive {
    /// Encode the archive into a file, replacing it
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Encode the archive into a byte vector
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_to(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Encode the archive into a seekable stream
    ///
    /// Payloads are written in entry order and every offset is taken from
    /// the stream as it is written; the directory offset in the header is
    /// backpatched once the payload region is complete. Afterwards the
    /// in-memory offsets reflect the bytes just written.
    pub fn write_to<W: Write + Seek>(&mut self, mut writer: W) -> Result<()> {
        let tag = self.wad_type.tag().ok_or(WadError::InvalidArchive)?;
        let entry_count = u32::try_from(self.entries.len())
            .map_err(|_| WadError::ArchiveTooLarge(self.entries.len() as u64))?;

        let base = writer.stream_position()?;

        // Placeholder directory offset, patched below
        let mut header = Header {
            tag,
            entry_count,
            directory_offset: 0,
        };
        header.write_to(&mut writer)?;

        let mut offsets = Vec::with_capacity(self.entries.len());
        let mut position = HEADER_SIZE as u64;
        for entry in &self.entries {
            offsets.push(to_offset(position)?);
            writer.write_all(&entry.data)?;
            position += entry.data.len() as u64;
        }

        header.directory_offset = to_offset(position)?;
        writer.seek(SeekFrom::Start(base))?;
        header.write_to(&mut writer)?;
        writer.seek(SeekFrom::Start(base + position))?;

        for (entry, &offset) in self.entries.iter().zip(&offsets) {
            let record = DirectoryRecord {
                offset,
                size: to_offset(entry.data.len() as u64)?,
                name: entry.name.to_wire(),
            };
            record.write_to(&mut writer)?;
            debug!(name = %entry.name, offset, size = record.size, "wrote directory record");
        }

        self.directory_offset = header.directory_offset;
        for (entry, offset) in self.entries.iter_mut().zip(offsets) {
            entry.stored_offset = offset;
        }

        info!(
            archive = %self.name,
            tag = %self.wad_type,
            entries = entry_count,
            directory = header.directory_offset,
            "encoded archive"
        );
        Ok(())
    }
}

fn to_offset(position: u64) -> Result<u32> {
    u32::try_from(position).map_err(|_| WadError::ArchiveTooLarge(position))
}
