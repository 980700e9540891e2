use crate::archive::entry::Entry;
use crate::archive::envelope::unwrap;
use crate::archive::wad::Archive;
use crate::error::{WadError, Result};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Guess an output file extension from well-known entry name prefixes
pub fn extension_for_name(name: &[u8]) -> &'static str {
    if name.starts_with(b"SOC_") || name.starts_with(b"MAINCFG") || name == b"OBJCTCFG" {
        ".soc"
    } else if name.starts_with(b"LUA_") {
        ".lua"
    } else if name.starts_with(b"D_") {
        ".midi"
    } else {
        ".lmp"
    }
}

/// File name an entry is extracted to
///
/// The name is cut at its first zero byte either way, since zero bytes
/// cannot appear in file names.
pub fn output_file_name(entry: &Entry, with_extension: bool) -> String {
    let mut file_name = entry.name.display();
    if with_extension {
        file_name.push_str(extension_for_name(entry.name.trimmed()));
    }
    file_name
}

/// Reject names that would leave the extraction directory
fn check_file_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', ':']) {
        return Err(WadError::InvalidEntryName(name.to_string()));
    }
    Ok(())
}

impl Archive {
    /// Raw bytes of the entry at `index`, with the envelope removed on a ZWAD
    ///
    /// Read-only: the stored entry keeps its enveloped payload.
    pub fn entry_bytes(&self, index: usize) -> Result<Cow<'_, [u8]>> {
        let entry = self.entries.get(index).ok_or(WadError::OutOfRange {
            index: index as i64,
            len: self.entries.len(),
        })?;

        if !self.wad_type.is_compressed() {
            return Ok(Cow::Borrowed(entry.data.as_slice()));
        }

        let raw = unwrap(&self.compression.method, &entry.name.display(), &entry.data)?;
        Ok(Cow::Owned(raw))
    }

    /// Write the entry at `index` into the existing directory `dir`
    ///
    /// Names containing path separators, or that are `.` or `..`, fail with
    /// [`WadError::InvalidEntryName`]. Returns the path written and the
    /// number of bytes written.
    pub fn extract_index(
        &self,
        index: usize,
        dir: &Path,
        with_extension: bool,
    ) -> Result<(PathBuf, usize)> {
        let bytes = self.entry_bytes(index)?;
        let entry = &self.entries[index];
        check_file_name(&entry.name.display())?;
        let path = dir.join(output_file_name(entry, with_extension));

        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(&bytes)?;
        writer.flush()?;

        debug!(path = %path.display(), size = bytes.len(), "extracted entry");
        Ok((path, bytes.len()))
    }

    /// Extract the first entry named `name`
    pub fn extract_name(
        &self,
        name: &str,
        dir: &Path,
        with_extension: bool,
    ) -> Result<(PathBuf, usize)> {
        let index = self
            .find(name)
            .ok_or_else(|| WadError::NotFound(name.to_string()))?;
        self.extract_index(index, dir, with_extension)
    }

    /// Extract several entries by name, one outcome per name
    pub fn extract_many<'a, I>(
        &self,
        names: I,
        dir: &Path,
        with_extension: bool,
    ) -> Vec<Result<(PathBuf, usize)>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .map(|name| {
                let outcome = self.extract_name(name, dir, with_extension);
                if let Err(err) = &outcome {
                    warn!(name, %err, "could not extract entry");
                }
                outcome
            })
            .collect()
    }

    /// Extract every entry, one outcome per entry
    pub fn extract_all(&self, dir: &Path, with_extension: bool) -> Vec<Result<(PathBuf, usize)>> {
        (0..self.entries.len())
            .map(|index| {
                let outcome = self.extract_index(index, dir, with_extension);
                if let Err(err) = &outcome {
                    warn!(index, %err, "could not extract entry");
                }
                outcome
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::format::WadType;

    #[test]
    fn test_extension_rules() {
        assert_eq!(extension_for_name(b"LUA_GAME"), ".lua");
        assert_eq!(extension_for_name(b"SOC_LVL1"), ".soc");
        assert_eq!(extension_for_name(b"MAINCFG"), ".soc");
        assert_eq!(extension_for_name(b"OBJCTCFG"), ".soc");
        assert_eq!(extension_for_name(b"D_RUNNIN"), ".midi");
        assert_eq!(extension_for_name(b"PLAYPAL"), ".lmp");
    }

    #[test]
    fn test_output_name_strips_padding() {
        let entry = Entry::new(*b"LUA_A\0\0\0", Vec::new());
        assert_eq!(output_file_name(&entry, true), "LUA_A.lua");
        assert_eq!(output_file_name(&entry, false), "LUA_A");
    }

    #[test]
    fn test_entry_bytes_is_read_only_on_zwad() {
        let mut wad = Archive::new("z.wad", WadType::Zwad);
        let payload = b"COLORMAP".repeat(512);
        wad.add_entry("COLORMAP", payload.clone(), false).unwrap();
        let stored = wad[0].data.clone();

        assert_eq!(&*wad.entry_bytes(0).unwrap(), &payload[..]);
        assert_eq!(wad[0].data, stored);
    }

    #[test]
    fn test_extract_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut wad = Archive::default();
        wad.add_entry("LUA_MAIN", b"print('hi')".to_vec(), false).unwrap();

        let (path, written) = wad.extract_name("LUA_MAIN", dir.path(), true).unwrap();
        assert_eq!(path, dir.path().join("LUA_MAIN.lua"));
        assert_eq!(written, 11);
        assert_eq!(std::fs::read(&path).unwrap(), b"print('hi')".to_vec());
    }

    #[test]
    fn test_rejects_unsafe_names() {
        for name in ["../../PW", "/ETC", "A\\B", "..", ".", "C:X", ""] {
            assert!(matches!(
                check_file_name(name),
                Err(WadError::InvalidEntryName(_))
            ));
        }
        assert!(check_file_name("PLAYPAL").is_ok());
        assert!(check_file_name("S_START").is_ok());
    }

    #[test]
    fn test_extract_many_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut wad = Archive::default();
        wad.add_entry("A", vec![1], false).unwrap();

        let outcomes = wad.extract_many(["A", "MISSING"], dir.path(), false);
        assert!(outcomes[0].is_ok());
        assert!(matches!(outcomes[1], Err(WadError::NotFound(_))));
    }
}
