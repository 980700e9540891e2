//! Structural edits: add, remove, rename, swap, move, merge and markers
//!
//! Every edit either completes or leaves the archive unchanged. Batch
//! helpers (`rename_many`, `remove_many`) keep going after a failed item and
//! report one outcome per item.

use crate::archive::entry::Entry;
use crate::archive::envelope::compress_entry;
use crate::archive::format::WadType;
use crate::archive::naming::{
    entry_name_for_path, trim_marker_label, NamingPolicy, DEFAULT_TRUNCATE_LENGTH,
};
use crate::archive::wad::Archive;
use crate::error::{WadError, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Suffix of the entry that opens a marker range
pub const MARKER_START_SUFFIX: &str = "_START";

/// Suffix of the entry that closes a marker range
pub const MARKER_END_SUFFIX: &str = "_END";

/// How a new entry is named and placed
#[derive(Debug, Clone)]
pub struct AddOptions {
    /// Explicit entry name; bypasses the naming policy
    pub rename: Option<String>,
    /// Replace the first entry with the same name instead of appending
    pub replace_existing: bool,
    /// Bytes kept when an overlong name is truncated, clamped to `1..=8`
    pub truncate_to: usize,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self {
            rename: None,
            replace_existing: false,
            truncate_to: DEFAULT_TRUNCATE_LENGTH,
        }
    }
}

/// Entry reference for batch removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySelector {
    Index(usize),
    Name(String),
}

/// Where `insert_within_markers` placed an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Just before the closing marker, at this index
    WithinMarkers(usize),
    /// Marker not found; the entry stayed at this index
    Unplaced(usize),
}

impl Archive {
    /// Add an entry, compressing it first when the archive is a ZWAD
    ///
    /// With `replace_existing`, the first entry named `name` is replaced in
    /// place; otherwise the entry is appended. Returns its index.
    pub fn add_entry(&mut self, name: &str, data: Vec<u8>, replace_existing: bool) -> Result<usize> {
        let mut entry = Entry::new(name, data);
        entry.stored_offset = self.stored_size_total();

        if self.wad_type.is_compressed() {
            compress_entry(&self.compression, &mut entry)?;
        }

        if replace_existing {
            if let Some(index) = self.find(name) {
                entry.stored_offset = self.entries[index].stored_offset;
                self.entries[index] = entry;
                debug!(name, index, "replaced entry");
                return Ok(index);
            }
        }

        self.entries.push(entry);
        let index = self.entries.len() - 1;
        debug!(name, index, "appended entry");
        Ok(index)
    }

    /// Add a file from disk
    ///
    /// Without an explicit rename the entry is named after the file stem;
    /// stems longer than 8 bytes go through `policy`.
    pub fn add_file(
        &mut self,
        path: &Path,
        options: &AddOptions,
        policy: &mut dyn NamingPolicy,
    ) -> Result<usize> {
        let data = std::fs::read(path)?;
        let name = match &options.rename {
            Some(name) if !name.is_empty() => name.clone(),
            _ => entry_name_for_path(path, policy, options.truncate_to),
        };
        self.add_entry(&name, data, options.replace_existing)
    }

    /// Add an entry and place it inside the `<label>_START`/`<label>_END` range
    ///
    /// The label is reduced with [`trim_marker_label`] first. An entry that
    /// does not already sit between the markers is moved to just before
    /// `<label>_END`. When the closing marker does not exist the entry is
    /// still added and left where it landed.
    pub fn insert_within_markers(
        &mut self,
        label: &str,
        name: &str,
        data: Vec<u8>,
        replace_existing: bool,
    ) -> Result<Placement> {
        let label = trim_marker_label(label);
        let start_marker = format!("{}{}", label, MARKER_START_SUFFIX);
        let end_marker = format!("{}{}", label, MARKER_END_SUFFIX);

        let index = self.add_entry(name, data, replace_existing)?;

        let end = match self.find(&end_marker) {
            Some(end) => end,
            None => {
                warn!(marker = %end_marker, name, "marker not found, entry left at the end");
                return Ok(Placement::Unplaced(index));
            }
        };

        let after_start = self.find(&start_marker).map_or(true, |start| start < index);
        if after_start && index < end {
            return Ok(Placement::WithinMarkers(index));
        }

        let target = if index < end { end - 1 } else { end };
        let placed = self.move_index(index, target as i64, false)?;
        Ok(Placement::WithinMarkers(placed))
    }

    /// Remove the entry at `index`
    pub fn remove_index(&mut self, index: usize) -> Result<Entry> {
        if index >= self.entries.len() {
            return Err(WadError::OutOfRange {
                index: index as i64,
                len: self.entries.len(),
            });
        }
        let removed = self.entries.remove(index);
        debug!(name = %removed.name, index, "removed entry");
        Ok(removed)
    }

    /// Remove every entry named `name`; returns how many were removed
    pub fn remove_name(&mut self, name: &str) -> Result<usize> {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !entry.name.matches(name.as_bytes()));

        let removed = before - self.entries.len();
        if removed == 0 {
            return Err(WadError::NotFound(name.to_string()));
        }
        debug!(name, removed, "removed entries by name");
        Ok(removed)
    }

    /// Remove several entries in order, one outcome per selector
    pub fn remove_many<I>(&mut self, selectors: I) -> Vec<Result<usize>>
    where
        I: IntoIterator<Item = EntrySelector>,
    {
        selectors
            .into_iter()
            .map(|selector| {
                let outcome = match &selector {
                    EntrySelector::Index(index) => self.remove_index(*index).map(|_| 1),
                    EntrySelector::Name(name) => self.remove_name(name),
                };
                if let Err(err) = &outcome {
                    warn!(?selector, %err, "could not remove entry");
                }
                outcome
            })
            .collect()
    }

    /// Rename the first entry named `name`; returns its index
    pub fn rename(&mut self, name: &str, new_name: &str) -> Result<usize> {
        let index = self
            .find(name)
            .ok_or_else(|| WadError::NotFound(name.to_string()))?;
        self.entries[index].name = new_name.into();
        debug!(from = name, to = new_name, index, "renamed entry");
        Ok(index)
    }

    /// Apply several renames in order, one outcome per pair
    pub fn rename_many<'a, I>(&mut self, pairs: I) -> Vec<Result<usize>>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .map(|(name, new_name)| {
                let outcome = self.rename(name, new_name);
                if let Err(err) = &outcome {
                    warn!(name, new_name, %err, "could not rename entry");
                }
                outcome
            })
            .collect()
    }

    /// Exchange the entries at `first` and `second`
    pub fn swap_index(&mut self, first: usize, second: usize) -> Result<()> {
        let len = self.entries.len();
        for index in [first, second] {
            if index >= len {
                return Err(WadError::OutOfRange {
                    index: index as i64,
                    len,
                });
            }
        }
        self.entries.swap(first, second);
        Ok(())
    }

    /// Exchange the first entries named `first` and `second`
    ///
    /// Both names must resolve; otherwise nothing moves.
    pub fn swap_names(&mut self, first: &str, second: &str) -> Result<()> {
        let a = self
            .find(first)
            .ok_or_else(|| WadError::NotFound(first.to_string()))?;
        let b = self
            .find(second)
            .ok_or_else(|| WadError::NotFound(second.to_string()))?;
        self.entries.swap(a, b);
        debug!(first, second, "swapped entries");
        Ok(())
    }

    /// Move the entry at `index` to `position` (or by `position`, if `relative`)
    ///
    /// Entries between the old and new slots keep their relative order; the
    /// target must lie within `0..len`. Returns the final index.
    pub fn move_index(&mut self, index: usize, position: i64, relative: bool) -> Result<usize> {
        let len = self.entries.len();
        if index >= len {
            return Err(WadError::OutOfRange {
                index: index as i64,
                len,
            });
        }

        let target = if relative {
            index as i64 + position
        } else {
            position
        };
        if target < 0 || target >= len as i64 {
            return Err(WadError::OutOfRange { index: target, len });
        }
        let target = target as usize;

        if index < target {
            self.entries[index..=target].rotate_left(1);
        } else if index > target {
            self.entries[target..=index].rotate_right(1);
        }

        debug!(from = index, to = target, "moved entry");
        Ok(target)
    }

    /// Move the first entry named `name`; see [`Archive::move_index`]
    pub fn move_name(&mut self, name: &str, position: i64, relative: bool) -> Result<usize> {
        let index = self
            .find(name)
            .ok_or_else(|| WadError::NotFound(name.to_string()))?;
        self.move_index(index, position, relative)
    }

    /// Append every entry of `other`, converting it to this archive's
    /// compression state and block codec first. Returns the number of
    /// entries appended.
    pub fn merge(&mut self, mut other: Archive) -> Result<usize> {
        match (self.is_compressed(), other.is_compressed()) {
            (true, false) => {
                other.compression = self.compression;
                other.compress_archive()?;
            }
            (false, true) => other.decompress_archive(WadType::Pwad)?,
            // Blocks only decode with the codec that produced them
            (true, true) if other.compression.method != self.compression.method => {
                other.decompress_archive(WadType::Pwad)?;
                other.compression = self.compression;
                other.compress_archive()?;
            }
            _ => {}
        }

        let appended = other.entries.len();
        let mut offset = self.stored_size_total();
        for mut entry in other.entries {
            entry.stored_offset = offset;
            offset = offset.wrapping_add(entry.size());
            self.entries.push(entry);
        }

        info!(into = %self.name, from = %other.name, appended, "merged archive");
        Ok(appended)
    }

    /// Append zero-length `<tag>_START` and `<tag>_END` entries
    ///
    /// The tag is used as given; see [`trim_marker_label`] for reducing a
    /// label first. Returns the index of the opening marker.
    pub fn create_markers(&mut self, tag: &str) -> usize {
        let offset = self.stored_size_total();
        for suffix in [MARKER_START_SUFFIX, MARKER_END_SUFFIX] {
            let mut marker = Entry::marker(format!("{}{}", tag, suffix));
            marker.stored_offset = offset;
            self.entries.push(marker);
        }
        debug!(tag, "created markers");
        self.entries.len() - 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::naming::TruncateNames;
    use std::io::Write;

    fn names(wad: &Archive) -> Vec<String> {
        wad.entries().iter().map(|e| e.name.display()).collect()
    }

    fn abcde() -> Archive {
        let mut wad = Archive::default();
        for (i, name) in ["A", "B", "C", "D", "E"].iter().enumerate() {
            wad.add_entry(name, vec![i as u8], false).unwrap();
        }
        wad
    }

    #[test]
    fn test_move_rotates_toward_front() {
        let mut wad = abcde();
        assert_eq!(wad.move_index(2, 0, false).unwrap(), 0);
        assert_eq!(names(&wad), ["C", "A", "B", "D", "E"]);
    }

    #[test]
    fn test_move_rotates_toward_back() {
        let mut wad = abcde();
        wad.move_index(1, 3, false).unwrap();
        assert_eq!(names(&wad), ["A", "C", "D", "B", "E"]);
    }

    #[test]
    fn test_move_relative() {
        let mut wad = abcde();
        wad.move_name("D", -2, true).unwrap();
        assert_eq!(names(&wad), ["A", "D", "B", "C", "E"]);
        wad.move_name("A", 4, true).unwrap();
        assert_eq!(names(&wad), ["D", "B", "C", "E", "A"]);
    }

    #[test]
    fn test_move_to_same_index_is_noop() {
        let mut wad = abcde();
        wad.move_index(3, 3, false).unwrap();
        assert_eq!(names(&wad), ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_move_out_of_bounds_rejected() {
        let mut wad = abcde();
        assert!(matches!(
            wad.move_index(0, 5, false),
            Err(WadError::OutOfRange { index: 5, .. })
        ));
        assert!(matches!(
            wad.move_index(1, -2, true),
            Err(WadError::OutOfRange { index: -1, .. })
        ));
        assert!(matches!(
            wad.move_name("Z", 0, false),
            Err(WadError::NotFound(_))
        ));
        assert_eq!(names(&wad), ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_swap_twice_restores_order() {
        let mut wad = abcde();
        wad.swap_index(0, 4).unwrap();
        assert_eq!(names(&wad), ["E", "B", "C", "D", "A"]);
        wad.swap_index(0, 4).unwrap();
        assert_eq!(names(&wad), ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_swap_moves_whole_record() {
        let mut wad = abcde();
        wad.swap_names("B", "D").unwrap();
        assert!(wad[1].name == "D");
        assert_eq!(wad[1].data, vec![3]);
        assert!(wad[3].name == "B");
        assert_eq!(wad[3].data, vec![1]);
    }

    #[test]
    fn test_swap_with_missing_name_mutates_nothing() {
        let mut wad = abcde();
        assert!(matches!(
            wad.swap_names("A", "NOPE"),
            Err(WadError::NotFound(name)) if name == "NOPE"
        ));
        assert!(wad.swap_index(0, 9).is_err());
        assert_eq!(names(&wad), ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_remove_by_name_removes_all_matches() {
        let mut wad = abcde();
        wad.add_entry("B", vec![9], false).unwrap();
        assert_eq!(wad.remove_name("B").unwrap(), 2);
        assert_eq!(names(&wad), ["A", "C", "D", "E"]);
        assert!(matches!(wad.remove_name("B"), Err(WadError::NotFound(_))));
    }

    #[test]
    fn test_remove_by_index() {
        let mut wad = abcde();
        let removed = wad.remove_index(0).unwrap();
        assert!(removed.name == "A");
        assert!(matches!(
            wad.remove_index(10),
            Err(WadError::OutOfRange { index: 10, len: 4 })
        ));
    }

    #[test]
    fn test_remove_many_continues_after_failure() {
        let mut wad = abcde();
        let outcomes = wad.remove_many(vec![
            EntrySelector::Name("NOPE".to_string()),
            EntrySelector::Index(0),
            EntrySelector::Name("E".to_string()),
        ]);
        assert!(outcomes[0].is_err());
        assert_eq!(outcomes[1].as_ref().unwrap(), &1);
        assert_eq!(outcomes[2].as_ref().unwrap(), &1);
        assert_eq!(names(&wad), ["B", "C", "D"]);
    }

    #[test]
    fn test_rename_first_match_only() {
        let mut wad = abcde();
        wad.add_entry("A", vec![7], false).unwrap();
        assert_eq!(wad.rename("A", "Z").unwrap(), 0);
        assert_eq!(names(&wad), ["Z", "B", "C", "D", "E", "A"]);
    }

    #[test]
    fn test_rename_many_reports_each_item() {
        let mut wad = abcde();
        let outcomes = wad.rename_many(vec![("A", "AA"), ("NOPE", "X"), ("C", "CC")]);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_ok());
        assert!(matches!(outcomes[1], Err(WadError::NotFound(_))));
        assert!(outcomes[2].is_ok());
        assert_eq!(names(&wad), ["AA", "B", "CC", "D", "E"]);
    }

    #[test]
    fn test_add_replace_existing_keeps_position() {
        let mut wad = abcde();
        let index = wad.add_entry("C", vec![42, 42], true).unwrap();
        assert_eq!(index, 2);
        assert_eq!(wad.len(), 5);
        assert_eq!(wad[2].data, vec![42, 42]);

        let index = wad.add_entry("F", vec![5], true).unwrap();
        assert_eq!(index, 5);
    }

    #[test]
    fn test_add_to_compressed_archive_envelopes_entry() {
        let mut wad = Archive::new("z.wad", WadType::Zwad);
        wad.add_entry("TEST", vec![0, 1, 2, 3], false).unwrap();
        assert_eq!(wad[0].data, vec![0, 0, 0, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn test_add_file_uses_naming_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LONGSOUNDNAME.ogg");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"OggS")
            .unwrap();

        let mut wad = Archive::default();
        let mut policy = TruncateNames::default();
        let index = wad
            .add_file(&path, &AddOptions::default(), &mut policy)
            .unwrap();
        assert!(wad[index].name == "LONGSOU");
        assert_eq!(wad[index].data, b"OggS".to_vec());

        let options = AddOptions {
            rename: Some("DSOGG".to_string()),
            ..AddOptions::default()
        };
        let index = wad.add_file(&path, &options, &mut policy).unwrap();
        assert!(wad[index].name == "DSOGG");
    }

    #[test]
    fn test_add_missing_file_is_io_error() {
        let mut wad = Archive::default();
        let mut policy = TruncateNames::default();
        let result = wad.add_file(
            Path::new("/definitely/not/here.lmp"),
            &AddOptions::default(),
            &mut policy,
        );
        assert!(matches!(result, Err(WadError::Io(_))));
        assert!(wad.is_empty());
    }

    #[test]
    fn test_create_markers_on_empty_archive() {
        let mut wad = Archive::default();
        assert_eq!(wad.create_markers("FOO"), 0);
        assert_eq!(names(&wad), ["FOO_START", "FOO_END"]);
        assert_eq!(wad[0].size(), 0);
        assert_eq!(wad[1].size(), 0);
        assert_eq!(wad[0].stored_offset, wad[1].stored_offset);
    }

    #[test]
    fn test_insert_within_markers() {
        let mut wad = Archive::default();
        wad.create_markers("S");
        wad.add_entry("AFTER", vec![1], false).unwrap();

        let placement = wad
            .insert_within_markers("S_START", "SPRITE", vec![2], false)
            .unwrap();
        assert_eq!(placement, Placement::WithinMarkers(1));
        assert_eq!(names(&wad), ["S_START", "SPRITE", "S_END", "AFTER"]);
    }

    #[test]
    fn test_insert_within_markers_moves_replaced_entry() {
        let mut wad = Archive::default();
        wad.add_entry("FLAT", vec![1], false).unwrap();
        wad.create_markers("FF");

        let placement = wad
            .insert_within_markers("FF", "FLAT", vec![2], true)
            .unwrap();
        assert_eq!(placement, Placement::WithinMarkers(1));
        assert_eq!(names(&wad), ["FF_START", "FLAT", "FF_END"]);
        assert_eq!(wad[1].data, vec![2]);
    }

    #[test]
    fn test_insert_within_markers_keeps_entry_already_inside() {
        let mut wad = Archive::default();
        wad.create_markers("FF");
        wad.insert_within_markers("FF", "FLAT1", vec![1], false).unwrap();
        wad.insert_within_markers("FF", "FLAT2", vec![2], false).unwrap();

        let placement = wad
            .insert_within_markers("FF", "FLAT1", vec![3], true)
            .unwrap();
        assert_eq!(placement, Placement::WithinMarkers(1));
        assert_eq!(names(&wad), ["FF_START", "FLAT1", "FLAT2", "FF_END"]);
    }

    #[test]
    fn test_insert_within_missing_markers() {
        let mut wad = abcde();
        let placement = wad
            .insert_within_markers("FF", "FLAT", vec![2], false)
            .unwrap();
        assert_eq!(placement, Placement::Unplaced(5));
    }

    #[test]
    fn test_merge_appends_with_running_offsets() {
        let mut wad = abcde();
        let mut other = Archive::default();
        other.add_entry("X", vec![1, 2, 3], false).unwrap();
        other.add_entry("Y", vec![4], false).unwrap();

        assert_eq!(wad.merge(other).unwrap(), 2);
        assert_eq!(names(&wad), ["A", "B", "C", "D", "E", "X", "Y"]);
        assert_eq!(wad[5].stored_offset, 5);
        assert_eq!(wad[6].stored_offset, 8);
    }

    #[test]
    fn test_merge_recompresses_foreign_codec() {
        use crate::archive::block::BlockMethod;
        use crate::archive::envelope::CompressionSettings;

        let payload = b"SIDEDEFS".repeat(512);
        let mut lz4 = Archive::new("lz4.wad", WadType::Zwad);
        lz4.add_entry("A", payload.clone(), false).unwrap();

        let zstd = CompressionSettings {
            method: BlockMethod::Zstd { level: 3 },
            ..CompressionSettings::default()
        };
        let mut other = Archive::new("zstd.wad", WadType::Zwad).with_compression(zstd);
        other.add_entry("B", payload.clone(), false).unwrap();

        lz4.merge(other).unwrap();
        lz4.decompress_archive(WadType::Pwad).unwrap();
        assert_eq!(lz4[0].data, payload);
        assert_eq!(lz4[1].data, payload);
    }

    #[test]
    fn test_merge_matches_compression_state() {
        let mut zwad = Archive::new("z.wad", WadType::Zwad);
        let mut plain = Archive::default();
        plain.add_entry("RAW", vec![1, 2], false).unwrap();
        zwad.merge(plain).unwrap();
        assert_eq!(zwad[0].data, vec![0, 0, 0, 0, 1, 2]);

        let mut pwad = Archive::default();
        pwad.merge(zwad).unwrap();
        assert_eq!(pwad[0].data, vec![1, 2]);
    }
}
