use crate::archive::wad::Archive;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Directory summary of an archive, as printed when inspecting a WAD
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub archive: String,
    pub format: String,
    pub entries: Vec<ListingEntry>,
}

/// One row of a [`Listing`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// 1-based position
    pub position: usize,
    pub name: String,
    pub size: u32,
    /// Informational offset (exact after a decode or encode)
    pub offset: u32,
}

impl Listing {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "WAD: {} ({})", self.archive, self.format)?;
        writeln!(f, "Files ({}):", self.entries.len())?;
        for row in &self.entries {
            writeln!(
                f,
                "File {}: {} (Size: {}, Offset: {})",
                row.position, row.name, row.size, row.offset
            )?;
        }
        Ok(())
    }
}

impl Archive {
    /// Summarize the directory
    pub fn listing(&self) -> Listing {
        Listing {
            archive: self.name.clone(),
            format: self.wad_type.to_string(),
            entries: self
                .entries
                .iter()
                .enumerate()
                .map(|(index, entry)| ListingEntry {
                    position: index + 1,
                    name: entry.name.display(),
                    size: entry.size(),
                    offset: entry.stored_offset,
                })
                .collect(),
        }
    }
}
