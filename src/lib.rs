//! wad-rs: read, edit and write WAD archives
//!
//! A WAD is a 12-byte header, a run of named byte blobs ("lumps") and a
//! trailing directory of `(offset, size, name)` records. This library
//! provides:
//! - Decoding and encoding of IWAD, PWAD, ZWAD and SDLL archives
//! - Structural edits (add, remove, rename, swap, move, merge, markers)
//! - The ZWAD per-entry compression envelope (LZ4 or Zstd blocks)
//! - Extraction with extension guessing and directory listings
//!
//! # Example
//!
//! ```no_run
//! use wad_rs::{Archive, WadType};
//!
//! let mut wad = Archive::open("mod.wad")?;
//! wad.create_markers("FF");
//! wad.insert_within_markers("FF", "FLAT01", vec![0u8; 4096], false)?;
//! wad.move_name("PLAYPAL", 0, false)?;
//! wad.compress_archive()?;
//! assert_eq!(wad.wad_type(), WadType::Zwad);
//! wad.save("mod.zwad")?;
//! # Ok::<(), wad_rs::error::WadError>(())
//! ```

pub mod archive;
pub mod config;
pub mod error;

pub use archive::{
    trim_marker_label, AddOptions, Archive, BlockCodec, BlockMethod, CompressionSettings, Entry,
    EntryName, EntrySelector, Listing, NamingPolicy, Placement, TruncateNames, WadType,
    HEADER_SIZE, MIN_COMPRESSION_SIZE, NAME_LENGTH,
};
pub use config::WadConfig;
pub use error::{Result, WadError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        let wad = Archive::default();
        assert_eq!(wad.wad_type(), WadType::Pwad);
        let _settings = CompressionSettings::default();
    }
}
