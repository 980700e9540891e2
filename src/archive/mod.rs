mod block;
mod edit;
mod entry;
mod envelope;
mod extract;
mod format;
mod listing;
mod naming;
mod reader;
mod wad;
mod writer;

pub use block::{BlockCodec, BlockMethod, DEFAULT_ZSTD_LEVEL};
pub use edit::{AddOptions, EntrySelector, Placement, MARKER_END_SUFFIX, MARKER_START_SUFFIX};
pub use entry::{Entry, EntryName};
pub use envelope::{
    compress_entry, decompress_entry, unwrap, wrap, CompressionSettings, MIN_COMPRESSION_SIZE,
    PREFIX_SIZE,
};
pub use extract::{extension_for_name, output_file_name};
pub use format::{
    DirectoryRecord, Header, WadType, DIRECTORY_RECORD_SIZE, HEADER_SIZE, NAME_LENGTH,
};
pub use listing::{Listing, ListingEntry};
pub use naming::{
    entry_name_for_path, trim_marker_label, NamingPolicy, TruncateNames, DEFAULT_TRUNCATE_LENGTH,
};
pub use wad::{Archive, DEFAULT_ARCHIVE_NAME};
