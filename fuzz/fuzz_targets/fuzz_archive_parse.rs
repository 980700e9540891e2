#![no_main]

use libfuzzer_sys::fuzz_target;
use wad_rs::{Archive, WadError, WadType};

fuzz_target!(|data: &[u8]| {
    // Skip inputs shorter than a header
    if data.len() < wad_rs::HEADER_SIZE {
        return;
    }

    // Decoding must never panic
    let mut wad = match Archive::from_bytes(data, "fuzz.wad") {
        Ok(w) => w,
        Err(_) => return, // Expected for invalid data
    };

    let _ = wad.listing().to_string();

    // Unwrapping ZWAD payloads must fail cleanly on garbage
    for index in 0..wad.len() {
        let _ = wad.entry_bytes(index);
    }

    let _ = wad.find("PLAYPAL");
    let _ = wad.find("");

    // Overlapping entries may legitimately overflow 32-bit offsets
    match wad.to_bytes() {
        Ok(_) | Err(WadError::ArchiveTooLarge(_)) => {}
        Err(e) => panic!("decoded archive failed to re-encode: {}", e),
    }

    if wad.is_compressed() {
        let _ = wad.decompress_archive(WadType::Pwad);
    }
});
