use crate::archive::format::NAME_LENGTH;
use std::path::Path;

/// Default number of bytes kept when an overlong name is truncated
pub const DEFAULT_TRUNCATE_LENGTH: usize = 7;

/// Decides the entry name for a source file whose stem exceeds 8 bytes
///
/// Interactive front-ends can prompt the user here; returning `None` falls
/// back to truncation.
pub trait NamingPolicy {
    fn shorten(&mut self, stem: &str) -> Option<String>;
}

/// Always truncate overlong names
///
/// Declines every stem, so the length configured on the add call
/// (`AddOptions::truncate_to`) decides how many bytes are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct TruncateNames;

impl NamingPolicy for TruncateNames {
    fn shorten(&mut self, _stem: &str) -> Option<String> {
        None
    }
}

impl<F> NamingPolicy for F
where
    F: FnMut(&str) -> Option<String>,
{
    fn shorten(&mut self, stem: &str) -> Option<String> {
        self(stem)
    }
}

/// Derive an entry name from a source path: strip the extension, then ask
/// `policy` when the stem is longer than 8 bytes
///
/// Names from `policy` are cut to 8 bytes; when it declines, the stem is
/// truncated to `keep` bytes (clamped to `1..=8`).
pub fn entry_name_for_path(path: &Path, policy: &mut dyn NamingPolicy, keep: usize) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if stem.len() <= NAME_LENGTH {
        return stem;
    }

    match policy.shorten(&stem) {
        Some(name) if !name.is_empty() => truncate_bytes(&name, NAME_LENGTH).to_string(),
        _ => truncate_bytes(&stem, keep.clamp(1, NAME_LENGTH)).to_string(),
    }
}

/// Reduce a marker label to at most two significant characters
///
/// Cuts at the first underscore, then keeps at most two characters, so
/// `MAPINFO` becomes `MA` and `F_SKY1` becomes `F`.
pub fn trim_marker_label(label: &str) -> String {
    let head = label.split('_').next().unwrap_or(label);
    head.chars().take(2).collect()
}

/// Longest prefix of `s` within `max` bytes that ends on a char boundary
fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
