use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::store::{ColourEntry, Palette};

/// A `#` followed by 8 hex digits, or else 6. Longer runs yield their
/// leading 8 or 6 digits.
static HEX_COLOUR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#(?:[0-9A-Fa-f]{8}|[0-9A-Fa-f]{6})").expect("hex colour pattern is valid")
});

/// Iterate the hex colour literals in `text`, in order, duplicates included.
pub fn find_colours(text: &str) -> impl Iterator<Item = &str> {
    HEX_COLOUR.find_iter(text).map(|m| m.as_str())
}

/// Collect the distinct hex colours in `text` into a fresh palette.
///
/// Distinctness is exact string equality, so `#ABCDEF` and `#abcdef` are two
/// entries. Entries are in first-seen order.
pub fn extract(text: &str) -> Palette {
    let mut seen = HashSet::new();
    let palette: Palette = find_colours(text)
        .filter(|s| seen.insert(*s))
        .map(ColourEntry::new)
        .collect();
    debug!(count = palette.len(), "extracted colours from text");
    palette
}
