//! Suggested filenames for exported documents.

/// Base used when the title has no usable characters.
pub const DEFAULT_FILENAME_BASE: &str = "autobiography";

/// Derives a filename base from a document title.
///
/// Whitespace runs become a single `_`, the result is lowercased, and
/// path separators, quotes and control characters are dropped.
pub fn filename_base(title: &str) -> String {
    let base = title
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| !matches!(c, '/' | '\\' | '"') && !c.is_control())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();

    if base.is_empty() {
        DEFAULT_FILENAME_BASE.to_string()
    } else {
        base
    }
}
