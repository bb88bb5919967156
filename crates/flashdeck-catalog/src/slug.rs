//! Slug normalization

/// Character that replaces runs of non-alphanumerics
pub const SEPARATOR: char = '-';

/// Canonical lookup key for a display name or URL path segment.
///
/// Lower-cases, collapses every run of characters outside `[a-z0-9]` into a
/// single [`SEPARATOR`] and trims separators from both ends. Total and
/// idempotent; blank input gives an empty string.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_separator = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !out.is_empty() {
                out.push(SEPARATOR);
            }
            pending_separator = false;
            out.push(c);
        } else {
            pending_separator = true;
        }
    }

    out
}
