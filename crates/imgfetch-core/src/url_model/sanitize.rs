//! Allow-list filename sanitization.

/// True if `c` may appear in a saved filename: ASCII letters, digits, `.`, `-`, `_`.
pub fn is_safe_filename_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_'
}

/// Replaces every character outside `[A-Za-z0-9.-_]` with `_`.
///
/// One `_` per character (multi-byte characters included), so the output has
/// the same number of characters as the input. Path separators, control
/// characters and spaces can never survive.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if is_safe_filename_char(c) { c } else { '_' })
        .collect()
}
