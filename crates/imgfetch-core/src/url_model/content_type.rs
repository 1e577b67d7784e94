//! File extension inference from a declared `Content-Type`.

/// Extension used when the content type is absent or not in the table.
pub const DEFAULT_EXTENSION: &str = ".jpg";

const EXTENSIONS: &[(&str, &str)] = &[
    ("image/jpeg", ".jpg"),
    ("image/png", ".png"),
    ("image/gif", ".gif"),
    ("image/webp", ".webp"),
    ("image/bmp", ".bmp"),
    ("image/svg+xml", ".svg"),
];

/// Returns the MIME essence of a header value: parameters after `;` dropped,
/// whitespace trimmed, ASCII-lowercased.
pub fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Maps a content type to a file extension (with leading dot).
///
/// Matching is case-insensitive and ignores parameters such as `charset`.
/// Unknown or missing types map to [`DEFAULT_EXTENSION`].
pub fn extension_for_content_type(content_type: Option<&str>) -> &'static str {
    let Some(ct) = content_type else {
        return DEFAULT_EXTENSION;
    };
    let essence = mime_essence(ct);
    EXTENSIONS
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, ext)| *ext)
        .unwrap_or(DEFAULT_EXTENSION)
}
