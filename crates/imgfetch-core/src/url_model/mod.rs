//! URL modeling and filename derivation.
//!
//! Derives a safe local filename from the URL path, falling back to a
//! synthesized name whose extension comes from the declared content type.

mod content_type;
mod path;
mod sanitize;
mod unique;

pub use content_type::{extension_for_content_type, mime_essence, DEFAULT_EXTENSION};
pub use path::filename_from_url_path;
pub use sanitize::{is_safe_filename_char, sanitize_filename};
pub use unique::{numbered_candidates, split_stem_ext, unique_filename_in_dir};

/// Stem of the synthesized filename when the URL path has none usable.
pub const FALLBACK_STEM: &str = "downloaded_image";

/// Derives a safe filename for saving an image.
///
/// Uses the last path segment of `url` (percent-decoded) when it contains a
/// `.`; otherwise `downloaded_image` plus the extension mapped from
/// `content_type`. The result only contains `[A-Za-z0-9.-_]`.
///
/// # Examples
///
/// - `derive_filename("https://example.com/cat.png", None)` → `"cat.png"`
/// - `derive_filename("https://example.com/avatar", Some("image/webp"))` → `"downloaded_image.webp"`
pub fn derive_filename(url: &str, content_type: Option<&str>) -> String {
    let raw = match filename_from_url_path(url) {
        Some(name) if name.contains('.') => name,
        _ => format!(
            "{}{}",
            FALLBACK_STEM,
            extension_for_content_type(content_type)
        ),
    };
    sanitize_filename(&raw)
}
