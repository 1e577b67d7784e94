//! Collision-free filename selection (`name.ext`, `name_1.ext`, `name_2.ext`, ...).

use std::fs;
use std::path::Path;

/// Splits `name` into stem and extension (extension includes the dot).
///
/// Splits at the last `.`; a leading dot (hidden file) or a trailing dot does
/// not count as an extension separator.
pub fn split_stem_ext(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if i > 0 && i + 1 < name.len() => name.split_at(i),
        _ => (name, ""),
    }
}

/// Yields `name` first, then `stem_1.ext`, `stem_2.ext`, ... without bound.
pub fn numbered_candidates(name: &str) -> impl Iterator<Item = String> + '_ {
    let (stem, ext) = split_stem_ext(name);
    std::iter::once(name.to_string())
        .chain((1u64..).map(move |n| format!("{}_{}{}", stem, n, ext)))
}

/// Picks the first candidate for `name` that does not exist inside `dir`.
///
/// Dangling symlinks count as taken.
pub fn unique_filename_in_dir(dir: &Path, name: &str) -> String {
    numbered_candidates(name)
        .find(|c| fs::symlink_metadata(dir.join(c)).is_err())
        .unwrap_or_else(|| name.to_string())
}
