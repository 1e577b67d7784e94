//! Writing fetched images into the output directory.
//!
//! Files are created with create-new semantics, so an existing file is never
//! overwritten: if a probed name is taken by the time it is opened, probing
//! continues with the next numbered candidate.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::url_model;

/// A file materialized in the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Final (collision-resolved) filename inside the output directory.
    pub filename: String,
    pub path: PathBuf,
}

/// Writes `content` under the first free name among `name`, `stem_1.ext`, ...
pub fn write_unique(dir: &Path, name: &str, content: &[u8]) -> Result<StoredFile> {
    loop {
        let candidate = url_model::unique_filename_in_dir(dir, name);
        let path = dir.join(&candidate);
        let file = match File::options().write(true).create_new(true).open(&path) {
            Ok(f) => f,
            // Taken since the probe.
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("failed to create {}", path.display()))
            }
        };
        if let Err(e) = write_all_synced(file, content) {
            let _ = fs::remove_file(&path);
            return Err(e).with_context(|| format!("failed to write {}", path.display()));
        }
        tracing::debug!(path = %path.display(), bytes = content.len(), "stored file");
        return Ok(StoredFile {
            filename: candidate,
            path,
        });
    }
}

fn write_all_synced(mut file: File, content: &[u8]) -> io::Result<()> {
    file.write_all(content)?;
    file.sync_all()
}
