//! Run-scoped content deduplication.
//!
//! Maps each payload hash to the filename first recorded for it. The index is
//! owned by one [`Fetcher`](crate::fetcher::Fetcher) and lives for one run;
//! nothing is persisted.

use std::collections::HashMap;

use crate::checksum::ContentHash;

/// Result of checking a payload against the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupeCheck {
    /// First time this content was seen; the hash is now recorded.
    New(ContentHash),
    /// Same bytes already seen this run under `existing`.
    Duplicate { existing: String },
}

#[derive(Debug, Default)]
pub struct DedupeIndex {
    seen: HashMap<ContentHash, String>,
}

impl DedupeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes `content`; if unseen, records `filename` for it (first write wins).
    pub fn check_and_insert(&mut self, content: &[u8], filename: &str) -> DedupeCheck {
        let hash = ContentHash::of(content);
        if let Some(existing) = self.seen.get(&hash) {
            return DedupeCheck::Duplicate {
                existing: existing.clone(),
            };
        }
        self.seen.insert(hash.clone(), filename.to_string());
        DedupeCheck::New(hash)
    }

    /// Filename first recorded for `hash`, if any.
    pub fn get(&self, hash: &ContentHash) -> Option<&str> {
        self.seen.get(hash).map(String::as_str)
    }

    /// Drops the entry for `hash`, e.g. when the file could not be written.
    pub fn remove(&mut self, hash: &ContentHash) -> Option<String> {
        self.seen.remove(hash)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_seen_is_new() {
        let mut idx = DedupeIndex::new();
        let check = idx.check_and_insert(b"png-bytes", "a.png");
        let DedupeCheck::New(hash) = check else {
            panic!("expected New");
        };
        assert_eq!(idx.get(&hash), Some("a.png"));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn identical_content_is_duplicate_of_first() {
        let mut idx = DedupeIndex::new();
        idx.check_and_insert(b"same", "first.png");
        assert_eq!(
            idx.check_and_insert(b"same", "second.jpg"),
            DedupeCheck::Duplicate {
                existing: "first.png".into()
            }
        );
        // Still the first name after repeated hits.
        assert_eq!(
            idx.check_and_insert(b"same", "third.gif"),
            DedupeCheck::Duplicate {
                existing: "first.png".into()
            }
        );
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn same_name_different_content_is_new() {
        let mut idx = DedupeIndex::new();
        assert!(matches!(idx.check_and_insert(b"one", "a.png"), DedupeCheck::New(_)));
        assert!(matches!(idx.check_and_insert(b"two", "a.png"), DedupeCheck::New(_)));
        assert_eq!(idx.len(), 2);
    }

    #[test]
    fn removed_hash_is_new_again() {
        let mut idx = DedupeIndex::new();
        let DedupeCheck::New(hash) = idx.check_and_insert(b"data", "a.png") else {
            panic!("expected New");
        };
        assert_eq!(idx.remove(&hash).as_deref(), Some("a.png"));
        assert!(matches!(idx.check_and_insert(b"data", "b.png"), DedupeCheck::New(_)));
    }

    #[test]
    fn new_index_is_empty() {
        assert!(DedupeIndex::new().is_empty());
    }
}
