//! Per-URL pipeline and sequential batch runner.
//!
//! One [`Fetcher`] is one run: it owns the dedupe index, so identical content
//! fetched twice within the run is saved once.

use std::path::PathBuf;

use crate::config::FetcherConfig;
use crate::dedupe::{DedupeCheck, DedupeIndex};
use crate::error::FetchError;
use crate::http::{self, RequestOptions};
use crate::storage::{self, StoredFile};
use crate::url_model;

/// What happened to one URL.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Downloaded and written. `candidate` is the name derived from the URL,
    /// `stored.filename` the collision-resolved name actually used.
    Saved { candidate: String, stored: StoredFile },
    /// Content identical to an image already fetched this run; nothing written.
    Duplicate { existing: String },
    /// Any failure; the batch continues.
    Failed(FetchError),
}

impl FetchOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, FetchOutcome::Saved { .. })
    }
}

/// Aggregate result of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// URLs downloaded and saved.
    pub successful: usize,
    /// Non-empty URLs attempted.
    pub total: usize,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.total > 0 && self.successful == self.total
    }
}

/// Observer for batch progress. Default methods do nothing.
pub trait Reporter {
    /// Called before the request for `url` is issued.
    fn on_start(&mut self, _url: &str) {}
    /// Called once per attempted URL with its outcome.
    fn on_outcome(&mut self, _url: &str, _outcome: &FetchOutcome) {}
}

/// Splits comma-separated input into trimmed, non-empty URLs.
pub fn split_url_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct Fetcher {
    download_dir: PathBuf,
    options: RequestOptions,
    index: DedupeIndex,
}

impl Fetcher {
    /// New run with an empty dedupe index. The download directory must exist.
    pub fn new(config: &FetcherConfig) -> Self {
        Self::with_options(config.download_dir.clone(), config.request_options())
    }

    pub fn with_options(download_dir: PathBuf, options: RequestOptions) -> Self {
        Self {
            download_dir,
            options,
            index: DedupeIndex::new(),
        }
    }

    pub fn dedupe_index(&self) -> &DedupeIndex {
        &self.index
    }

    /// Runs the full pipeline for one URL. Never panics or propagates errors:
    /// every failure becomes [`FetchOutcome::Failed`].
    pub fn fetch_one(&mut self, url: &str) -> FetchOutcome {
        match self.try_fetch(url) {
            Ok(outcome) => outcome,
            Err(e) => {
                if e.is_validation() {
                    tracing::info!(url, kind = ?e.kind(), "rejected: {}", e);
                } else {
                    tracing::warn!(url, kind = ?e.kind(), "fetch failed: {}", e);
                }
                FetchOutcome::Failed(e)
            }
        }
    }

    fn try_fetch(&mut self, url: &str) -> Result<FetchOutcome, FetchError> {
        tracing::debug!(url, "GET");
        let response = http::get_image(url, &self.options)?;
        let candidate = url_model::derive_filename(url, Some(response.content_type.as_str()));

        let hash = match self.index.check_and_insert(&response.body, &candidate) {
            DedupeCheck::Duplicate { existing } => {
                tracing::info!(url, existing = %existing, "duplicate content, skipped");
                return Ok(FetchOutcome::Duplicate { existing });
            }
            DedupeCheck::New(hash) => hash,
        };

        let stored = match storage::write_unique(&self.download_dir, &candidate, &response.body) {
            Ok(stored) => stored,
            Err(e) => {
                // Nothing was saved, so the content must not count as seen.
                self.index.remove(&hash);
                return Err(e.into());
            }
        };
        tracing::info!(
            url,
            path = %stored.path.display(),
            bytes = response.body.len(),
            sha256 = %hash,
            "saved image"
        );
        Ok(FetchOutcome::Saved { candidate, stored })
    }

    /// Fetches each URL in order. Entries are trimmed; empty ones are skipped
    /// and not counted.
    pub fn fetch_many<I, S>(&mut self, urls: I, reporter: &mut dyn Reporter) -> BatchSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = BatchSummary::default();
        for url in urls {
            let url = url.as_ref().trim();
            if url.is_empty() {
                continue;
            }
            summary.total += 1;
            reporter.on_start(url);
            let outcome = self.fetch_one(url);
            if outcome.is_saved() {
                summary.successful += 1;
            }
            reporter.on_outcome(url, &outcome);
        }
        tracing::info!(
            successful = summary.successful,
            total = summary.total,
            "batch finished"
        );
        summary
    }

    /// Like [`fetch_many`](Self::fetch_many) for a comma-separated string.
    pub fn fetch_list(&mut self, input: &str, reporter: &mut dyn Reporter) -> BatchSummary {
        self.fetch_many(split_url_list(input), reporter)
    }
}
