//! Core of imgfetch: fetch images over HTTP, validate them, deduplicate by
//! content hash and save them under collision-safe names.

pub mod config;
pub mod logging;

pub mod checksum;
pub mod dedupe;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod storage;
pub mod url_model;
pub mod validate;

pub use error::{ErrorKind, FetchError};
pub use fetcher::{BatchSummary, FetchOutcome, Fetcher, Reporter};
