//! Blocking HTTP GET for a single image.
//!
//! Uses the curl crate (libcurl). The response head is inspected as soon as
//! the first body bytes arrive: a non-2xx status or a failed validation aborts
//! the transfer before the body is read. The body is buffered in memory with a
//! hard byte ceiling, so a missing or understated `Content-Length` cannot push
//! the download past the limit.

mod parse;

use std::cell::RefCell;
use std::str;
use std::time::Duration;

use crate::error::FetchError;
use crate::validate;

/// Sent when no user agent is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("imgfetch/", env!("CARGO_PKG_VERSION"));

/// Maximum redirects followed per request.
const MAX_REDIRECTS: u32 = 10;

/// libcurl reads both limits in whole seconds and treats 0 as "no limit".
const MIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Status and entity headers of the final response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
    /// Status code from the status line, if one was received.
    pub status: Option<u32>,
    /// Reason phrase (empty for HTTP/2).
    pub reason: String,
    /// Raw `Content-Type` value, if present.
    pub content_type: Option<String>,
    /// `Content-Length`, if present and numeric.
    pub content_length: Option<u64>,
}

/// Per-request limits.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Connect timeout, and the longest the transfer may stall without data.
    pub timeout: Duration,
    /// Ceiling on body size, declared or actual.
    pub max_bytes: u64,
    pub user_agent: Option<String>,
}

/// A validated image response with its full body.
#[derive(Debug, Clone)]
pub struct ImageResponse {
    pub meta: ResponseMetadata,
    /// Lower-cased content type, already known to start with `image/`.
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Performs a GET and returns the body if the response is a valid image.
///
/// Follows redirects. Runs in the current thread.
pub fn get_image(url: &str, opts: &RequestOptions) -> Result<ImageResponse, FetchError> {
    let head_lines: RefCell<Vec<String>> = RefCell::new(Vec::new());
    let verdict: RefCell<Option<Result<String, FetchError>>> = RefCell::new(None);
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(MAX_REDIRECTS)?;
    let timeout = opts.timeout.max(MIN_TIMEOUT);
    easy.connect_timeout(timeout)?;
    // Abort when no data arrives for `timeout`.
    easy.low_speed_limit(1)?;
    easy.low_speed_time(timeout)?;
    easy.useragent(opts.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                head_lines.borrow_mut().push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|data| {
            let mut verdict = verdict.borrow_mut();
            if verdict.is_none() {
                *verdict = Some(inspect(&head_lines.borrow(), opts.max_bytes));
            }
            if !matches!(*verdict, Some(Ok(_))) {
                return Ok(0); // abort transfer
            }
            let received = body.len() as u64 + data.len() as u64;
            if received > opts.max_bytes {
                *verdict = Some(Err(FetchError::PayloadTooLarge {
                    size: received,
                    limit: opts.max_bytes,
                }));
                return Ok(0);
            }
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()
    };

    let verdict = verdict.into_inner();
    if let Err(e) = performed {
        // Our own abort surfaces as a curl write error; report why we aborted.
        return Err(match verdict {
            Some(Err(reason)) => reason,
            Some(Ok(_)) => transport_error(e, true),
            None => transport_error(e, false),
        });
    }

    let lines = head_lines.into_inner();
    let content_type = match verdict {
        Some(v) => v?,
        // Empty body: the write callback never ran.
        None => inspect(&lines, opts.max_bytes)?,
    };

    Ok(ImageResponse {
        meta: parse::parse_headers(&lines),
        content_type,
        body,
    })
}

/// Maps a curl failure. Once a response head has been accepted, the server was
/// reached, so only a timeout keeps its own kind.
fn transport_error(e: curl::Error, head_seen: bool) -> FetchError {
    let err = FetchError::from(e);
    match err {
        FetchError::ConnectionFailure(msg) if head_seen => {
            FetchError::Unexpected(format!("transfer interrupted: {}", msg))
        }
        other => other,
    }
}

/// Status check, then content validation, on the collected head.
fn inspect(lines: &[String], max_bytes: u64) -> Result<String, FetchError> {
    let meta = parse::parse_headers(lines);
    tracing::debug!(
        status = ?meta.status,
        content_type = ?meta.content_type,
        content_length = ?meta.content_length,
        "response head"
    );
    validate::check_status(&meta)?;
    validate::validate_image_response(&meta, max_bytes)
}
