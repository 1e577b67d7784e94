//! Response validation: status, declared content type and declared size.

use crate::error::FetchError;
use crate::http::ResponseMetadata;

/// Default payload ceiling: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Fails with `HttpStatus` unless the response status is 2xx.
pub fn check_status(meta: &ResponseMetadata) -> Result<(), FetchError> {
    match meta.status {
        Some(code) if (200..300).contains(&code) => Ok(()),
        Some(code) => Err(FetchError::HttpStatus {
            code,
            reason: if meta.reason.is_empty() {
                canonical_reason(code).to_string()
            } else {
                meta.reason.clone()
            },
        }),
        None => Err(FetchError::Unexpected(
            "response had no HTTP status line".to_string(),
        )),
    }
}

/// Validates that the response declares image content within `max_bytes`.
///
/// Returns the lower-cased content type on success. A missing `Content-Type`
/// is treated as empty and rejected. `Content-Length` is advisory: when absent
/// nothing is checked here (the transfer enforces the ceiling while reading).
pub fn validate_image_response(
    meta: &ResponseMetadata,
    max_bytes: u64,
) -> Result<String, FetchError> {
    let content_type = meta
        .content_type
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    if !content_type.starts_with("image/") {
        return Err(FetchError::InvalidContentType(content_type));
    }

    if let Some(len) = meta.content_length {
        if len > max_bytes {
            return Err(FetchError::PayloadTooLarge {
                size: len,
                limit: max_bytes,
            });
        }
    }

    Ok(content_type)
}

fn canonical_reason(code: u32) -> &'static str {
    match code {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        410 => "Gone",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}
