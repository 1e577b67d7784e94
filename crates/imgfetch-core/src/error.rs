//! Per-URL fetch errors and their classification.
//!
//! Every stage of the pipeline returns `Result<_, FetchError>`; the fetcher
//! converts the error into a failed outcome so the batch keeps going.

use thiserror::Error;

const MIB: u64 = 1024 * 1024;

fn as_mib(bytes: &u64) -> f64 {
    *bytes as f64 / MIB as f64
}

fn whole_mib(bytes: &u64) -> u64 {
    *bytes / MIB
}

/// High-level classification of a fetch failure, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Server did not respond within the timeout.
    Timeout,
    /// Transport failure before any HTTP response (DNS, refused, reset).
    ConnectionFailure,
    /// Non-2xx HTTP status.
    HttpStatus,
    /// Response not declared as an image.
    InvalidContentType,
    /// Declared (or received) size exceeds the ceiling.
    PayloadTooLarge,
    /// Anything else (disk write failure, bad URL, ...).
    Unexpected,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    ConnectionFailure(String),

    #[error("HTTP {code}: {reason}")]
    HttpStatus { code: u32, reason: String },

    #[error("URL does not point to an image. Content-Type: {0}")]
    InvalidContentType(String),

    #[error("Image too large: {:.1}MB (max: {}MB)", as_mib(.size), whole_mib(.limit))]
    PayloadTooLarge { size: u64, limit: u64 },

    #[error("{0}")]
    Unexpected(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Timeout(_) => ErrorKind::Timeout,
            FetchError::ConnectionFailure(_) => ErrorKind::ConnectionFailure,
            FetchError::HttpStatus { .. } => ErrorKind::HttpStatus,
            FetchError::InvalidContentType(_) => ErrorKind::InvalidContentType,
            FetchError::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            FetchError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// True for errors raised by response validation (content type or size).
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidContentType | ErrorKind::PayloadTooLarge
        )
    }
}

impl From<curl::Error> for FetchError {
    fn from(e: curl::Error) -> Self {
        match classify_curl_error(&e) {
            ErrorKind::Timeout => FetchError::Timeout(e.to_string()),
            ErrorKind::ConnectionFailure => FetchError::ConnectionFailure(e.to_string()),
            _ => FetchError::Unexpected(e.to_string()),
        }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        FetchError::Unexpected(e.to_string())
    }
}

impl From<anyhow::Error> for FetchError {
    fn from(e: anyhow::Error) -> Self {
        FetchError::Unexpected(format!("{:#}", e))
    }
}

/// Classify a curl error into a fetch error kind.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_ssl_connect_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::ConnectionFailure;
    }
    ErrorKind::Unexpected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_too_large_message_in_mib() {
        let e = FetchError::PayloadTooLarge {
            size: 60_000_000,
            limit: 50 * 1024 * 1024,
        };
        assert_eq!(e.to_string(), "Image too large: 57.2MB (max: 50MB)");
        assert_eq!(e.kind(), ErrorKind::PayloadTooLarge);
        assert!(e.is_validation());
    }

    #[test]
    fn invalid_content_type_message() {
        let e = FetchError::InvalidContentType("text/html".into());
        assert_eq!(
            e.to_string(),
            "URL does not point to an image. Content-Type: text/html"
        );
        assert!(e.is_validation());
    }

    #[test]
    fn http_status_carries_code_and_reason() {
        let e = FetchError::HttpStatus {
            code: 404,
            reason: "Not Found".into(),
        };
        assert_eq!(e.to_string(), "HTTP 404: Not Found");
        assert_eq!(e.kind(), ErrorKind::HttpStatus);
        assert!(!e.is_validation());
    }

    #[test]
    fn curl_timeout_and_connect_classified() {
        // 28 = CURLE_OPERATION_TIMEDOUT, 7 = CURLE_COULDNT_CONNECT, 23 = CURLE_WRITE_ERROR
        let timeout = curl::Error::new(28);
        assert_eq!(classify_curl_error(&timeout), ErrorKind::Timeout);
        assert!(matches!(FetchError::from(timeout), FetchError::Timeout(_)));

        let refused = curl::Error::new(7);
        assert_eq!(classify_curl_error(&refused), ErrorKind::ConnectionFailure);

        let write = curl::Error::new(23);
        assert_eq!(classify_curl_error(&write), ErrorKind::Unexpected);
    }

    #[test]
    fn io_error_is_unexpected() {
        let e: FetchError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert_eq!(e.kind(), ErrorKind::Unexpected);
        assert_eq!(e.to_string(), "disk full");
    }
}
