//! Parse HTTP response header lines into ResponseMetadata.

use super::ResponseMetadata;

/// Parse collected header lines into ResponseMetadata.
///
/// A status line (`HTTP/...`) starts a new response and discards headers seen
/// so far, so after redirects or `100 Continue` only the final response counts.
pub(crate) fn parse_headers(lines: &[String]) -> ResponseMetadata {
    let mut meta = ResponseMetadata::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            meta = parse_status_line(line);
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-type") {
                meta.content_type = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    meta.content_length = Some(n);
                }
            }
        }
    }

    meta
}

fn parse_status_line(line: &str) -> ResponseMetadata {
    let mut parts = line.splitn(3, ' ');
    let _version = parts.next();
    let status = parts.next().and_then(|c| c.trim().parse::<u32>().ok());
    let reason = parts.next().unwrap_or("").trim().to_string();
    ResponseMetadata {
        status,
        reason,
        ..ResponseMetadata::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_status_type_and_length() {
        let m = parse_headers(&lines(&[
            "HTTP/1.1 200 OK",
            "Content-Type: image/png",
            "Content-Length: 12345",
        ]));
        assert_eq!(m.status, Some(200));
        assert_eq!(m.reason, "OK");
        assert_eq!(m.content_type.as_deref(), Some("image/png"));
        assert_eq!(m.content_length, Some(12345));
    }

    #[test]
    fn header_names_case_insensitive() {
        let m = parse_headers(&lines(&[
            "HTTP/1.1 200 OK",
            "content-type: image/GIF",
            "CONTENT-LENGTH: 7",
        ]));
        assert_eq!(m.content_type.as_deref(), Some("image/GIF"));
        assert_eq!(m.content_length, Some(7));
    }

    #[test]
    fn redirect_headers_discarded() {
        let m = parse_headers(&lines(&[
            "HTTP/1.1 301 Moved Permanently",
            "Content-Type: text/html",
            "Content-Length: 99",
            "Location: /real.png",
            "",
            "HTTP/1.1 200 OK",
            "Content-Type: image/png",
        ]));
        assert_eq!(m.status, Some(200));
        assert_eq!(m.content_type.as_deref(), Some("image/png"));
        assert_eq!(m.content_length, None);
    }

    #[test]
    fn multi_word_reason_and_http2() {
        let m = parse_headers(&lines(&["HTTP/1.1 404 Not Found"]));
        assert_eq!(m.status, Some(404));
        assert_eq!(m.reason, "Not Found");

        let m = parse_headers(&lines(&["HTTP/2 503"]));
        assert_eq!(m.status, Some(503));
        assert_eq!(m.reason, "");
    }

    #[test]
    fn bad_content_length_ignored() {
        let m = parse_headers(&lines(&["HTTP/1.1 200 OK", "Content-Length: lots"]));
        assert_eq!(m.content_length, None);
    }
}
