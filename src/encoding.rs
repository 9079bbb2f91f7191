//! Character encoding detection for fetched response bodies.
//!
//! Pages and scripts arrive as raw bytes. The charset is taken from the
//! `Content-Type` header when present, then from an HTML meta declaration,
//! and falls back to UTF-8.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// Match `charset=...` inside a `Content-Type` header value
#[allow(clippy::expect_used)]
static HEADER_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([^"';\s]+)"#).expect("valid regex")
});

/// Match `<meta charset="...">` and the `http-equiv` `content="...; charset=..."` form
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>]+)"#).expect("valid regex")
});

/// Detect the encoding of a response body.
///
/// Only the first 1024 bytes are searched for a meta declaration.
#[must_use]
pub fn detect_encoding(body: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some(label) = content_type.and_then(charset_from_header) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return encoding;
        }
    }

    let head = String::from_utf8_lossy(&body[..body.len().min(1024)]);
    if let Some(caps) = CHARSET_META_RE.captures(&head) {
        if let Some(encoding) = caps
            .get(1)
            .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
        {
            return encoding;
        }
    }

    UTF_8
}

fn charset_from_header(content_type: &str) -> Option<String> {
    HEADER_CHARSET_RE
        .captures(content_type)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Decode a response body to a `String`, replacing invalid sequences with �.
#[must_use]
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(body, content_type);

    if encoding == UTF_8 {
        return String::from_utf8_lossy(body).into_owned();
    }

    let (decoded, _encoding_used, _had_errors) = encoding.decode(body);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_charset_wins_over_meta() {
        let body = br#"<html><head><meta charset="utf-8"></head></html>"#;
        let encoding = detect_encoding(body, Some("text/html; charset=ISO-8859-1"));
        // encoding_rs maps ISO-8859-1 to windows-1252 per WHATWG
        assert_eq!(encoding.name(), "windows-1252");
    }

    #[test]
    fn meta_charset_used_without_header() {
        let body = br#"<html><head><meta charset="windows-1252"></head></html>"#;
        assert_eq!(detect_encoding(body, Some("text/html")).name(), "windows-1252");
    }

    #[test]
    fn http_equiv_charset_used_without_header() {
        let body = b"<html><head><meta http-equiv=\"Content-Type\" \
            content=\"text/html; charset=windows-1251\"></head><p>\xCF\xF0\xE8</p></html>";
        assert_eq!(detect_encoding(body, None).name(), "windows-1251");
        assert!(decode_body(body, None).contains("<p>При</p>"));
    }

    #[test]
    fn meta_beyond_first_kilobyte_is_ignored() {
        let mut body = vec![b' '; 1100];
        body.extend_from_slice(br#"<meta charset="windows-1252">"#);
        assert_eq!(detect_encoding(&body, None), UTF_8);
    }

    #[test]
    fn unknown_label_falls_back_to_utf8() {
        let body = b"var m={};";
        assert_eq!(
            detect_encoding(body, Some("application/javascript; charset=bogus")),
            UTF_8
        );
    }

    #[test]
    fn javascript_defaults_to_utf8() {
        assert_eq!(detect_encoding(b"var m={};", None), UTF_8);
    }

    #[test]
    fn decode_windows1252_body() {
        let body = b"<p>Caf\xE9</p>";
        let text = decode_body(body, Some("text/html; charset=windows-1252"));
        assert_eq!(text, "<p>Café</p>");
    }

    #[test]
    fn decode_invalid_utf8_lossily() {
        let text = decode_body(b"a \xFF b", None);
        assert!(text.starts_with("a "));
        assert!(text.ends_with(" b"));
    }

    #[test]
    fn header_charset_quoted() {
        assert_eq!(
            charset_from_header(r#"text/html; charset="UTF-8""#),
            Some("UTF-8".to_string())
        );
    }
}
