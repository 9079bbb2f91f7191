//! Locating the versioned application script.
//!
//! The landing page references its bundle as
//! `<script src="/assets/application-<hash>.js"></script>`, where `<hash>`
//! changes on every deploy.

use crate::error::{Error, Result};

/// Path prefix of the bundled script.
pub const ASSET_PREFIX: &str = "/assets/application-";

const SCRIPT_OPEN: &str = r#"<script src="/assets/application-"#;
const SCRIPT_CLOSE: &str = r#".js"></script>"#;

/// Extract the content hash of the application script from raw HTML.
///
/// The hash is the text between the first `<script src="/assets/application-`
/// and the next `.js"></script>` after it.
///
/// # Errors
///
/// Returns [`Error::PageFormat`] when either marker is absent.
pub fn asset_hash(html: &str) -> Result<&str> {
    let start = html
        .find(SCRIPT_OPEN)
        .map(|idx| idx + SCRIPT_OPEN.len())
        .ok_or_else(|| Error::PageFormat(format!("no `{SCRIPT_OPEN}` tag")))?;

    let rest = &html[start..];
    let end = rest
        .find(SCRIPT_CLOSE)
        .ok_or_else(|| Error::PageFormat(format!("no `{SCRIPT_CLOSE}` after asset tag")))?;

    Ok(&rest[..end])
}

/// Build the absolute URL of the versioned script referenced by `html`.
///
/// The result is `base_url + "/assets/application-" + hash + ".js"`; `base_url`
/// is used verbatim.
///
/// # Errors
///
/// Returns [`Error::PageFormat`] when the script tag cannot be found.
///
/// # Example
///
/// ```rust
/// use wtm_factor::locate_script_url;
///
/// let html = r#"<head><script src="/assets/application-9f3c.js"></script></head>"#;
/// let url = locate_script_url(html, "https://example.com")?;
/// assert_eq!(url, "https://example.com/assets/application-9f3c.js");
/// # Ok::<(), wtm_factor::Error>(())
/// ```
pub fn locate_script_url(html: &str, base_url: &str) -> Result<String> {
    let hash = asset_hash(html)?;
    Ok(format!("{base_url}{ASSET_PREFIX}{hash}.js"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
        <html><head>
        <link rel="stylesheet" href="/assets/application-aa11.css">
        <script src="/assets/application-0c5d2e7b41f8a9.js"></script>
        </head><body></body></html>"#;

    #[test]
    fn test_asset_hash_between_markers() {
        assert_eq!(asset_hash(PAGE).ok(), Some("0c5d2e7b41f8a9"));
    }

    #[test]
    fn test_locate_script_url() {
        let url = locate_script_url(PAGE, "https://whattomine.test").ok();
        assert_eq!(
            url.as_deref(),
            Some("https://whattomine.test/assets/application-0c5d2e7b41f8a9.js")
        );
    }

    #[test]
    fn test_first_tag_wins() {
        let html = concat!(
            r#"<script src="/assets/application-first.js"></script>"#,
            r#"<script src="/assets/application-second.js"></script>"#
        );
        assert_eq!(asset_hash(html).ok(), Some("first"));
    }

    #[test]
    fn test_missing_open_marker() {
        let html = r#"<script src="/packs/main-abc.js"></script>"#;
        let err = locate_script_url(html, "https://x.test").err();
        assert!(matches!(err, Some(Error::PageFormat(_))));
    }

    #[test]
    fn test_missing_close_marker() {
        let html = r#"<script src="/assets/application-abc.js" defer></script>"#;
        assert!(matches!(asset_hash(html), Err(Error::PageFormat(_))));
    }

    #[test]
    fn test_marker_at_end_of_input() {
        assert!(asset_hash(SCRIPT_OPEN).is_err());
        assert!(asset_hash("").is_err());
    }

    #[test]
    fn test_empty_hash() {
        let html = r#"<script src="/assets/application-.js"></script>"#;
        assert_eq!(asset_hash(html).ok(), Some(""));
    }
}
