// File: retext-core/src/urlish.rs
//! Heuristic detection of strings that look like URLs, paths, file names or
//! in-page anchors.
//!
//! Plain-text fields sometimes double as links or paths (a menu label holding
//! `/shop`, a site option holding `www.example.com`). Those are left alone by
//! the plain-text substitutor. Markup-aware substitution does not consult this
//! check; there, only tag and attribute boundaries protect structure.
//!
//! License: MIT OR APACHE 2.0

use once_cell::sync::Lazy;
use regex::Regex;

static URLISH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(^[a-z]+://|://|www\.|/|\\|\.php\b|\.html\b|\.htm\b|^#)")
        .expect("URL heuristic pattern is valid")
});

/// Returns `true` when `s` is non-empty and looks like a URL, path or anchor.
///
/// Matches a leading scheme (`https://`), a bare `://`, `www.`, any `/` or
/// `\`, a `.php` / `.html` / `.htm` token, or a leading `#`.
pub fn is_urlish(s: &str) -> bool {
    !s.is_empty() && URLISH.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_paths_and_anchors() {
        assert!(is_urlish("https://example.com"));
        assert!(is_urlish("ftp://files"));
        assert!(is_urlish("see ://thing"));
        assert!(is_urlish("www.example.com"));
        assert!(is_urlish("/path/to"));
        assert!(is_urlish(r"C:\Users"));
        assert!(is_urlish("page.php"));
        assert!(is_urlish("index.HTML"));
        assert!(is_urlish("old.htm"));
        assert!(is_urlish("#anchor"));
    }

    #[test]
    fn test_plain_prose() {
        assert!(!is_urlish(""));
        assert!(!is_urlish("Hello World"));
        assert!(!is_urlish("Issue #4 is fixed"));
        assert!(!is_urlish("the phpinfo page"));
        assert!(!is_urlish("file.phpx"));
    }
}
