//! URL validation and scheme normalization.
//!
//! Accepts anything shaped like `[http(s)://]host.tld[/path?query#fragment]`
//! and guarantees the stored URL carries an explicit scheme.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::AppError;

/// Shape of an acceptable URL: optional http(s) prefix, a host with at least
/// one dot-separated label, then any path/query/fragment characters.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?[\w.-]+(?:\.[\w.-]+)+[\w\-._~:/?#\[\]@!$&'()*+,;=%]*$").unwrap()
});

const DEFAULT_SCHEME: &str = "http://";

/// Validates a submitted URL and prepends `http://` when no scheme is given.
///
/// # Normalization Rules
///
/// 1. Surrounding whitespace is trimmed
/// 2. `http://` and `https://` prefixes are kept as-is
/// 3. Anything else gets `http://` prepended
///
/// # Errors
///
/// Returns [`AppError::InvalidUrl`] when the input does not match the URL shape.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("example.com").unwrap(), "http://example.com");
/// assert_eq!(normalize_url("https://example.com").unwrap(), "https://example.com");
/// assert!(normalize_url("not a url").is_err());
/// ```
pub fn normalize_url(input: &str) -> Result<String, AppError> {
    let input = input.trim();

    if !URL_REGEX.is_match(input) {
        return Err(AppError::InvalidUrl(input.to_string()));
    }

    if input.starts_with("http://") || input.starts_with("https://") {
        Ok(input.to_string())
    } else {
        Ok(format!("{DEFAULT_SCHEME}{input}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prepends_http() {
        assert_eq!(normalize_url("example.com").unwrap(), "http://example.com");
    }

    #[test]
    fn test_normalize_keeps_https() {
        assert_eq!(
            normalize_url("https://example.com").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_normalize_keeps_http() {
        assert_eq!(
            normalize_url("http://example.com/a").unwrap(),
            "http://example.com/a"
        );
    }

    #[test]
    fn test_normalize_without_scheme_with_path() {
        assert_eq!(
            normalize_url("www.rust-lang.org/learn?x=1#top").unwrap(),
            "http://www.rust-lang.org/learn?x=1#top"
        );
    }

    #[test]
    fn test_normalize_preserves_case_and_query() {
        assert_eq!(
            normalize_url("https://Example.COM/Path?key=VALUE&b=2").unwrap(),
            "https://Example.COM/Path?key=VALUE&b=2"
        );
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(
            normalize_url("  example.com/page \n").unwrap(),
            "http://example.com/page"
        );
    }

    #[test]
    fn test_normalize_accepts_port_and_special_characters() {
        assert!(normalize_url("http://example.com:8080/a_b-c~d").is_ok());
        assert!(normalize_url("example.com/path%20with%20spaces").is_ok());
        assert!(normalize_url("example.com/p;a=1,b=(2)*[3]@!$'+").is_ok());
    }

    #[test]
    fn test_normalize_accepts_subdomains() {
        assert_eq!(
            normalize_url("api.v2.example.co.uk").unwrap(),
            "http://api.v2.example.co.uk"
        );
    }

    #[test]
    fn test_normalize_rejects_spaces() {
        let result = normalize_url("not a url");
        assert!(matches!(result, Err(AppError::InvalidUrl(_))));
    }

    #[test]
    fn test_normalize_rejects_host_without_dot() {
        assert!(normalize_url("localhost").is_err());
        assert!(normalize_url("http://localhost:3000/test").is_err());
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(normalize_url("").is_err());
        assert!(normalize_url("   ").is_err());
    }

    #[test]
    fn test_normalize_rejects_other_schemes() {
        assert!(normalize_url("ftp://example.com/file.txt").is_err());
        assert!(normalize_url("javascript:alert('xss')").is_err());
        assert!(normalize_url("mailto:test@example.com").is_err());
    }

    #[test]
    fn test_normalize_rejects_disallowed_characters() {
        assert!(normalize_url("https://example.com/<invalid>").is_err());
        assert!(normalize_url("https://example.com/\"quoted\"").is_err());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_url("example.com/x").unwrap();
        assert_eq!(normalize_url(&once).unwrap(), once);
    }
}
