// src/utils/origin.rs
//! Web origin normalization.
//!
//! Domains are compared as origins (`scheme://host[:port]`): path, query,
//! fragment and trailing slash are dropped, host is lowercased and default
//! ports are elided.

use reqwest::Url;

/// Normalizes a domain URI to its ASCII origin.
///
/// # Errors
/// Returns a description if the input is not an absolute URL with a host.
pub fn normalize_origin(domain: &str) -> Result<String, String> {
    let url = Url::parse(domain.trim()).map_err(|e| format!("{}: {}", domain, e))?;
    if url.host_str().is_none() {
        return Err(format!("{}: missing host", domain));
    }
    Ok(url.origin().ascii_serialization())
}

/// Like [`normalize_origin`] but also requires the `https` scheme.
pub fn normalize_https_origin(domain: &str) -> Result<String, String> {
    let origin = normalize_origin(domain)?;
    if !origin.starts_with("https://") {
        return Err(format!("{}: scheme must be https", domain));
    }
    Ok(origin)
}

/// Compares two domain URIs by origin. Unparseable inputs never match.
pub fn same_origin(a: &str, b: &str) -> bool {
    match (normalize_origin(a), normalize_origin(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_and_path_dropped() {
        assert_eq!(
            normalize_origin("https://Foo.Example.com/").unwrap(),
            "https://foo.example.com"
        );
        assert_eq!(
            normalize_origin("https://foo.example.com/some/path?q=1#x").unwrap(),
            "https://foo.example.com"
        );
        assert_eq!(
            normalize_origin("https://foo.example.com:443").unwrap(),
            "https://foo.example.com"
        );
        assert_eq!(
            normalize_origin("https://foo.example.com:8443/").unwrap(),
            "https://foo.example.com:8443"
        );
    }

    #[test]
    fn test_rejects_non_urls() {
        assert!(normalize_origin("foo.example.com").is_err());
        assert!(normalize_origin("mailto:me@example.com").is_err());
        assert!(normalize_https_origin("http://foo.example.com").is_err());
    }

    #[test]
    fn test_same_origin() {
        assert!(same_origin("https://foo.example.com/", "https://foo.example.com"));
        assert!(!same_origin("https://bar.example.com/", "https://foo.example.com"));
        assert!(!same_origin("http://foo.example.com", "https://foo.example.com"));
        assert!(!same_origin("garbage", "garbage"));
    }
}
