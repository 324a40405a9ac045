// Pure navigation logic - no Tauri imports allowed.
// Turns address-bar input into a URL a view can load.

use url::Url;
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub url: String,
    /// True when the scheme was synthesized rather than typed. A failed load
    /// of such a URL deserves one more try over plain http.
    pub guessed_scheme: bool,
}

impl ParsedUrl {
    fn exact(url: String) -> Self {
        Self { url, guessed_scheme: false }
    }

    fn guessed(url: String) -> Self {
        Self { url, guessed_scheme: true }
    }
}

/// Parses typed input into a navigable URL.
///
/// Purely local string heuristics: no DNS lookups, no prefetching, nothing
/// is sent anywhere until the view actually loads the result.
pub fn smart_parse_url(input: &str, settings: &Settings) -> ParsedUrl {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return ParsedUrl::exact("about:blank".to_string());
    }

    // 1. Implicit localhost/IP gets http
    let has_scheme_separator = trimmed.contains("://");
    let is_localhost = trimmed.starts_with("localhost") || trimmed.starts_with("127.0.0.1");
    let is_ip = trimmed.parse::<std::net::IpAddr>().is_ok();

    if (is_localhost || is_ip) && !has_scheme_separator {
        if let Ok(u) = Url::parse(&format!("http://{}", trimmed)) {
            return ParsedUrl::guessed(u.to_string());
        }
    }

    // 2. Known scheme typed explicitly
    // ("google.com" must not parse as scheme "google")
    if let Ok(u) = Url::parse(trimmed) {
        if matches!(u.scheme(), "http" | "https" | "file" | "about" | "data") {
            return ParsedUrl::exact(u.to_string());
        }
    }

    // 3. A dot without spaces looks like a domain
    if !trimmed.contains(' ') && trimmed.contains('.') && !trimmed.ends_with('.') {
        let scheme = if settings.https_only { "https" } else { "http" };
        if let Ok(u) = Url::parse(&format!("{}://{}", scheme, trimmed)) {
            if u.host().is_some() {
                return ParsedUrl::guessed(u.to_string());
            }
        }
    }

    // 4. Search
    ParsedUrl::exact(settings.search_engine.query_url(trimmed))
}

/// The plain-http retry for a guessed https URL, if there is one.
pub fn fallback_url(url: &str) -> Option<String> {
    let mut parsed = Url::parse(url).ok()?;
    if parsed.scheme() != "https" {
        return None;
    }
    parsed.set_scheme("http").ok()?;
    Some(parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Settings, SearchEngine};
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com", "https://example.com/", false)]
    #[case("https://example.com/path?query=1", "https://example.com/path?query=1", false)]
    #[case("localhost", "http://localhost/", true)]
    #[case("localhost:3000", "http://localhost:3000/", true)]
    #[case("127.0.0.1:8080", "http://127.0.0.1:8080/", true)]
    #[case("192.168.1.1", "http://192.168.1.1/", true)]
    #[case("google.com", "https://google.com/", true)]
    #[case("docs.rs/my-crate", "https://docs.rs/my-crate", true)]
    #[case("about:blank", "about:blank", false)]
    #[case("file:///Users/test/doc.html", "file:///Users/test/doc.html", false)]
    #[case("", "about:blank", false)]
    #[case("   ", "about:blank", false)]
    fn test_smart_url_parsing(#[case] input: &str, #[case] expected: &str, #[case] guessed: bool) {
        let parsed = smart_parse_url(input, &Settings::default());
        assert_eq!(parsed.url, expected);
        assert_eq!(parsed.guessed_scheme, guessed);
    }

    #[rstest]
    #[case("hello world", "https://duckduckgo.com/?q=hello%20world")]
    #[case("what is tauri", "https://duckduckgo.com/?q=what%20is%20tauri")]
    fn test_search_fallback(#[case] input: &str, #[case] expected: &str) {
        let parsed = smart_parse_url(input, &Settings::default());
        assert_eq!(parsed.url, expected);
        assert!(!parsed.guessed_scheme);
    }

    #[test]
    fn test_google_search_engine() {
        let settings = Settings { search_engine: SearchEngine::Google, ..Settings::default() };
        assert_eq!(
            smart_parse_url("test query", &settings).url,
            "https://google.com/search?q=test%20query"
        );
    }

    #[test]
    fn test_https_only_off() {
        let settings = Settings { https_only: false, ..Settings::default() };
        assert_eq!(smart_parse_url("example.com", &settings).url, "http://example.com/");
    }

    #[rstest]
    #[case("https://example.com/", Some("http://example.com/"))]
    #[case("https://example.com/a?b=1", Some("http://example.com/a?b=1"))]
    #[case("http://example.com/", None)]
    #[case("about:blank", None)]
    #[case("not a url", None)]
    fn test_fallback_url(#[case] url: &str, #[case] expected: Option<&str>) {
        assert_eq!(fallback_url(url).as_deref(), expected);
    }
}
