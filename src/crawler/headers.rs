use rand::seq::SliceRandom;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT,
};

/// Pool of realistic User-Agent strings for rotation
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
];

/// Get a random user agent from the pool
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS.choose(&mut rng).copied().unwrap_or(USER_AGENTS[0])
}

/// Build browser-like headers for catalog page requests
///
/// Values that are not valid header text are left out rather than failing
/// the request.
///
/// # Examples
///
/// ```
/// use brickdoc::crawler::headers::build_page_headers;
///
/// let headers = build_page_headers(
///     "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
///     Some("https://www.lego.com/en-us/service/buildinginstructions"),
/// );
/// assert!(headers.contains_key("sec-fetch-mode"));
/// ```
pub fn build_page_headers(user_agent: &str, referer: Option<&str>) -> HeaderMap {
    let mut headers = base_headers(user_agent, referer);

    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );

    // Sec-Fetch headers for modern browser compatibility
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("document"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("navigate"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("upgrade-insecure-requests"),
        HeaderValue::from_static("1"),
    );

    headers
}

/// Build headers for the product search service (XHR returning JSON)
pub fn build_api_headers(user_agent: &str, referer: Option<&str>) -> HeaderMap {
    let mut headers = base_headers(user_agent, referer);

    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("empty"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("cors"),
    );

    headers
}

/// Build headers for document downloads
pub fn build_download_headers(user_agent: &str) -> HeaderMap {
    let mut headers = base_headers(user_agent, None);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/pdf,image/*,*/*;q=0.8"),
    );
    headers
}

fn base_headers(user_agent: &str, referer: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Ok(value) = HeaderValue::from_str(user_agent) {
        headers.insert(USER_AGENT, value);
    }
    if let Some(Ok(value)) = referer.map(HeaderValue::from_str) {
        headers.insert(REFERER, value);
    }
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_rotation() {
        let mut agents = std::collections::HashSet::new();
        for _ in 0..100 {
            let agent = random_user_agent();
            assert!(USER_AGENTS.contains(&agent));
            agents.insert(agent);
        }

        // With 100 iterations over 4 agents, rotation is statistically certain
        assert!(agents.len() > 1, "User agents should rotate");
    }

    #[test]
    fn test_build_page_headers() {
        let headers = build_page_headers("Mozilla/5.0", Some("https://www.lego.com"));

        assert_eq!(
            headers.get(USER_AGENT).unwrap(),
            HeaderValue::from_static("Mozilla/5.0")
        );
        assert_eq!(
            headers.get(REFERER).unwrap(),
            HeaderValue::from_static("https://www.lego.com")
        );
        assert!(headers.contains_key(ACCEPT_LANGUAGE));
        assert!(headers.contains_key("sec-fetch-dest"));
        assert!(headers.contains_key("sec-fetch-site"));
        assert!(headers.contains_key("upgrade-insecure-requests"));
    }

    #[test]
    fn test_build_api_headers() {
        let headers = build_api_headers("Mozilla/5.0", None);

        assert!(!headers.contains_key(REFERER));
        assert_eq!(
            headers.get("x-requested-with").unwrap(),
            HeaderValue::from_static("XMLHttpRequest")
        );
        assert_eq!(
            headers.get("sec-fetch-mode").unwrap(),
            HeaderValue::from_static("cors")
        );
    }

    #[test]
    fn test_invalid_values_are_skipped() {
        let headers = build_page_headers("bad\nagent", Some("bad\nreferer"));
        assert!(!headers.contains_key(USER_AGENT));
        assert!(!headers.contains_key(REFERER));
        assert!(headers.contains_key(ACCEPT));
    }

    #[test]
    fn test_build_download_headers() {
        let headers = build_download_headers("Mozilla/5.0");
        assert!(headers.contains_key(USER_AGENT));
        assert!(headers
            .get(ACCEPT)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("application/pdf"));
    }
}
