//! URL helpers shared by the address bar, history ledger, and reconciler.

use url::form_urlencoded;
use url::Url;

use crate::types::settings::{SearchEngine, SEARCH_ENGINES};

/// The blank-page sentinel; never recorded in history.
pub const ABOUT_BLANK: &str = "about:blank";

/// Hostname for display purposes; falls back to the raw string when the URL
/// does not parse or carries no host.
pub fn display_host(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .host_str()
            .map(str::to_string)
            .unwrap_or_else(|| url.to_string()),
        Err(_) => url.to_string(),
    }
}

/// Icon URL for a site, delegated to an external favicon service.
pub fn favicon_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(format!(
        "https://www.google.com/s2/favicons?domain={}&sz=128",
        host
    ))
}

/// Trailing-slash-insensitive form used for history deduplication.
pub fn normalize_for_dedup(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

/// Heuristic for "the user typed an address, not a search": no spaces and a
/// TLD-looking alphabetic suffix after the last dot.
pub fn is_domain_like(text: &str) -> bool {
    if text.contains(' ') {
        return false;
    }
    match text.rsplit_once('.') {
        Some((head, tld)) => {
            !head.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
        }
        None => false,
    }
}

/// Whether a string is already URL-shaped (used to reject raw URLs offered as
/// page titles).
pub fn looks_like_url(text: &str) -> bool {
    text.starts_with("http://")
        || text.starts_with("https://")
        || (!text.contains(' ') && text.contains("://"))
}

/// Turns address-bar input into a navigable URL: explicit URLs pass through,
/// domain-looking text gets an https scheme, everything else becomes a search.
pub fn resolve_address_input(text: &str, engine: &SearchEngine) -> String {
    let text = text.trim();
    if text.starts_with("http://") || text.starts_with("https://") {
        text.to_string()
    } else if is_domain_like(text) {
        format!("https://{}", text)
    } else {
        build_search_url(engine, text)
    }
}

/// Search URL for a query against the given engine.
pub fn build_search_url(engine: &SearchEngine, query: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{}{}", engine.query_url, encoded)
}

/// Whether the URL already targets any known search engine; guards against
/// redirect loops when a search results page itself fails to resolve.
pub fn is_search_url(url: &str) -> bool {
    SEARCH_ENGINES.iter().any(|e| url.starts_with(e.query_url))
}

/// Reduces a failed URL to the text worth re-searching: scheme and trailing
/// slash stripped.
pub fn search_query_from_failed(url: &str) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    stripped.strip_suffix('/').unwrap_or(stripped).to_string()
}
