//! Deep-link decoding for the app's custom URL scheme.
//!
//! Grammar: `minibrowser://<url>` or `minibrowser://?url=<percent-encoded>`.
//! Plain `http(s)://` links pass straight through. Decoding never aborts tab
//! creation: a malformed payload degrades to a best-effort stripped string,
//! and only links in schemes this app does not claim return `None`.

use url::form_urlencoded;

pub const APP_SCHEME: &str = "minibrowser";

/// Resolves an OS-delivered link to the web URL a new tab should open.
pub fn resolve(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(raw.to_string());
    }

    let prefix = format!("{}://", APP_SCHEME);
    let rest = raw.strip_prefix(&prefix)?;

    if let Some(query) = rest.strip_prefix('?') {
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key == "url" && !value.is_empty() {
                return Some(ensure_web_scheme(&value));
            }
        }
        // Recognized scheme but no usable url parameter: fall back to the raw
        // query text rather than dropping the link.
        tracing::warn!(link = raw, "deep link query missing url parameter");
        if query.is_empty() {
            return None;
        }
        return Some(ensure_web_scheme(query));
    }

    if rest.is_empty() {
        return None;
    }
    Some(ensure_web_scheme(rest))
}

fn ensure_web_scheme(target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else {
        format!("https://{}", target)
    }
}
