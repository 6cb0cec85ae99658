//! URL validation and normalization utilities.

use log::warn;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::error_handling::ProbeError;
use crate::utils::text::compile_regex_unsafe;

static HTTP_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"(?i)^https?://", "HTTP_SCHEME"));

/// Validates and normalizes a target URL.
///
/// Adds an `http://` prefix unless the input already starts with `http://` or
/// `https://` (in any case), then parses it.
///
/// # Errors
///
/// Returns `ProbeError::NoUrl` if the result is not a valid http(s) URL with a host.
pub fn check_url(raw: &str) -> Result<Url, ProbeError> {
    let trimmed = raw.trim();
    let no_url = || ProbeError::NoUrl {
        url: raw.to_string(),
    };
    if trimmed.is_empty() {
        return Err(no_url());
    }

    let normalized = if HTTP_SCHEME.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    match Url::parse(&normalized) {
        Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(url),
        Ok(_) | Err(_) => {
            warn!("Skipping invalid URL: {raw}");
            Err(no_url())
        }
    }
}
