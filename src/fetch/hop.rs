//! Result model for one HTTP exchange (a hop).
//!
//! A `WebRequestResult` holds the request exactly as it was sent, the
//! response with its body buffered, the TLS state of the connection (HTTPS
//! only) and the cookies held by the jar after the exchange.

use bytes::Bytes;
use reqwest::header::{HeaderMap, COOKIE, LOCATION, SET_COOKIE};
use url::Url;

use crate::config::{
    HttpMethod, REDIRECT_LIMIT_STATUS, REDIRECT_STATUS_MAX, REDIRECT_STATUS_MIN,
};
use crate::error_handling::ProbeError;
use crate::fetch::request::{parse_cookie_header, Cookie};
use crate::tls::TlsState;

/// The outgoing request after header, cookie and auth decoration.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl RequestRecord {
    /// Cookies sent with this request (parsed from the `Cookie` header).
    pub fn cookies(&self) -> Vec<Cookie> {
        self.headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(parse_cookie_header)
            .collect()
    }
}

/// The response of one hop. The body is read completely when the hop is
/// captured, so every display path sees the same bytes.
#[derive(Debug, Clone)]
pub struct ResponseRecord {
    pub status: u16,
    pub reason: Option<String>,
    pub version: String,
    pub headers: HeaderMap,
    pub tls: Option<TlsState>,
    pub body: Bytes,
}

impl ResponseRecord {
    /// Status code plus reason phrase, e.g. `302 Found`.
    pub fn status_line(&self) -> String {
        match &self.reason {
            Some(reason) => format!("{} {}", self.status, reason),
            None => self.status.to_string(),
        }
    }

    /// True for statuses the redirect walker follows (301..=399).
    pub fn is_redirect(&self) -> bool {
        (REDIRECT_STATUS_MIN..=REDIRECT_STATUS_MAX).contains(&self.status)
    }

    /// True if the walker stopped this chain at the redirect ceiling.
    pub fn redirect_limit_reached(&self) -> bool {
        self.status == REDIRECT_LIMIT_STATUS
    }

    /// Marks this hop as the last one of a capped redirect chain.
    pub fn mark_redirect_limit(&mut self) {
        self.status = REDIRECT_LIMIT_STATUS;
        self.reason = Some("Redirect limit reached".to_string());
    }

    /// Raw `Set-Cookie` values of the response.
    pub fn set_cookie_headers(&self) -> Vec<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect()
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Outcome of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct WebRequestResult {
    pub request: RequestRecord,
    pub response: ResponseRecord,
    /// Cookies held by the jar for this hop's URL after the exchange
    pub cookies: Vec<Cookie>,
}

impl WebRequestResult {
    /// Resolves the `Location` header against the request URL.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::ResponseInvalid` if the header is missing, not
    /// valid text, or not a valid URL reference.
    pub fn location(&self) -> Result<Url, ProbeError> {
        let invalid = |reason: String| ProbeError::ResponseInvalid {
            url: self.request.url.to_string(),
            reason,
        };

        let raw = self
            .response
            .headers
            .get(LOCATION)
            .ok_or_else(|| invalid("missing Location header".to_string()))?
            .to_str()
            .map_err(|_| invalid("Location header is not valid text".to_string()))?;

        self.request
            .url
            .join(raw)
            .map_err(|e| invalid(format!("unusable Location header {raw:?}: {e}")))
    }

    /// Host of the request URL (empty if the URL has none).
    pub fn host(&self) -> &str {
        self.request.url.host_str().unwrap_or_default()
    }
}

impl std::fmt::Display for WebRequestResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({})",
            self.request.url,
            self.response.status_line()
        )
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Builds a hop without any network activity.
    pub(crate) fn hop(url: &str, status: u16, headers: &[(&'static str, &str)]) -> WebRequestResult {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.append(*name, value.parse().expect("valid test header value"));
        }
        WebRequestResult {
            request: RequestRecord {
                method: HttpMethod::Get,
                url: Url::parse(url).expect("valid test URL"),
                headers: HeaderMap::new(),
                body: None,
            },
            response: ResponseRecord {
                status,
                reason: reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .map(str::to_string),
                version: "HTTP/1.1".to_string(),
                headers: map,
                tls: None,
                body: Bytes::new(),
            },
            cookies: Vec::new(),
        }
    }
}
