//! HTTP request model and header decoration.
//!
//! This module provides the request template built once from the CLI state,
//! the per-URL `WebRequest`, and the helpers used to decorate the outgoing
//! request with headers, cookies and authentication.

use std::fmt;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT_LANGUAGE, COOKIE, USER_AGENT};
use url::Url;

use crate::config::{HttpMethod, HEADER_SEPARATOR};
use crate::error_handling::ProbeError;

/// Splits `s` at the first occurrence of `sep`, trimming both sides.
///
/// Returns `None` if the separator does not occur.
pub fn split_first(s: &str, sep: char) -> Option<(&str, &str)> {
    s.split_once(sep)
        .map(|(name, value)| (name.trim(), value.trim()))
}

/// A single cookie (name and value plus the attributes we display).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
        }
    }

    /// Value followed by the `path`/`domain` attributes, if known.
    pub fn full_value(&self) -> String {
        let mut fv = self.value.clone();
        if let Some(path) = self.path.as_deref().filter(|p| !p.is_empty()) {
            fv.push_str(&format!("; path={path}"));
        }
        if let Some(domain) = self.domain.as_deref().filter(|d| !d.is_empty()) {
            fv.push_str(&format!("; domain={domain}"));
        }
        fv
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Parses a `Cookie` request header value (`a=1; b=2`) into cookies.
pub fn parse_cookie_header(value: &str) -> Vec<Cookie> {
    value
        .split(';')
        .filter_map(|pair| {
            let (name, value) = split_first(pair, '=')?;
            (!name.is_empty()).then(|| Cookie::new(name, value))
        })
        .collect()
}

/// Parses a `Set-Cookie` response header value, keeping `Path` and `Domain`.
pub fn parse_set_cookie(value: &str) -> Option<Cookie> {
    let mut parts = value.split(';');
    let (name, val) = split_first(parts.next()?, '=')?;
    if name.is_empty() {
        return None;
    }
    let mut cookie = Cookie::new(name, val);
    for attr in parts {
        match split_first(attr, '=') {
            Some((k, v)) if k.eq_ignore_ascii_case("path") => cookie.path = Some(v.to_string()),
            Some((k, v)) if k.eq_ignore_ascii_case("domain") => {
                cookie.domain = Some(v.to_string())
            }
            _ => {}
        }
    }
    Some(cookie)
}

/// Removes every supplied cookie that the jar now owns (matched by name).
///
/// Cookies only present in `supplied` or only present in `stored` are left
/// untouched.
pub fn reconcile_cookies(supplied: &mut Vec<Cookie>, stored: &[Cookie]) {
    supplied.retain(|c| !stored.iter().any(|s| s.name == c.name));
}

/// Basic authentication credentials. Both parts are always present together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub user: String,
    pub pass: String,
}

impl BasicAuth {
    /// Credentials are only applied if neither part is empty.
    pub fn is_usable(&self) -> bool {
        !self.user.is_empty() && !self.pass.is_empty()
    }
}

/// Request settings shared by every target URL of a run.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    pub method: HttpMethod,
    pub agent: String,
    pub lang: String,
    pub auth: Option<BasicAuth>,
    pub body: String,
    /// Raw `Name: Value` strings
    pub extra_headers: Vec<String>,
    pub cookies: Vec<Cookie>,
}

impl RequestTemplate {
    /// Creates an independent request for `url`.
    ///
    /// The cookie list is copied, so reconciliation on one URL's hops never
    /// affects the next URL.
    pub fn for_url(&self, url: Url) -> WebRequest {
        WebRequest {
            url,
            method: self.method,
            agent: self.agent.clone(),
            lang: self.lang.clone(),
            auth: self.auth.clone(),
            body: self.body.clone(),
            extra_headers: self.extra_headers.clone(),
            cookies: self.cookies.clone(),
        }
    }
}

impl Default for RequestTemplate {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            agent: crate::config::DEFAULT_USER_AGENT.to_string(),
            lang: String::new(),
            auth: None,
            body: String::new(),
            extra_headers: Vec::new(),
            cookies: Vec::new(),
        }
    }
}

/// One intended HTTP call.
#[derive(Debug, Clone)]
pub struct WebRequest {
    pub url: Url,
    pub method: HttpMethod,
    pub agent: String,
    pub lang: String,
    pub auth: Option<BasicAuth>,
    pub body: String,
    pub extra_headers: Vec<String>,
    pub cookies: Vec<Cookie>,
}

impl fmt::Display for WebRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.url, self.method)
    }
}

impl WebRequest {
    /// Returns the body to send, if the method carries one and it is non-empty.
    pub fn body_to_send(&self) -> Option<&str> {
        (self.method.needs_body() && !self.body.is_empty()).then_some(self.body.as_str())
    }

    /// Builds the decorated request headers.
    ///
    /// `User-Agent` is always set, `Accept-Language` only if non-empty. Extra
    /// headers are assigned in order, so a later value for the same name
    /// replaces an earlier one. Supplied cookies come first in the `Cookie`
    /// header, followed by `jar_cookies`.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::InvalidHeader` for extra headers without a name or
    /// with characters not allowed in HTTP headers.
    pub fn build_headers(&self, jar_cookies: Option<&str>) -> Result<HeaderMap, ProbeError> {
        let mut headers = HeaderMap::new();

        headers.insert(USER_AGENT, header_value(&self.agent, "User-Agent")?);

        if !self.lang.is_empty() {
            headers.insert(ACCEPT_LANGUAGE, header_value(&self.lang, "Accept-Language")?);
        }

        for raw in &self.extra_headers {
            let (name, value) = split_first(raw, HEADER_SEPARATOR)
                .filter(|(name, _)| !name.is_empty())
                .ok_or_else(|| ProbeError::InvalidHeader(raw.clone()))?;
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ProbeError::InvalidHeader(raw.clone()))?;
            headers.insert(name, header_value(value, raw)?);
        }

        let mut cookie_parts: Vec<String> = Vec::new();
        if let Some(existing) = headers.get(COOKIE).and_then(|v| v.to_str().ok()) {
            cookie_parts.push(existing.to_string());
        }
        cookie_parts.extend(self.cookies.iter().map(Cookie::to_string));
        if let Some(jar) = jar_cookies.filter(|j| !j.is_empty()) {
            cookie_parts.push(jar.to_string());
        }
        if !cookie_parts.is_empty() {
            headers.insert(COOKIE, header_value(&cookie_parts.join("; "), "Cookie")?);
        }

        Ok(headers)
    }
}

fn header_value(value: &str, context: &str) -> Result<HeaderValue, ProbeError> {
    HeaderValue::from_str(value).map_err(|_| ProbeError::InvalidHeader(context.to_string()))
}
