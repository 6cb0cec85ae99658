//! Configuration types.
//!
//! This module defines the enums and structs shared by the CLI layer and the
//! request engine: log settings, the HTTP method allow-list and the
//! per-run connection policy.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use reqwest::cookie::Jar;
use strum_macros::EnumIter;

use crate::error_handling::ProbeError;

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// HTTP request methods accepted by `--method`.
///
/// See RFC 7231 section 4.3. Only POST, PUT and PATCH carry a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Connect,
    Options,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Returns true if a request with this method carries the request body.
    pub fn needs_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "HEAD" => Ok(HttpMethod::Head),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "CONNECT" => Ok(HttpMethod::Connect),
            "OPTIONS" => Ok(HttpMethod::Options),
            "TRACE" => Ok(HttpMethod::Trace),
            _ => Err(ProbeError::UnknownMethod(s.to_string())),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Connect => reqwest::Method::CONNECT,
            HttpMethod::Options => reqwest::Method::OPTIONS,
            HttpMethod::Trace => reqwest::Method::TRACE,
        }
    }
}

/// Network policy for one run.
///
/// Built once from the CLI flags and passed by reference into the request
/// executor. The cookie jar is present only when cookies are accepted and is
/// shared by every hop of every URL in the run.
#[derive(Debug, Clone)]
pub struct ConnectionSetup {
    /// Per-request timeout (zero disables it)
    pub timeout: Duration,

    /// Proxy as `host[:port]`
    pub proxy: Option<String>,

    /// Skip certificate chain verification
    pub trust_invalid_certificates: bool,

    /// Follow `3xx` responses hop by hop
    pub follow_redirects: bool,

    /// Store `Set-Cookie` values and send them on later hops
    pub accept_cookies: bool,

    /// Cookie store, present iff `accept_cookies`
    pub cookie_jar: Option<Arc<Jar>>,
}

impl ConnectionSetup {
    /// Creates a connection setup, allocating a cookie jar when cookies are accepted.
    pub fn new(
        timeout: Duration,
        proxy: Option<String>,
        trust_invalid_certificates: bool,
        follow_redirects: bool,
        accept_cookies: bool,
    ) -> Self {
        Self {
            timeout,
            proxy: proxy.filter(|p| !p.trim().is_empty()),
            trust_invalid_certificates,
            follow_redirects,
            accept_cookies,
            cookie_jar: accept_cookies.then(|| Arc::new(Jar::default())),
        }
    }
}

impl Default for ConnectionSetup {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(crate::config::DEFAULT_CONNECTION_TIMEOUT_SECS),
            None,
            false,
            false,
            false,
        )
    }
}
