//! Request executor: one decorated HTTP exchange per call.

use std::sync::Arc;

use log::debug;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::SET_COOKIE;
use url::Url;

use crate::config::ConnectionSetup;
use crate::error_handling::{InitializationError, ProbeError};
use crate::fetch::hop::{RequestRecord, ResponseRecord, WebRequestResult};
use crate::fetch::request::{parse_cookie_header, parse_set_cookie, reconcile_cookies, Cookie, WebRequest};
use crate::initialization::init_client;
use crate::tls::TlsRecorder;

/// Executes requests with the network policy of one run.
///
/// The cookie jar (if any) is driven here rather than by reqwest, so the
/// `Cookie` header always carries the supplied cookies followed by the stored
/// ones.
pub struct RequestExecutor {
    client: reqwest::Client,
    setup: ConnectionSetup,
    recorder: Arc<TlsRecorder>,
}

impl RequestExecutor {
    /// Builds the client for `setup`.
    ///
    /// # Errors
    ///
    /// Returns an `InitializationError` if the TLS configuration or the HTTP
    /// client cannot be built.
    pub fn new(setup: &ConnectionSetup) -> Result<Self, InitializationError> {
        let recorder = TlsRecorder::new(setup.trust_invalid_certificates)?;
        let client = init_client(setup, &recorder)?;
        Ok(Self {
            client,
            setup: setup.clone(),
            recorder,
        })
    }

    pub fn setup(&self) -> &ConnectionSetup {
        &self.setup
    }

    /// True if certificates are accepted without verification.
    pub fn trust_forced(&self) -> bool {
        self.recorder.trust_forced()
    }

    fn jar(&self) -> Option<&Jar> {
        self.setup.cookie_jar.as_deref()
    }

    /// Cookies the jar would send to `url`. `Path`/`Domain` are filled in from
    /// `set_cookies` where the response just set the cookie.
    fn stored_cookies(&self, url: &Url, set_cookies: &[Cookie]) -> Vec<Cookie> {
        let Some(header) = self.jar().and_then(|jar| jar.cookies(url)) else {
            return Vec::new();
        };
        let Ok(header) = header.to_str() else {
            return Vec::new();
        };
        parse_cookie_header(header)
            .into_iter()
            .map(|stored| {
                set_cookies
                    .iter()
                    .find(|c| c.name == stored.name && c.value == stored.value)
                    .cloned()
                    .unwrap_or(stored)
            })
            .collect()
    }

    /// Sends `request` once and captures request, response, TLS state and cookies.
    ///
    /// On success the supplied cookies of `request` are reconciled against the
    /// jar, so a cookie the server took over is not sent twice on the next hop.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::InvalidHeader` for unusable extra headers and
    /// `ProbeError::RequestFailed` for any transport failure.
    pub async fn execute(&self, request: &mut WebRequest) -> Result<WebRequestResult, ProbeError> {
        let url = request.url.clone();
        let failed = |source: reqwest::Error| ProbeError::RequestFailed {
            url: url.to_string(),
            source,
        };

        let jar_cookies = self
            .jar()
            .and_then(|jar| jar.cookies(&url))
            .and_then(|v| v.to_str().ok().map(str::to_string));
        let headers = request.build_headers(jar_cookies.as_deref())?;

        let mut builder = self
            .client
            .request(request.method.into(), url.clone())
            .headers(headers);
        if let Some(auth) = request.auth.as_ref().filter(|a| a.is_usable()) {
            builder = builder.basic_auth(&auth.user, Some(&auth.pass));
        }
        let body = request.body_to_send().map(str::to_string);
        if let Some(body) = &body {
            builder = builder.body(body.clone());
        }

        let outgoing = builder.build().map_err(failed)?;
        let request_record = RequestRecord {
            method: request.method,
            url: url.clone(),
            headers: outgoing.headers().clone(),
            body,
        };

        let tls_host = match (url.scheme(), url.host_str()) {
            ("https", Some(host)) => Some(host),
            _ => None,
        };
        if let Some(host) = tls_host {
            self.recorder.take_state(host);
        }

        debug!("Sending {} {url}", request.method);
        let response = self.client.execute(outgoing).await.map_err(failed)?;

        let status = response.status();
        let version = format!("{:?}", response.version());
        let headers = response.headers().clone();
        debug!("Received {status} ({version}) from {url}");

        if let Some(jar) = self.jar() {
            let mut set_cookie_values = headers.get_all(SET_COOKIE).iter();
            jar.set_cookies(&mut set_cookie_values, &url);
        }

        let body = response.bytes().await.map_err(failed)?;

        let tls = tls_host.and_then(|host| self.recorder.take_state(host));

        let set_cookies: Vec<Cookie> = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(parse_set_cookie)
            .collect();
        let cookies = self.stored_cookies(&url, &set_cookies);
        reconcile_cookies(&mut request.cookies, &cookies);

        Ok(WebRequestResult {
            request: request_record,
            response: ResponseRecord {
                status: status.as_u16(),
                reason: status.canonical_reason().map(str::to_string),
                version,
                headers,
                tls,
                body,
            },
            cookies,
        })
    }
}
