//! HTTP client initialization.
//!
//! This module builds the single `reqwest::Client` used for every hop of a run.

use std::sync::Arc;

use reqwest::ClientBuilder;

use crate::config::ConnectionSetup;
use crate::error_handling::InitializationError;
use crate::tls::TlsRecorder;

/// Initializes the HTTP client for a run.
///
/// Creates a `reqwest::Client` configured with:
/// - Redirects disabled (the walker follows them hop by hop)
/// - No idle connections kept, so every hop gets its own TLS handshake
/// - Timeout from the connection setup (none if zero)
/// - HTTP proxy `http://<proxy>` if one is set
/// - The rustls configuration of `recorder`, so peer certificates are captured
///
/// # Errors
///
/// Returns an `InitializationError` if the TLS configuration, the proxy or the
/// client cannot be built.
pub fn init_client(
    setup: &ConnectionSetup,
    recorder: &Arc<TlsRecorder>,
) -> Result<reqwest::Client, InitializationError> {
    let mut builder = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .use_preconfigured_tls(recorder.client_config()?);

    if !setup.timeout.is_zero() {
        builder = builder.timeout(setup.timeout);
    }

    if let Some(proxy) = &setup.proxy {
        builder = builder.proxy(reqwest::Proxy::all(format!("http://{proxy}"))?);
    }

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_builds_with_proxy_and_no_timeout() {
        let setup = ConnectionSetup::new(
            Duration::ZERO,
            Some("127.0.0.1:3128".into()),
            false,
            true,
            false,
        );
        let recorder = TlsRecorder::new(setup.trust_invalid_certificates).unwrap();
        assert!(init_client(&setup, &recorder).is_ok());
    }

    #[test]
    fn test_client_builds_in_trust_mode() {
        let setup = ConnectionSetup::new(Duration::from_secs(5), None, true, false, true);
        let recorder = TlsRecorder::new(true).unwrap();
        assert!(init_client(&setup, &recorder).is_ok());
    }
}
