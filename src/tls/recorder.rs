//! Server certificate verifier that remembers what each server presented.
//!
//! reqwest does not expose the peer certificates of a connection, so the
//! client is configured with this verifier. It delegates the actual decision
//! to webpki (or accepts everything when trust is forced) and records the
//! presented chain per server name for later analysis.
//!
//! A recorded state belongs to exactly one handshake. The client built on
//! this configuration keeps no idle connections and session resumption is
//! disabled, so every HTTPS exchange performs a full handshake and the
//! executor takes the state right after its exchange.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::{Resumption, WebPkiServerVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, Error as TlsError, RootCertStore, SignatureScheme};

use crate::error_handling::InitializationError;
use crate::tls::extract::{build_verified_chain, digest_chain};
use crate::tls::TlsState;

#[derive(Debug)]
pub struct TlsRecorder {
    /// `None` when certificate trust is forced
    webpki: Option<Arc<WebPkiServerVerifier>>,
    provider: Arc<CryptoProvider>,
    captured: Mutex<HashMap<String, TlsState>>,
}

fn server_name_key(name: &ServerName<'_>) -> String {
    match name {
        ServerName::DnsName(dns) => dns.as_ref().to_ascii_lowercase(),
        ServerName::IpAddress(ip) => std::net::IpAddr::from(*ip).to_string(),
        _ => String::new(),
    }
}

/// Lookup key for a URL host (`[::1]` becomes `::1`).
fn host_key(host: &str) -> String {
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .to_ascii_lowercase()
}

impl TlsRecorder {
    /// Creates a recorder backed by the Mozilla root store.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::TlsConfigError` if the webpki verifier
    /// cannot be built.
    pub fn new(trust_invalid_certificates: bool) -> Result<Arc<Self>, InitializationError> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());

        let webpki = if trust_invalid_certificates {
            None
        } else {
            let mut root_store = RootCertStore::empty();
            root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            let verifier =
                WebPkiServerVerifier::builder_with_provider(Arc::new(root_store), provider.clone())
                    .build()
                    .map_err(|e| InitializationError::TlsConfigError(e.to_string()))?;
            Some(verifier)
        };

        Ok(Arc::new(Self {
            webpki,
            provider,
            captured: Mutex::new(HashMap::new()),
        }))
    }

    /// Builds a rustls client configuration that verifies through `self`.
    pub fn client_config(self: &Arc<Self>) -> Result<ClientConfig, InitializationError> {
        let mut config = ClientConfig::builder_with_provider(self.provider.clone())
            .with_safe_default_protocol_versions()
            .map_err(|e| InitializationError::TlsConfigError(e.to_string()))?
            .dangerous()
            .with_custom_certificate_verifier(self.clone())
            .with_no_client_auth();
        config.alpn_protocols = vec![b"http/1.1".to_vec()];
        config.resumption = Resumption::disabled();
        Ok(config)
    }

    /// True if this recorder accepts any certificate.
    pub fn trust_forced(&self) -> bool {
        self.webpki.is_none()
    }

    /// Removes and returns the TLS state recorded for `host` since the last take.
    pub fn take_state(&self, host: &str) -> Option<TlsState> {
        self.lock().remove(&host_key(host))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, TlsState>> {
        self.captured.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn record(&self, server_name: &str, ders: &[CertificateDer<'_>], verified: bool) {
        let key = host_key(server_name);
        let state = TlsState {
            server_name: key.clone(),
            peer_chain: digest_chain(ders),
            verified_chains: if verified {
                vec![build_verified_chain(ders)]
            } else {
                Vec::new()
            },
        };
        debug!(
            "Recorded {} peer certificate(s) for {key} (verified: {verified})",
            state.peer_chain.len()
        );
        self.lock().insert(key, state);
    }
}

impl ServerCertVerifier for TlsRecorder {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, TlsError> {
        let verdict = match &self.webpki {
            Some(webpki) => webpki.verify_server_cert(
                end_entity,
                intermediates,
                server_name,
                ocsp_response,
                now,
            ),
            None => Ok(ServerCertVerified::assertion()),
        };

        let mut ders = Vec::with_capacity(intermediates.len() + 1);
        ders.push(end_entity.clone().into_owned());
        ders.extend(intermediates.iter().map(|c| c.clone().into_owned()));
        self.record(
            &server_name_key(server_name),
            &ders,
            self.webpki.is_some() && verdict.is_ok(),
        );

        verdict
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
