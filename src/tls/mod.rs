//! TLS certificate capture and analysis.
//!
//! This module records the certificates a server presents during the
//! handshake and turns them into a display-ready report:
//! - Peer chain as sent by the server (subject, issuer, validity, SANs)
//! - Locally built verified chain when webpki accepted the peer
//! - Host name match against CN and SANs (wildcards included)
//! - Validity and chain status classification
//!
//! Uses `rustls` for the handshake hook and `x509-parser` for certificate parsing.

mod analysis;
mod extract;
mod recorder;
#[cfg(test)]
mod test_certs;

pub use analysis::{
    analyze, matches_host, normalize_name, CertificateReport, ChainStatus, NameMatch, Validity,
};
pub use extract::{CertDigest, ChainEntry};
pub use recorder::TlsRecorder;

/// Certificates captured for one TLS connection.
#[derive(Debug, Clone, PartialEq)]
pub struct TlsState {
    /// Host name the client asked for (SNI)
    pub server_name: String,
    /// Certificates in the order the server sent them, leaf first
    pub peer_chain: Vec<CertDigest>,
    /// Trust paths built after successful verification
    pub verified_chains: Vec<Vec<ChainEntry>>,
}
