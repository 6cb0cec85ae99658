//! Certificate extraction utilities.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use log::warn;
use rustls::pki_types::CertificateDer;
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::{GeneralName, ParsedExtension};
use x509_parser::x509::{AttributeTypeAndValue, X509Name};

use crate::tls::analysis::normalize_name;

/// Display-ready summary of one certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertDigest {
    /// Subject common name, trimmed and lowercased (used for matching)
    pub common_name: String,
    /// Subject common name as found in the certificate
    pub raw_common_name: String,
    pub subject_alt_names: Vec<String>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub organization: Option<String>,
    pub organizational_units: Option<String>,
    pub country: Option<String>,
    pub is_ca: bool,
    pub issuer_name: String,
    pub issuer_organization: Option<String>,
    pub issuer_units: Option<String>,
    pub issuer_country: Option<String>,
}

/// One line of a rendered certificate chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEntry {
    pub common_name: String,
    pub organization: Option<String>,
}

impl From<&CertDigest> for ChainEntry {
    fn from(c: &CertDigest) -> Self {
        Self {
            common_name: c.raw_common_name.clone(),
            organization: c.organization.clone(),
        }
    }
}

fn join_attributes<'a, 'b: 'a>(
    values: impl Iterator<Item = &'a AttributeTypeAndValue<'b>>,
) -> Option<String> {
    let joined: Vec<&str> = values.filter_map(|v| v.as_str().ok()).collect();
    (!joined.is_empty()).then(|| joined.join(", "))
}

fn common_name(name: &X509Name<'_>) -> String {
    name.iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn timestamp(ts: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0).ok_or_else(|| anyhow!("timestamp out of range: {ts}"))
}

/// Extracts Subject Alternative Names (SANs) from an X.509 certificate.
///
/// Only DNS names are extracted (not IP addresses, email addresses, etc.).
pub(crate) fn extract_certificate_sans(cert: &X509Certificate<'_>) -> Vec<String> {
    let mut sans = Vec::new();

    for ext in cert.extensions() {
        if let ParsedExtension::SubjectAlternativeName(san) = ext.parsed_extension() {
            for general_name in &san.general_names {
                if let GeneralName::DNSName(dns_name) = general_name {
                    sans.push(dns_name.to_string());
                }
            }
        }
    }

    sans
}

impl CertDigest {
    /// Builds a digest from a parsed certificate.
    pub fn from_x509(cert: &X509Certificate<'_>) -> Result<Self> {
        let subject = cert.subject();
        let issuer = cert.issuer();
        let raw_common_name = common_name(subject);

        Ok(Self {
            common_name: normalize_name(&raw_common_name),
            raw_common_name,
            subject_alt_names: extract_certificate_sans(cert),
            valid_from: timestamp(cert.validity().not_before.timestamp())?,
            valid_until: timestamp(cert.validity().not_after.timestamp())?,
            organization: join_attributes(subject.iter_organization()),
            organizational_units: join_attributes(subject.iter_organizational_unit()),
            country: join_attributes(subject.iter_country()),
            is_ca: cert.is_ca(),
            issuer_name: common_name(issuer),
            issuer_organization: join_attributes(issuer.iter_organization()),
            issuer_units: join_attributes(issuer.iter_organizational_unit()),
            issuer_country: join_attributes(issuer.iter_country()),
        })
    }

    /// Parses a DER encoded certificate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid X.509 certificate.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let (_, cert) = x509_parser::parse_x509_certificate(der)?;
        Self::from_x509(&cert)
    }
}

/// Parses the peer chain, leaf first.
///
/// Unparsable intermediates are skipped (and logged). An unparsable leaf
/// yields an empty chain, so no other certificate is ever reported as the
/// leaf.
pub fn digest_chain(ders: &[CertificateDer<'_>]) -> Vec<CertDigest> {
    let mut chain = Vec::with_capacity(ders.len());
    for (i, der) in ders.iter().enumerate() {
        match CertDigest::from_der(der.as_ref()) {
            Ok(digest) => chain.push(digest),
            Err(e) if i == 0 => {
                warn!("Peer leaf certificate is unparsable, ignoring the chain: {e}");
                return Vec::new();
            }
            Err(e) => warn!("Skipping unparsable certificate #{i} in peer chain: {e}"),
        }
    }
    chain
}

/// Contents of a DER `SEQUENCE` without its tag and length octets.
fn der_contents(raw: &[u8]) -> &[u8] {
    match raw {
        [0x30, len, rest @ ..] if *len < 0x80 => rest,
        [0x30, len, rest @ ..] => rest.get(usize::from(*len & 0x7f)..).unwrap_or(raw),
        _ => raw,
    }
}

fn is_trust_anchor_subject(name: &[u8]) -> bool {
    let contents = der_contents(name);
    webpki_roots::TLS_SERVER_ROOTS
        .iter()
        .any(|anchor| anchor.subject.as_ref() == contents || anchor.subject.as_ref() == name)
}

/// Builds the client-side trust path from the leaf to its anchor.
///
/// Starting at the leaf, each step picks the not yet used peer certificate
/// whose subject equals the current issuer. When no peer certificate links
/// further and the last issuer is a known trust anchor, the anchor is
/// appended (named after that issuer).
pub fn build_verified_chain(ders: &[CertificateDer<'_>]) -> Vec<ChainEntry> {
    let parsed: Vec<X509Certificate<'_>> = ders
        .iter()
        .filter_map(|der| x509_parser::parse_x509_certificate(der.as_ref()).ok())
        .map(|(_, cert)| cert)
        .collect();

    let Some(leaf) = parsed.first() else {
        return Vec::new();
    };

    let mut used = vec![0usize];
    let mut current = leaf;
    while current.subject().as_raw() != current.issuer().as_raw() {
        let next = parsed
            .iter()
            .enumerate()
            .find(|(i, c)| !used.contains(i) && c.subject().as_raw() == current.issuer().as_raw());
        match next {
            Some((i, cert)) => {
                used.push(i);
                current = cert;
            }
            None => break,
        }
    }

    let mut chain: Vec<ChainEntry> = used
        .iter()
        .filter_map(|&i| CertDigest::from_x509(&parsed[i]).ok())
        .map(|c| ChainEntry::from(&c))
        .collect();

    let issuer = current.issuer();
    if current.subject().as_raw() != issuer.as_raw() && is_trust_anchor_subject(issuer.as_raw()) {
        chain.push(ChainEntry {
            common_name: common_name(issuer),
            organization: join_attributes(issuer.iter_organization()),
        });
    }

    chain
}
