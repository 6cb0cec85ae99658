//! Certificate analysis: host name matching, validity and chain classification.
//!
//! Everything here is a pure function of the captured `TlsState`, the trust
//! flag and the current time, so the same input always yields the same report.

use chrono::{DateTime, Utc};

use crate::config::{CERT_EXPIRY_WARNING_DAYS, MIN_COMPLETE_CHAIN_LEN};
use crate::tls::extract::{CertDigest, ChainEntry};
use crate::tls::TlsState;

/// Trims and lowercases a host or certificate name.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Returns true if the certificate name `pattern` covers `host`.
///
/// Both sides are compared case-insensitively after trimming. Besides exact
/// equality, a pattern may contain exactly one `*` label which stands for one
/// non-empty label of the host at the same position (`*.example.com` covers
/// `www.example.com` but neither `example.com` nor `a.b.example.com`).
pub fn matches_host(pattern: &str, host: &str) -> bool {
    let pattern = normalize_name(pattern);
    let host = normalize_name(host);
    if pattern.is_empty() || host.is_empty() {
        return false;
    }
    if pattern == host {
        return true;
    }

    let pattern_labels: Vec<&str> = pattern.split('.').collect();
    let host_labels: Vec<&str> = host.split('.').collect();
    if pattern_labels.len() != host_labels.len()
        || pattern_labels.iter().filter(|l| **l == "*").count() != 1
    {
        return false;
    }

    pattern_labels
        .iter()
        .zip(&host_labels)
        .all(|(p, h)| if *p == "*" { !h.is_empty() } else { p == h })
}

/// Which certificate name matched the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    CommonName,
    /// Index into the leaf's SAN list
    SubjectAltName(usize),
    Unmatched,
}

impl NameMatch {
    /// Checks the common name first, then the SANs in certificate order.
    pub fn find(leaf: &CertDigest, host: &str) -> Self {
        if matches_host(&leaf.common_name, host) {
            return NameMatch::CommonName;
        }
        leaf.subject_alt_names
            .iter()
            .position(|san| matches_host(san, host))
            .map_or(NameMatch::Unmatched, NameMatch::SubjectAltName)
    }

    pub fn is_match(self) -> bool {
        self != NameMatch::Unmatched
    }
}

/// Validity classification of the leaf certificate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Validity {
    Expired { days: f64 },
    ExpiringSoon { days: f64 },
    Valid { days: f64 },
}

impl Validity {
    /// Classifies by remaining days (hours / 24) until `valid_until`.
    pub fn classify(valid_until: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let days = (valid_until - now).num_seconds() as f64 / 3600.0 / 24.0;
        if days < 0.0 {
            Validity::Expired { days }
        } else if days < CERT_EXPIRY_WARNING_DAYS {
            Validity::ExpiringSoon { days }
        } else {
            Validity::Valid { days }
        }
    }

    pub fn days(self) -> f64 {
        match self {
            Validity::Expired { days } | Validity::ExpiringSoon { days } | Validity::Valid { days } => {
                days
            }
        }
    }
}

/// How the certificate chain presented by the server is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainStatus {
    SelfSigned,
    TrustForced,
    Incomplete,
    SentByPeer,
}

impl ChainStatus {
    /// Self-signed wins over forced trust, which wins over an incomplete chain.
    pub fn classify(leaf: &CertDigest, chain_len: usize, trust_forced: bool) -> Self {
        if leaf.is_ca {
            ChainStatus::SelfSigned
        } else if trust_forced {
            ChainStatus::TrustForced
        } else if chain_len < MIN_COMPLETE_CHAIN_LEN {
            ChainStatus::Incomplete
        } else {
            ChainStatus::SentByPeer
        }
    }
}

/// Everything the certificate view shows for one hop.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateReport {
    pub server_name: String,
    pub leaf: CertDigest,
    pub name_match: NameMatch,
    pub validity: Validity,
    pub chain_status: ChainStatus,
    pub peer_chain: Vec<ChainEntry>,
    /// Empty if verification did not run or did not succeed
    pub verified_chains: Vec<Vec<ChainEntry>>,
}

/// Analyzes the TLS state of one hop.
///
/// Returns `None` if the hop has no TLS state (plain HTTP) or the server's
/// leaf certificate could not be parsed.
pub fn analyze(
    tls: Option<&TlsState>,
    trust_forced: bool,
    now: DateTime<Utc>,
) -> Option<CertificateReport> {
    let tls = tls?;
    let leaf = tls.peer_chain.first()?;

    Some(CertificateReport {
        server_name: tls.server_name.clone(),
        leaf: leaf.clone(),
        name_match: NameMatch::find(leaf, &tls.server_name),
        validity: Validity::classify(leaf.valid_until, now),
        chain_status: ChainStatus::classify(leaf, tls.peer_chain.len(), trust_forced),
        peer_chain: tls.peer_chain.iter().map(ChainEntry::from).collect(),
        verified_chains: tls.verified_chains.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tls::extract::digest_chain;
    use crate::tls::test_certs::Template;
    use chrono::{Duration, TimeZone};
    use rustls::pki_types::CertificateDer;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn leaf(cn: &str, sans: &[&str], days_left: i64, is_ca: bool) -> CertDigest {
        CertDigest {
            common_name: normalize_name(cn),
            raw_common_name: cn.to_string(),
            subject_alt_names: sans.iter().map(|s| s.to_string()).collect(),
            valid_from: now() - Duration::days(60),
            valid_until: now() + Duration::days(days_left),
            organization: None,
            organizational_units: None,
            country: None,
            is_ca,
            issuer_name: "Test Issuing CA".into(),
            issuer_organization: Some("Test CA Org".into()),
            issuer_units: None,
            issuer_country: Some("US".into()),
        }
    }

    fn state(host: &str, chain: Vec<CertDigest>) -> TlsState {
        TlsState {
            server_name: host.to_string(),
            peer_chain: chain,
            verified_chains: Vec::new(),
        }
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        assert!(matches_host("Example.COM", "example.com"));
        assert!(matches_host(" www.example.com ", "WWW.example.com"));
        assert!(!matches_host("example.com", "example.org"));
    }

    #[test]
    fn test_wildcard_covers_exactly_one_label() {
        assert!(matches_host("*.example.com", "www.example.com"));
        assert!(!matches_host("*.example.com", "example.com"));
        assert!(!matches_host("*.example.com", "a.b.example.com"));
        assert!(matches_host("www.*.com", "www.example.com"));
    }

    #[test]
    fn test_wildcard_rejects_partial_and_multiple() {
        assert!(!matches_host("w*.example.com", "www.example.com"));
        assert!(!matches_host("*.*.example.com", "a.b.example.com"));
        assert!(!matches_host("", "example.com"));
        assert!(!matches_host("*.example.com", ".example.com"));
    }

    #[test]
    fn test_san_wildcard_match_with_expiring_cert() {
        // Leaf CN does not match, SAN wildcard does, expires in 10 days
        let chain = vec![
            leaf("other.example", &["*.example.com"], 10, false),
            leaf("Intermediate", &[], 400, false),
        ];
        let report = analyze(Some(&state("www.example.com", chain)), false, now()).unwrap();

        assert_eq!(report.name_match, NameMatch::SubjectAltName(0));
        assert!(matches!(report.validity, Validity::ExpiringSoon { .. }));
        assert!((report.validity.days() - 10.0).abs() < 1e-9);
        assert_eq!(report.chain_status, ChainStatus::SentByPeer);
    }

    #[test]
    fn test_self_signed_single_cert_chain() {
        let chain = vec![leaf("selfsigned.test", &[], 200, true)];
        let report = analyze(Some(&state("selfsigned.test", chain)), false, now()).unwrap();

        assert_eq!(report.chain_status, ChainStatus::SelfSigned);
        assert_eq!(report.name_match, NameMatch::CommonName);
        assert!(matches!(report.validity, Validity::Valid { .. }));
        assert!(report.verified_chains.is_empty());
    }

    #[test]
    fn test_chain_status_precedence() {
        let ca = leaf("a", &[], 100, true);
        let plain = leaf("a", &[], 100, false);
        assert_eq!(ChainStatus::classify(&ca, 1, true), ChainStatus::SelfSigned);
        assert_eq!(ChainStatus::classify(&plain, 1, true), ChainStatus::TrustForced);
        assert_eq!(ChainStatus::classify(&plain, 1, false), ChainStatus::Incomplete);
        assert_eq!(ChainStatus::classify(&plain, 3, false), ChainStatus::SentByPeer);
    }

    #[test]
    fn test_expired_certificate() {
        let chain = vec![leaf("example.com", &[], -3, false), leaf("ca", &[], 100, false)];
        let report = analyze(Some(&state("example.com", chain)), false, now()).unwrap();
        assert!(matches!(report.validity, Validity::Expired { days } if days < 0.0));
    }

    #[test]
    fn test_unmatched_name() {
        let chain = vec![leaf("a.example", &["b.example", "*.c.example"], 100, false)];
        let report = analyze(Some(&state("d.example", chain)), false, now()).unwrap();
        assert_eq!(report.name_match, NameMatch::Unmatched);
        assert!(!report.name_match.is_match());
    }

    #[test]
    fn test_common_name_checked_before_sans() {
        let chain = vec![leaf("www.example.com", &["www.example.com"], 100, false)];
        let report = analyze(Some(&state("www.example.com", chain)), false, now()).unwrap();
        assert_eq!(report.name_match, NameMatch::CommonName);
    }

    #[test]
    fn test_no_tls_state_yields_no_report() {
        assert!(analyze(None, false, now()).is_none());
        assert!(analyze(Some(&state("example.com", vec![])), false, now()).is_none());
    }

    #[test]
    fn test_analysis_is_repeatable() {
        let tls = state("www.example.com", vec![leaf("www.example.com", &[], 45, false)]);
        let first = analyze(Some(&tls), true, now());
        let second = analyze(Some(&tls), true, now());
        assert_eq!(first, second);
        assert_eq!(first.unwrap().chain_status, ChainStatus::TrustForced);
    }

    #[test]
    fn test_expiry_boundary() {
        assert!(matches!(
            Validity::classify(now() + Duration::days(30), now()),
            Validity::Valid { .. }
        ));
        assert!(matches!(
            Validity::classify(now() + Duration::hours(30 * 24 - 1), now()),
            Validity::ExpiringSoon { .. }
        ));
    }

    fn recorded(host: &str, ders: &[CertificateDer<'_>]) -> TlsState {
        state(host, digest_chain(ders))
    }

    #[test]
    fn test_generated_wildcard_common_name_and_san() {
        let ca = Template::ca("Scenario Issuing CA").self_signed();
        let leaf = Template::leaf("*.example.com", &["api.example.com"]).signed_by(&ca);
        let ders = [leaf.der(), ca.der()];

        let www = analyze(Some(&recorded("www.example.com", &ders)), false, now()).unwrap();
        assert_eq!(www.name_match, NameMatch::CommonName);
        assert_eq!(www.leaf.raw_common_name, "*.example.com");
        assert_eq!(www.peer_chain.len(), 2);
        assert_eq!(www.chain_status, ChainStatus::SentByPeer);
        assert!(matches!(www.validity, Validity::Valid { .. }));

        let api = analyze(Some(&recorded("api.example.com", &ders)), false, now()).unwrap();
        assert_eq!(api.name_match, NameMatch::SubjectAltName(0));

        let other = analyze(Some(&recorded("example.com", &ders)), false, now()).unwrap();
        assert_eq!(other.name_match, NameMatch::Unmatched);
    }

    #[test]
    fn test_generated_certificate_expiry_bands() {
        let ca = Template::ca("Expiry Test CA").self_signed();
        let classify = |until: (i32, u8, u8)| {
            let leaf = Template::leaf("www.example.com", &[])
                .valid((2024, 1, 1), until)
                .signed_by(&ca);
            let tls = recorded("www.example.com", &[leaf.der(), ca.der()]);
            analyze(Some(&tls), false, now()).unwrap().validity
        };

        assert!(matches!(classify((2024, 6, 11)), Validity::ExpiringSoon { .. }));
        assert!(matches!(classify((2024, 5, 31)), Validity::Expired { .. }));
        assert!(matches!(classify((2025, 6, 1)), Validity::Valid { .. }));
        assert!((classify((2024, 6, 11)).days() - 9.5).abs() < 1e-9);
    }

    #[test]
    fn test_generated_self_signed_leaf() {
        let leaf = Template::ca("selfsigned.test").self_signed();
        let report = analyze(Some(&recorded("selfsigned.test", &[leaf.der()])), false, now()).unwrap();
        assert_eq!(report.chain_status, ChainStatus::SelfSigned);
        assert_eq!(report.name_match, NameMatch::CommonName);
    }

    #[test]
    fn test_unparsable_leaf_is_never_replaced_by_its_issuer() {
        let ca = Template::ca("www.example.com").self_signed();
        let ders = [CertificateDer::from(vec![0x30, 0x03, 0x01, 0x02, 0x03]), ca.der()];
        assert!(analyze(Some(&recorded("www.example.com", &ders)), false, now()).is_none());
    }
}
