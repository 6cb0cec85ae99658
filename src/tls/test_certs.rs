//! Certificates generated on the fly for the TLS unit tests.

use rcgen::{
    date_time_ymd, BasicConstraints, Certificate, CertificateParams, DistinguishedName, DnType,
    IsCa, KeyPair,
};
use rustls::pki_types::CertificateDer;

/// A generated certificate together with the key that signs its children.
pub struct Issued {
    pub cert: Certificate,
    pub key: KeyPair,
}

impl Issued {
    pub fn der(&self) -> CertificateDer<'static> {
        self.cert.der().clone()
    }
}

/// Subject and validity of a certificate to generate.
pub struct Template<'a> {
    pub common_name: &'a str,
    pub sans: &'a [&'a str],
    pub organization: Option<&'a str>,
    pub unit: Option<&'a str>,
    pub country: Option<&'a str>,
    pub is_ca: bool,
    /// `(year, month, day)` of notBefore and notAfter
    pub validity: ((i32, u8, u8), (i32, u8, u8)),
}

impl<'a> Template<'a> {
    pub fn leaf(common_name: &'a str, sans: &'a [&'a str]) -> Self {
        Template {
            common_name,
            sans,
            organization: None,
            unit: None,
            country: None,
            is_ca: false,
            validity: ((2024, 1, 1), (2025, 1, 1)),
        }
    }

    pub fn ca(common_name: &'a str) -> Self {
        Template {
            is_ca: true,
            ..Template::leaf(common_name, &[])
        }
    }

    pub fn valid(mut self, from: (i32, u8, u8), until: (i32, u8, u8)) -> Self {
        self.validity = (from, until);
        self
    }

    fn params(&self) -> CertificateParams {
        let sans: Vec<String> = self.sans.iter().map(|s| s.to_string()).collect();
        let mut params = CertificateParams::new(sans).unwrap();

        let mut name = DistinguishedName::new();
        if let Some(country) = self.country {
            name.push(DnType::CountryName, country);
        }
        if let Some(organization) = self.organization {
            name.push(DnType::OrganizationName, organization);
        }
        if let Some(unit) = self.unit {
            name.push(DnType::OrganizationalUnitName, unit);
        }
        name.push(DnType::CommonName, self.common_name);
        params.distinguished_name = name;

        if self.is_ca {
            params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        }
        let ((fy, fm, fd), (uy, um, ud)) = self.validity;
        params.not_before = date_time_ymd(fy, fm, fd);
        params.not_after = date_time_ymd(uy, um, ud);
        params
    }

    pub fn self_signed(&self) -> Issued {
        let key = KeyPair::generate().unwrap();
        let cert = self.params().self_signed(&key).unwrap();
        Issued { cert, key }
    }

    pub fn signed_by(&self, issuer: &Issued) -> Issued {
        let key = KeyPair::generate().unwrap();
        let cert = self
            .params()
            .signed_by(&key, &issuer.cert, &issuer.key)
            .unwrap();
        Issued { cert, key }
    }
}
