//! PEM preamble classification.
//!
//! The preamble is the label between the `-----BEGIN ` and `-----` markers of
//! a PEM block ("encapsulation boundary" in RFC 1421, "label" in RFC 7468).
//! Only a fixed vocabulary is recognized; any other label is rejected.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TlsUtilsError};

/// The kinds of PEM-encoded documents this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PemPreamble {
    PublicKey,
    /// PKCS#8 `PrivateKeyInfo`.
    PrivateKeyPkcs8,
    /// PKCS#1 `RSAPrivateKey`.
    PrivateKeyRsa,
    /// SEC1 `ECPrivateKey`.
    PrivateKeyEc,
    PrivateKeyOpenSsh,
    Certificate,
    CertificateRequest,
    Crl,
}

/// Label → kind lookup table. Classification is a scan of this table, so a
/// label that is not listed here cannot produce a `PemPreamble`.
const PREAMBLES: [(&str, PemPreamble); 8] = [
    ("PUBLIC KEY", PemPreamble::PublicKey),
    ("PRIVATE KEY", PemPreamble::PrivateKeyPkcs8),
    ("RSA PRIVATE KEY", PemPreamble::PrivateKeyRsa),
    ("EC PRIVATE KEY", PemPreamble::PrivateKeyEc),
    ("OPENSSH PRIVATE KEY", PemPreamble::PrivateKeyOpenSsh),
    ("CERTIFICATE", PemPreamble::Certificate),
    ("CERTIFICATE REQUEST", PemPreamble::CertificateRequest),
    ("X509 CRL", PemPreamble::Crl),
];

impl PemPreamble {
    /// Every recognized preamble, in table order.
    pub const ALL: [PemPreamble; 8] = [
        PemPreamble::PublicKey,
        PemPreamble::PrivateKeyPkcs8,
        PemPreamble::PrivateKeyRsa,
        PemPreamble::PrivateKeyEc,
        PemPreamble::PrivateKeyOpenSsh,
        PemPreamble::Certificate,
        PemPreamble::CertificateRequest,
        PemPreamble::Crl,
    ];

    /// Looks up the preamble for a PEM label. Matching is exact and
    /// case-sensitive.
    pub fn from_label(label: &str) -> Result<Self> {
        PREAMBLES
            .iter()
            .find(|(candidate, _)| *candidate == label)
            .map(|(_, preamble)| *preamble)
            .ok_or_else(|| TlsUtilsError::UnsupportedPemType(label.to_string()))
    }

    /// The PEM label for this preamble.
    pub fn label(self) -> &'static str {
        PREAMBLES
            .iter()
            .find(|(_, preamble)| *preamble == self)
            .map(|(label, _)| *label)
            .unwrap_or_default()
    }

    /// Whether the preamble denotes a private key of any encoding.
    pub fn is_private_key(self) -> bool {
        matches!(
            self,
            PemPreamble::PrivateKeyPkcs8
                | PemPreamble::PrivateKeyRsa
                | PemPreamble::PrivateKeyEc
                | PemPreamble::PrivateKeyOpenSsh
        )
    }
}

impl fmt::Display for PemPreamble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PemPreamble {
    type Err = TlsUtilsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s)
    }
}

/// Classifies a decoded PEM block by its label.
pub fn classify(block: &pem::Pem) -> Result<PemPreamble> {
    PemPreamble::from_label(block.tag())
}
