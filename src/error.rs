//! Error types shared by every tlsutils operation.

use thiserror::Error;

use crate::preamble::PemPreamble;

pub type Result<T> = std::result::Result<T, TlsUtilsError>;

/// Represents errors that can occur in the tlsutils library.
///
/// Every operation stops at the first failure and reports it through one of
/// these variants. Parse and crypto failures are deterministic for a given
/// input, so none of them are worth retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TlsUtilsError {
    /// No PEM block could be found in the input.
    #[error("Failed to decode PEM data: {0}")]
    DecodeError(String),

    /// The PEM label is outside the recognized vocabulary.
    #[error("Unsupported PEM preamble/type: {0}")]
    UnsupportedPemType(String),

    /// The PEM label is recognized but not the one the context requires.
    #[error("PEM should be \"{expected}\", got \"{found}\"")]
    WrongPemType {
        expected: PemPreamble,
        found: PemPreamble,
    },

    /// The DER payload is not a structurally valid certificate.
    #[error("Unable to parse certificate: {0}")]
    X509ParseError(String),

    /// The private key could not be decoded or cannot sign.
    #[error("Failed to parse private key PEM: {0}")]
    KeyParseError(String),

    /// A certificate input failed to parse. `index` is set for entries of the
    /// revocation list and unset for the issuer certificate.
    #[error("Unable to parse {}: {source}", describe_certificate_input(.index))]
    CertParseError {
        index: Option<usize>,
        source: Box<TlsUtilsError>,
    },

    /// Symmetric encryption of a PEM block failed.
    #[error("Error encrypting PEM block: {0}")]
    EncryptionError(String),

    /// An encrypted PEM block could not be decrypted.
    #[error("Error decrypting PEM block: {0}")]
    DecryptionError(String),

    /// Building or signing the CRL failed.
    #[error("Unable to create CRL: {0}")]
    CrlBuildError(String),

    /// Error during DER encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),
}

fn describe_certificate_input(index: &Option<usize>) -> String {
    match index {
        Some(index) => format!("revocation_list (element #{index})"),
        None => "certificate_pem".to_string(),
    }
}

impl TlsUtilsError {
    /// Wraps a certificate failure for the issuer certificate input.
    pub fn issuer_certificate(source: TlsUtilsError) -> Self {
        TlsUtilsError::CertParseError {
            index: None,
            source: Box::new(source),
        }
    }

    /// Wraps a certificate failure for the revocation list entry at `index`.
    pub fn revoked_certificate(index: usize, source: TlsUtilsError) -> Self {
        TlsUtilsError::CertParseError {
            index: Some(index),
            source: Box::new(source),
        }
    }
}

impl From<pem::PemError> for TlsUtilsError {
    /// Converts a `pem::PemError` into a `TlsUtilsError`.
    fn from(err: pem::PemError) -> Self {
        TlsUtilsError::DecodeError(err.to_string())
    }
}

impl From<der::Error> for TlsUtilsError {
    /// Converts a `der::Error` raised while building DER structures.
    fn from(err: der::Error) -> Self {
        TlsUtilsError::EncodingError(err.to_string())
    }
}
