pub mod extensions;

use std::time::SystemTime;

use const_oid::ObjectIdentifier;
use const_oid::db::{rfc5912, rfc8410};
use der::{Decode, Encode};
use time::OffsetDateTime;
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;

use crate::error::{Result, TlsUtilsError};
use crate::pem_utils::{decode_pem_block, der_to_pem};
use crate::preamble::{PemPreamble, classify};
use extensions::{KeyUsage, SubjectKeyIdentifier, ToAndFromX509Extension};

/// Represents the supported signature algorithms for certificates and CRLs.
///
/// This enum provides a mapping to the corresponding OIDs for each algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-1 with RSA encryption. Accepted when parsing, never produced.
    Sha1WithRSA,
    /// SHA-256 with RSA encryption.
    Sha256WithRSA,
    /// SHA-384 with RSA encryption.
    Sha384WithRSA,
    /// SHA-512 with RSA encryption.
    Sha512WithRSA,
    /// RSASSA-PSS; parameters are carried in the certificate.
    RsaPss,
    /// SHA-256 with ECDSA.
    Sha256WithECDSA,
    /// SHA-384 with ECDSA.
    Sha384WithECDSA,
    /// SHA-512 with ECDSA.
    Sha512WithECDSA,
    /// Pure EdDSA over Ed25519.
    Ed25519,
}

impl SignatureAlgorithm {
    pub fn oid(&self) -> ObjectIdentifier {
        match self {
            SignatureAlgorithm::Sha1WithRSA => rfc5912::SHA_1_WITH_RSA_ENCRYPTION,
            SignatureAlgorithm::Sha256WithRSA => rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
            SignatureAlgorithm::Sha384WithRSA => rfc5912::SHA_384_WITH_RSA_ENCRYPTION,
            SignatureAlgorithm::Sha512WithRSA => rfc5912::SHA_512_WITH_RSA_ENCRYPTION,
            SignatureAlgorithm::RsaPss => rfc5912::ID_RSASSA_PSS,
            SignatureAlgorithm::Sha256WithECDSA => rfc5912::ECDSA_WITH_SHA_256,
            SignatureAlgorithm::Sha384WithECDSA => rfc5912::ECDSA_WITH_SHA_384,
            SignatureAlgorithm::Sha512WithECDSA => rfc5912::ECDSA_WITH_SHA_512,
            SignatureAlgorithm::Ed25519 => rfc8410::ID_ED_25519,
        }
    }

    /// Looks up a signature algorithm by OID.
    pub fn from_oid(oid: &ObjectIdentifier) -> Result<Self> {
        match *oid {
            rfc5912::SHA_1_WITH_RSA_ENCRYPTION => Ok(SignatureAlgorithm::Sha1WithRSA),
            rfc5912::SHA_256_WITH_RSA_ENCRYPTION => Ok(SignatureAlgorithm::Sha256WithRSA),
            rfc5912::SHA_384_WITH_RSA_ENCRYPTION => Ok(SignatureAlgorithm::Sha384WithRSA),
            rfc5912::SHA_512_WITH_RSA_ENCRYPTION => Ok(SignatureAlgorithm::Sha512WithRSA),
            rfc5912::ID_RSASSA_PSS => Ok(SignatureAlgorithm::RsaPss),
            rfc5912::ECDSA_WITH_SHA_256 => Ok(SignatureAlgorithm::Sha256WithECDSA),
            rfc5912::ECDSA_WITH_SHA_384 => Ok(SignatureAlgorithm::Sha384WithECDSA),
            rfc5912::ECDSA_WITH_SHA_512 => Ok(SignatureAlgorithm::Sha512WithECDSA),
            rfc8410::ID_ED_25519 => Ok(SignatureAlgorithm::Ed25519),
            other => Err(TlsUtilsError::X509ParseError(format!(
                "unsupported signature algorithm {other}"
            ))),
        }
    }
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    /// Converts a `SignatureAlgorithm` into an `AlgorithmIdentifierOwned`.
    ///
    /// RSA PKCS#1 v1.5 identifiers carry an explicit NULL parameter (RFC 4055);
    /// ECDSA and EdDSA identifiers carry none.
    fn from(value: SignatureAlgorithm) -> Self {
        let parameters = match value {
            SignatureAlgorithm::Sha1WithRSA
            | SignatureAlgorithm::Sha256WithRSA
            | SignatureAlgorithm::Sha384WithRSA
            | SignatureAlgorithm::Sha512WithRSA => Some(der::Any::from(der::asn1::AnyRef::NULL)),
            _ => None,
        };
        x509_cert::spki::AlgorithmIdentifierOwned {
            oid: value.oid(),
            parameters,
        }
    }
}

/// Converts an X.509 `Time` into an `OffsetDateTime`.
pub(crate) fn to_offset_date_time(time: x509_cert::time::Time) -> OffsetDateTime {
    OffsetDateTime::from(time.to_system_time())
}

/// Converts an `OffsetDateTime` into an X.509 `Time`, using UTCTime before
/// 2050 and GeneralizedTime afterwards (RFC 5280 §4.1.2.5).
pub(crate) fn to_x509_time(time: OffsetDateTime) -> Result<x509_cert::time::Time> {
    let date_time = der::DateTime::from_system_time(SystemTime::from(time))?;
    if date_time.year() < 2050 {
        Ok(x509_cert::time::Time::UtcTime(
            der::asn1::UtcTime::from_date_time(date_time)?,
        ))
    } else {
        Ok(x509_cert::time::Time::GeneralTime(
            der::asn1::GeneralizedTime::from_date_time(date_time),
        ))
    }
}

/// Represents a parsed X.509 certificate.
///
/// Only structural correctness is checked at parse time; the validity window
/// is exposed but never enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Parses a DER-encoded certificate.
    ///
    /// Fails with `X509ParseError` on malformed DER, on a signature algorithm
    /// outside [`SignatureAlgorithm`], when the inner and outer signature
    /// algorithm identifiers disagree, or when a subject key identifier or key
    /// usage extension cannot be decoded.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = CertificateInner::from_der(der)
            .map_err(|e| TlsUtilsError::X509ParseError(e.to_string()))?;

        SignatureAlgorithm::from_oid(&inner.signature_algorithm.oid)?;
        if inner.signature_algorithm != inner.tbs_certificate.signature {
            return Err(TlsUtilsError::X509ParseError(
                "signature algorithm mismatch between certificate and TBS".to_string(),
            ));
        }

        let certificate = Self { inner };
        certificate.subject_key_id()?;
        certificate.key_usage()?;
        Ok(certificate)
    }

    /// Parses a PEM-encoded certificate. See [`parse_certificate`].
    pub fn from_pem(data: impl AsRef<[u8]>) -> Result<Self> {
        parse_certificate(data)
    }

    /// Encodes the certificate into DER format.
    ///
    /// # Returns
    /// A byte vector containing the DER-encoded certificate.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| TlsUtilsError::EncodingError(e.to_string()))
    }

    /// Encodes the certificate into PEM format.
    ///
    /// # Returns
    /// A string containing the PEM-encoded certificate.
    pub fn to_pem(&self) -> Result<String> {
        Ok(der_to_pem(&self.to_der()?, PemPreamble::Certificate.label()))
    }

    pub fn serial_number(&self) -> &SerialNumber {
        &self.inner.tbs_certificate.serial_number
    }

    pub fn subject(&self) -> &Name {
        &self.inner.tbs_certificate.subject
    }

    pub fn issuer(&self) -> &Name {
        &self.inner.tbs_certificate.issuer
    }

    /// The raw `notBefore` value, preserving its UTCTime/GeneralizedTime form.
    pub fn not_before_time(&self) -> x509_cert::time::Time {
        self.inner.tbs_certificate.validity.not_before
    }

    pub fn not_before(&self) -> OffsetDateTime {
        to_offset_date_time(self.inner.tbs_certificate.validity.not_before)
    }

    pub fn not_after(&self) -> OffsetDateTime {
        to_offset_date_time(self.inner.tbs_certificate.validity.not_after)
    }

    pub fn signature_algorithm(&self) -> Result<SignatureAlgorithm> {
        SignatureAlgorithm::from_oid(&self.inner.signature_algorithm.oid)
    }

    /// DER-encoded `SubjectPublicKeyInfo`.
    pub fn subject_public_key_der(&self) -> Result<Vec<u8>> {
        self.inner
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| TlsUtilsError::EncodingError(e.to_string()))
    }

    /// The subject public key bit string contents.
    pub fn subject_public_key_bytes(&self) -> &[u8] {
        self.inner
            .tbs_certificate
            .subject_public_key_info
            .subject_public_key
            .raw_bytes()
    }

    fn find_extension<E: ToAndFromX509Extension>(&self) -> Result<Option<E>> {
        let Some(extensions) = &self.inner.tbs_certificate.extensions else {
            return Ok(None);
        };
        extensions
            .iter()
            .find(|ext| ext.extn_id == E::OID)
            .map(|ext| {
                E::from_x509_extension_value(ext.extn_value.as_bytes())
                    .map_err(|e| TlsUtilsError::X509ParseError(e.to_string()))
            })
            .transpose()
    }

    pub fn subject_key_id(&self) -> Result<Option<SubjectKeyIdentifier>> {
        self.find_extension()
    }

    pub fn key_usage(&self) -> Result<Option<KeyUsage>> {
        self.find_extension()
    }
}

/// Decodes and validates a PEM block as exactly a certificate.
///
/// * no PEM block → `DecodeError`
/// * label outside the PEM vocabulary → `UnsupportedPemType`
/// * any other known label (certificate request, private key, ...) →
///   `WrongPemType`
/// * malformed DER → `X509ParseError`
pub fn parse_certificate(data: impl AsRef<[u8]>) -> Result<Certificate> {
    let block = decode_pem_block(data)?;

    let preamble = classify(&block)?;
    if preamble != PemPreamble::Certificate {
        return Err(TlsUtilsError::WrongPemType {
            expected: PemPreamble::Certificate,
            found: preamble,
        });
    }

    Certificate::from_der(block.contents())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_algorithm_oids_round_trip() {
        for alg in [
            SignatureAlgorithm::Sha1WithRSA,
            SignatureAlgorithm::Sha256WithRSA,
            SignatureAlgorithm::Sha384WithRSA,
            SignatureAlgorithm::Sha512WithRSA,
            SignatureAlgorithm::RsaPss,
            SignatureAlgorithm::Sha256WithECDSA,
            SignatureAlgorithm::Sha384WithECDSA,
            SignatureAlgorithm::Sha512WithECDSA,
            SignatureAlgorithm::Ed25519,
        ] {
            assert_eq!(SignatureAlgorithm::from_oid(&alg.oid()), Ok(alg));
        }
    }

    #[test]
    fn unknown_signature_algorithm_is_a_parse_error() {
        let md5_with_rsa = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.4");
        assert!(matches!(
            SignatureAlgorithm::from_oid(&md5_with_rsa),
            Err(TlsUtilsError::X509ParseError(_))
        ));
    }

    #[test]
    fn rsa_identifiers_carry_null_parameters() {
        let rsa: x509_cert::spki::AlgorithmIdentifierOwned =
            SignatureAlgorithm::Sha256WithRSA.into();
        assert!(rsa.parameters.is_some());
        let ecdsa: x509_cert::spki::AlgorithmIdentifierOwned =
            SignatureAlgorithm::Sha256WithECDSA.into();
        assert!(ecdsa.parameters.is_none());
    }

    #[test]
    fn request_and_key_blocks_are_the_wrong_type() {
        for (label, preamble) in [
            ("CERTIFICATE REQUEST", PemPreamble::CertificateRequest),
            ("PRIVATE KEY", PemPreamble::PrivateKeyPkcs8),
            ("X509 CRL", PemPreamble::Crl),
        ] {
            let pem = der_to_pem(&[0x30, 0x00], label);
            assert_eq!(
                parse_certificate(pem),
                Err(TlsUtilsError::WrongPemType {
                    expected: PemPreamble::Certificate,
                    found: preamble,
                })
            );
        }
    }

    #[test]
    fn malformed_der_is_an_x509_error() {
        let pem = der_to_pem(&[0x30, 0x03, 0x02, 0x01, 0x01], "CERTIFICATE");
        assert!(matches!(
            parse_certificate(pem),
            Err(TlsUtilsError::X509ParseError(_))
        ));
    }

    #[test]
    fn unknown_label_is_unsupported() {
        let pem = der_to_pem(&[0x30, 0x00], "TRUSTED CERTIFICATE");
        assert_eq!(
            parse_certificate(pem),
            Err(TlsUtilsError::UnsupportedPemType(
                "TRUSTED CERTIFICATE".to_string()
            ))
        );
    }

    #[test]
    fn x509_time_conversion_keeps_whole_seconds() {
        let instant = OffsetDateTime::from_unix_timestamp(1_704_067_200).unwrap();
        let time = to_x509_time(instant).unwrap();
        assert!(matches!(time, x509_cert::time::Time::UtcTime(_)));
        assert_eq!(to_offset_date_time(time), instant);

        let far = OffsetDateTime::from_unix_timestamp(2_556_144_000).unwrap(); // 2051-01-01
        assert!(matches!(
            to_x509_time(far).unwrap(),
            x509_cert::time::Time::GeneralTime(_)
        ));
    }
}
