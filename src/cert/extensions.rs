use const_oid::AssociatedOid;
use der::{Decode, Encode, asn1::OctetString, oid::ObjectIdentifier};

use crate::error::{Result, TlsUtilsError};

/// Trait for converting to and from X.509 extensions.
///
/// This trait provides methods to encode and decode X.509 extension values.
///
/// # Example
/// ```
/// use tlsutils::cert::extensions::{CrlNumber, ToAndFromX509Extension};
/// let number = CrlNumber { number: 1_704_067_200 };
/// let encoded = number.to_x509_extension_value().unwrap();
/// let decoded = CrlNumber::from_x509_extension_value(&encoded).unwrap();
/// assert_eq!(number.number, decoded.number);
/// ```
pub trait ToAndFromX509Extension {
    /// The Object Identifier (OID) for the extension.
    const OID: ObjectIdentifier;

    /// Encodes the extension into a DER-encoded byte vector.
    fn to_x509_extension_value(&self) -> Result<Vec<u8>>;

    /// Decodes the extension from a DER-encoded byte slice.
    fn from_x509_extension_value(extension: &[u8]) -> Result<Self>
    where
        Self: Sized;
}

fn decode_error(err: der::Error) -> TlsUtilsError {
    TlsUtilsError::X509ParseError(err.to_string())
}

/// The CRL Number extension (RFC 5280 §5.2.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrlNumber {
    pub number: u64,
}

impl ToAndFromX509Extension for CrlNumber {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::crl::CrlNumber::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let number = der::asn1::Uint::new(&self.number.to_be_bytes())?;
        Ok(x509_cert::ext::pkix::crl::CrlNumber(number).to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let crl_number =
            x509_cert::ext::pkix::crl::CrlNumber::from_der(extension).map_err(decode_error)?;
        let bytes = crl_number.0.as_bytes();
        let significant = bytes
            .iter()
            .position(|b| *b != 0)
            .map_or(&[][..], |start| &bytes[start..]);
        if significant.len() > 8 {
            return Err(TlsUtilsError::X509ParseError(
                "CRL number does not fit in 64 bits".to_string(),
            ));
        }
        let mut buf = [0u8; 8];
        buf[8 - significant.len()..].copy_from_slice(significant);
        Ok(Self {
            number: u64::from_be_bytes(buf),
        })
    }
}

/// The Authority Key Identifier extension, key identifier form only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Vec<u8>,
}

impl ToAndFromX509Extension for AuthorityKeyIdentifier {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::AuthorityKeyIdentifier::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let aki = x509_cert::ext::pkix::AuthorityKeyIdentifier {
            key_identifier: Some(OctetString::new(self.key_identifier.clone())?),
            authority_cert_issuer: None,
            authority_cert_serial_number: None,
        };
        Ok(aki.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let aki = x509_cert::ext::pkix::AuthorityKeyIdentifier::from_der(extension)
            .map_err(decode_error)?;
        let key_identifier = aki
            .key_identifier
            .map(|id| id.as_bytes().to_vec())
            .ok_or_else(|| {
                TlsUtilsError::X509ParseError(
                    "authority key identifier has no key identifier".to_string(),
                )
            })?;
        Ok(Self { key_identifier })
    }
}

/// The Subject Key Identifier extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectKeyIdentifier {
    pub key_identifier: Vec<u8>,
}

impl ToAndFromX509Extension for SubjectKeyIdentifier {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectKeyIdentifier::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let ski =
            x509_cert::ext::pkix::SubjectKeyIdentifier(OctetString::new(self.key_identifier.clone())?);
        Ok(ski.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let ski = x509_cert::ext::pkix::SubjectKeyIdentifier::from_der(extension)
            .map_err(decode_error)?;
        Ok(Self {
            key_identifier: ski.0.as_bytes().to_vec(),
        })
    }
}

pub use der::flagset::FlagSet;
use x509_cert::ext::pkix::KeyUsage as X509KeyUsage;
pub use x509_cert::ext::pkix::KeyUsages;

/// Represents the Key Usage extension.
///
/// This extension defines the purpose of the key contained in the certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUsage(pub FlagSet<KeyUsages>);

impl KeyUsage {
    pub fn allows_crl_signing(&self) -> bool {
        self.0.contains(KeyUsages::CRLSign)
    }
}

impl ToAndFromX509Extension for KeyUsage {
    const OID: ObjectIdentifier = X509KeyUsage::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        Ok(X509KeyUsage(self.0).to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let key_usage = X509KeyUsage::from_der(extension).map_err(decode_error)?;
        Ok(Self(key_usage.0))
    }
}

/// Represents an X.509 extension.
///
/// This struct contains the OID, criticality, and value of an extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    ///
    /// # Arguments
    /// * `extension` - The extension to encode.
    /// * `critical` - Indicates if the extension is critical.
    pub fn from_extension<E: ToAndFromX509Extension>(extension: &E, critical: bool) -> Result<Self> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }

    /// Decodes an `ExtensionParam` into a specific extension.
    pub fn to_extension<E: ToAndFromX509Extension>(&self) -> Result<E> {
        E::from_x509_extension_value(&self.value)
    }

    pub fn to_x509_extension(&self) -> Result<x509_cert::ext::Extension> {
        Ok(x509_cert::ext::Extension {
            extn_id: self.oid,
            critical: self.critical,
            extn_value: OctetString::new(self.value.clone())?,
        })
    }

    pub fn from_x509_extension(extension: &x509_cert::ext::Extension) -> Self {
        Self {
            oid: extension.extn_id,
            critical: extension.critical,
            value: extension.extn_value.as_bytes().to_vec(),
        }
    }
}
