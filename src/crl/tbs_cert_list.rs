use der::Encode;
use time::OffsetDateTime;
use x509_cert::Version;
use x509_cert::crl::{RevokedCert, TbsCertList as TbsCertListInner};
use x509_cert::name::Name;

use crate::cert::extensions::ExtensionParam;
use crate::cert::{SignatureAlgorithm, to_offset_date_time, to_x509_time};
use crate::crl::RevocationEntry;
use crate::error::{Result, TlsUtilsError};

/// Represents the "To Be Signed" (TBS) portion of an X.509 CRL.
///
/// # Fields
/// * `signature_algorithm` - The algorithm the issuer signs the CRL with.
/// * `issuer` - The issuer certificate's subject name.
/// * `this_update` - When this CRL was issued.
/// * `next_update` - When the next CRL is expected, if advertised.
/// * `revoked` - Revoked certificates, in issue order.
/// * `extensions` - CRL extensions (AuthorityKeyIdentifier, CRLNumber).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TbsCertList {
    pub signature_algorithm: SignatureAlgorithm,
    pub issuer: Name,
    pub this_update: OffsetDateTime,
    pub next_update: Option<OffsetDateTime>,
    pub revoked: Vec<RevocationEntry>,
    pub extensions: Vec<ExtensionParam>,
}

impl TbsCertList {
    /// Converts the `TbsCertList` into the `x509_cert` form for DER encoding.
    ///
    /// The CRL is always v2 because it always carries extensions. An empty
    /// revocation list omits the `revokedCertificates` field entirely.
    pub fn to_tbs_cert_list_inner(&self) -> Result<TbsCertListInner> {
        let revoked_certificates: Vec<RevokedCert> = self
            .revoked
            .iter()
            .map(|entry| RevokedCert {
                serial_number: entry.serial_number.clone(),
                revocation_date: entry.revocation_time,
                crl_entry_extensions: None,
            })
            .collect();

        let crl_extensions = self
            .extensions
            .iter()
            .map(ExtensionParam::to_x509_extension)
            .collect::<Result<Vec<_>>>()?;

        let tbs: TbsCertListInner = TbsCertListInner {
            version: Version::V2,
            signature: self.signature_algorithm.into(),
            issuer: self.issuer.clone(),
            this_update: to_x509_time(self.this_update)?,
            next_update: self.next_update.map(to_x509_time).transpose()?,
            revoked_certificates: (!revoked_certificates.is_empty())
                .then_some(revoked_certificates),
            crl_extensions: (!crl_extensions.is_empty()).then_some(crl_extensions),
        };
        Ok(tbs)
    }

    /// Creates a `TbsCertList` from its `x509_cert` form.
    ///
    /// Fails with `X509ParseError` when the signature algorithm is not one
    /// this crate knows.
    pub fn from_tbs_cert_list_inner(inner: &TbsCertListInner) -> Result<Self> {
        let signature_algorithm = SignatureAlgorithm::from_oid(&inner.signature.oid)?;

        let revoked = inner
            .revoked_certificates
            .iter()
            .flatten()
            .map(|revoked| RevocationEntry {
                serial_number: revoked.serial_number.clone(),
                revocation_time: revoked.revocation_date,
            })
            .collect();

        let extensions = inner
            .crl_extensions
            .iter()
            .flatten()
            .map(ExtensionParam::from_x509_extension)
            .collect();

        Ok(Self {
            signature_algorithm,
            issuer: inner.issuer.clone(),
            this_update: to_offset_date_time(inner.this_update),
            next_update: inner.next_update.map(to_offset_date_time),
            revoked,
            extensions,
        })
    }

    /// Encodes the `TbsCertList` into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.to_tbs_cert_list_inner()?
            .to_der()
            .map_err(|e| TlsUtilsError::EncodingError(e.to_string()))
    }
}
