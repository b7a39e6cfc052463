//! Certificate Revocation List synthesis.
//!
//! A CRL is built from three textual inputs: the issuer's private key, the
//! issuer's certificate and an ordered list of certificates to revoke. The
//! output is a signed, PEM-encoded `X509 CRL` plus an [`Identity`] over the
//! inputs that the orchestration host uses to skip regeneration when nothing
//! changed.
//!
//! # Known simplifications
//!
//! * The revocation time of each entry is the revoked certificate's own
//!   `notBefore`, not the moment it was revoked. This is kept for
//!   compatibility with CRLs already produced by the provider.
//! * The CRL Number defaults to the wall-clock time in whole seconds since
//!   the epoch. Two syntheses within the same second, or across a clock step
//!   backwards, do not get increasing numbers. Set [`CrlParams::number`] when
//!   a strictly monotonic sequence is required.

pub mod tbs_cert_list;

use bon::Builder;
use der::{Decode, Encode};
use time::{Duration, OffsetDateTime};
use x509_cert::crl::CertificateList;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;

use crate::cert::extensions::{
    AuthorityKeyIdentifier, CrlNumber, ExtensionParam, ToAndFromX509Extension,
};
use crate::cert::{Certificate, parse_certificate, to_offset_date_time};
use crate::error::{Result, TlsUtilsError};
use crate::identity::{self, Identity};
use crate::issuer::{CertificateWithPrivateKey, Issuer};
use crate::key::parse_private_key_pem;
use crate::pem_utils::{decode_pem_block, der_to_pem};
use crate::preamble::{PemPreamble, classify};
use tbs_cert_list::TbsCertList;

/// How long after `this_update` a CRL advertises its next update by default.
pub const DEFAULT_NEXT_UPDATE_DAYS: i64 = 7;

/// One revoked certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationEntry {
    pub serial_number: SerialNumber,
    pub revocation_time: x509_cert::time::Time,
}

impl RevocationEntry {
    /// Revokes `certificate`, using its `notBefore` as the revocation time.
    pub fn from_certificate(certificate: &Certificate) -> Self {
        Self {
            serial_number: certificate.serial_number().clone(),
            revocation_time: certificate.not_before_time(),
        }
    }

    pub fn revocation_time_utc(&self) -> OffsetDateTime {
        to_offset_date_time(self.revocation_time)
    }
}

/// Tunables for CRL synthesis.
///
/// ```
/// use tlsutils::crl::CrlParams;
/// let params = CrlParams::builder().number(42).build();
/// assert_eq!(params.crl_number(), 42);
/// ```
#[derive(Clone, Debug, Builder)]
pub struct CrlParams {
    /// Explicit CRL Number. When unset, `this_update` in seconds since the
    /// epoch is used.
    pub number: Option<u64>,
    #[builder(default = OffsetDateTime::now_utc())]
    pub this_update: OffsetDateTime,
    /// Offset of `nextUpdate` from `this_update`.
    #[builder(default = Duration::days(DEFAULT_NEXT_UPDATE_DAYS))]
    pub next_update_after: Duration,
}

impl Default for CrlParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CrlParams {
    /// The CRL Number this synthesis will use.
    pub fn crl_number(&self) -> u64 {
        self.number
            .unwrap_or_else(|| u64::try_from(self.this_update.unix_timestamp()).unwrap_or_default())
    }

    pub fn next_update(&self) -> OffsetDateTime {
        self.this_update + self.next_update_after
    }
}

/// A signed X.509 CRL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRevocationList {
    /// The inner representation of the CRL.
    pub inner: CertificateList,
}

impl CertificateRevocationList {
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner =
            CertificateList::from_der(der).map_err(|e| TlsUtilsError::DecodeError(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Parses a PEM block that must be labeled `X509 CRL`.
    pub fn from_pem(data: impl AsRef<[u8]>) -> Result<Self> {
        let block = decode_pem_block(data)?;
        let preamble = classify(&block)?;
        if preamble != PemPreamble::Crl {
            return Err(TlsUtilsError::WrongPemType {
                expected: PemPreamble::Crl,
                found: preamble,
            });
        }
        Self::from_der(block.contents())
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| TlsUtilsError::EncodingError(e.to_string()))
    }

    pub fn to_pem(&self) -> Result<String> {
        Ok(der_to_pem(&self.to_der()?, PemPreamble::Crl.label()))
    }

    pub fn issuer(&self) -> &Name {
        &self.inner.tbs_cert_list.issuer
    }

    pub fn this_update(&self) -> OffsetDateTime {
        to_offset_date_time(self.inner.tbs_cert_list.this_update)
    }

    pub fn next_update(&self) -> Option<OffsetDateTime> {
        self.inner.tbs_cert_list.next_update.map(to_offset_date_time)
    }

    /// Revoked entries in the order they appear in the CRL.
    pub fn revoked_entries(&self) -> Vec<RevocationEntry> {
        self.inner
            .tbs_cert_list
            .revoked_certificates
            .iter()
            .flatten()
            .map(|revoked| RevocationEntry {
                serial_number: revoked.serial_number.clone(),
                revocation_time: revoked.revocation_date,
            })
            .collect()
    }

    /// The CRL Number extension, if present.
    pub fn number(&self) -> Result<Option<u64>> {
        self.inner
            .tbs_cert_list
            .crl_extensions
            .iter()
            .flatten()
            .find(|ext| ext.extn_id == CrlNumber::OID)
            .map(|ext| CrlNumber::from_x509_extension_value(ext.extn_value.as_bytes()))
            .transpose()
            .map(|number| number.map(|n| n.number))
    }

    /// The TBS portion in this crate's representation.
    pub fn tbs(&self) -> Result<TbsCertList> {
        TbsCertList::from_tbs_cert_list_inner(&self.inner.tbs_cert_list)
    }

    /// The DER bytes the signature covers.
    pub fn tbs_der(&self) -> Result<Vec<u8>> {
        self.inner
            .tbs_cert_list
            .to_der()
            .map_err(|e| TlsUtilsError::EncodingError(e.to_string()))
    }

    pub fn signature(&self) -> &[u8] {
        self.inner.signature.raw_bytes()
    }
}

/// Output of [`synthesize_crl`].
#[derive(Debug, Clone)]
pub struct CrlArtifact {
    pub crl: CertificateRevocationList,
    pub crl_pem: String,
    /// Hash of the inputs; independent of the clock.
    pub identity: Identity,
}

/// Identity of a CRL resource: SHA-1 over the private key PEM, the issuer
/// certificate PEM and every revoked certificate PEM, in that order.
///
/// Rendered with [`Identity::to_base64`] when stored as a resource id.
pub fn crl_identity<S: AsRef<str>>(
    private_key_pem: &str,
    certificate_pem: &str,
    revocation_list: &[S],
) -> Identity {
    identity::hash(
        [private_key_pem, certificate_pem]
            .into_iter()
            .chain(revocation_list.iter().map(|pem| pem.as_ref())),
    )
}

/// Parses every entry of `revocation_list` as a certificate, reporting the
/// index of the first one that fails.
pub fn parse_revocation_list<S: AsRef<str>>(
    revocation_list: &[S],
) -> Result<Vec<RevocationEntry>> {
    revocation_list
        .iter()
        .enumerate()
        .map(|(index, pem)| {
            parse_certificate(pem.as_ref())
                .map(|certificate| RevocationEntry::from_certificate(&certificate))
                .map_err(|e| TlsUtilsError::revoked_certificate(index, e))
        })
        .collect()
}

/// Builds and signs a CRL with default [`CrlParams`].
pub fn synthesize_crl<S: AsRef<str>>(
    private_key_pem: &str,
    certificate_pem: &str,
    revocation_list: &[S],
) -> Result<CrlArtifact> {
    synthesize_crl_with_params(
        private_key_pem,
        certificate_pem,
        revocation_list,
        &CrlParams::default(),
    )
}

/// Builds and signs a CRL.
///
/// Fails with `KeyParseError` for an unusable issuer key, `CertParseError`
/// for an unparsable issuer certificate (no index) or revoked certificate
/// (with its index), and `CrlBuildError` when the key cannot sign for the
/// issuer certificate.
pub fn synthesize_crl_with_params<S: AsRef<str>>(
    private_key_pem: &str,
    certificate_pem: &str,
    revocation_list: &[S],
    params: &CrlParams,
) -> Result<CrlArtifact> {
    let (key, key_kind) = parse_private_key_pem(private_key_pem)?;
    tracing::debug!(algorithm = %key.algorithm(), pem_type = %key_kind, "parsed issuer key");

    let cert = parse_certificate(certificate_pem).map_err(TlsUtilsError::issuer_certificate)?;
    let revoked = parse_revocation_list(revocation_list)?;

    let issuer = CertificateWithPrivateKey { cert, key };
    let crl = issuer.issue_crl(&revoked, params)?;
    let crl_pem = crl.to_pem()?;
    let identity = crl_identity(private_key_pem, certificate_pem, revocation_list);

    tracing::debug!(
        revoked = revoked.len(),
        number = params.crl_number(),
        "synthesized CRL"
    );

    Ok(CrlArtifact {
        crl,
        crl_pem,
        identity,
    })
}

/// Builds the CRL Number and AuthorityKeyIdentifier extensions.
pub(crate) fn crl_extensions(
    authority_key_id: Vec<u8>,
    params: &CrlParams,
) -> Result<Vec<ExtensionParam>> {
    Ok(vec![
        ExtensionParam::from_extension(
            &AuthorityKeyIdentifier {
                key_identifier: authority_key_id,
            },
            false,
        )?,
        ExtensionParam::from_extension(
            &CrlNumber {
                number: params.crl_number(),
            },
            false,
        )?,
    ])
}
