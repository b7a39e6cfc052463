use der::{Decode, Encode};
use sha1::{Digest, Sha1};
use x509_cert::crl::CertificateList;
use x509_cert::name::Name;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::cert::Certificate;
use crate::crl::tbs_cert_list::TbsCertList;
use crate::crl::{CertificateRevocationList, CrlParams, RevocationEntry, crl_extensions};
use crate::error::{Result, TlsUtilsError};
use crate::key::KeyPair;

/// Represents an entity capable of issuing CRLs.
///
/// This trait provides methods to retrieve issuer details and sign CRLs.
pub trait Issuer {
    /// Returns the distinguished name of the issuer.
    fn issuer_name(&self) -> Name;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Returns the key identifier placed in the CRL's AuthorityKeyIdentifier.
    fn authority_key_id(&self) -> Result<Vec<u8>>;

    /// Checks that the issuer may sign CRLs with its key.
    fn check_crl_signer(&self) -> Result<()> {
        Ok(())
    }

    /// Issues a CRL listing `revoked`, in the given order.
    ///
    /// # Arguments
    /// * `revoked` - The entries to list.
    /// * `params` - CRL Number and update times.
    fn issue_crl(
        &self,
        revoked: &[RevocationEntry],
        params: &CrlParams,
    ) -> Result<CertificateRevocationList> {
        self.check_crl_signer()?;

        let signature_algorithm = self.signing_key().signature_algorithm();
        let tbs = TbsCertList {
            signature_algorithm,
            issuer: self.issuer_name(),
            this_update: params.this_update,
            next_update: Some(params.next_update()),
            revoked: revoked.to_vec(),
            extensions: crl_extensions(self.authority_key_id()?, params)?,
        };

        let tbs_inner = tbs
            .to_tbs_cert_list_inner()
            .map_err(|e| TlsUtilsError::CrlBuildError(e.to_string()))?;
        let tbs_der = tbs_inner
            .to_der()
            .map_err(|e| TlsUtilsError::CrlBuildError(e.to_string()))?;
        let signature = self.signing_key().sign_data(&tbs_der)?;

        let inner: CertificateList = CertificateList {
            tbs_cert_list: tbs_inner,
            signature_algorithm: signature_algorithm.into(),
            signature: der::asn1::BitString::from_bytes(&signature)
                .map_err(|e| TlsUtilsError::CrlBuildError(e.to_string()))?,
        };

        Ok(CertificateRevocationList { inner })
    }
}

/// An issuer certificate together with its private key.
#[derive(Debug)]
pub struct CertificateWithPrivateKey {
    pub cert: Certificate,
    pub key: KeyPair,
}

impl Issuer for CertificateWithPrivateKey {
    fn issuer_name(&self) -> Name {
        // The name of the issuer is the subject of the certificate
        self.cert.subject().clone()
    }

    fn signing_key(&self) -> &KeyPair {
        &self.key
    }

    /// The certificate's subject key identifier, or the SHA-1 of its public
    /// key bits when the certificate has none (RFC 5280 §4.2.1.2, method 1).
    fn authority_key_id(&self) -> Result<Vec<u8>> {
        if let Some(ski) = self.cert.subject_key_id()? {
            return Ok(ski.key_identifier);
        }
        Ok(Sha1::digest(self.cert.subject_public_key_bytes()).to_vec())
    }

    /// The key must be the certificate's key, and a certificate that restricts
    /// key usage must allow `cRLSign`.
    fn check_crl_signer(&self) -> Result<()> {
        let key_spki = SubjectPublicKeyInfoOwned::from_der(&self.key.public_key_der()?)
            .map_err(|e| TlsUtilsError::CrlBuildError(e.to_string()))?;
        if key_spki.subject_public_key.raw_bytes() != self.cert.subject_public_key_bytes() {
            return Err(TlsUtilsError::CrlBuildError(
                "private key does not match the issuer certificate's public key".to_string(),
            ));
        }
        if let Some(usage) = self.cert.key_usage()? {
            if !usage.allows_crl_signing() {
                return Err(TlsUtilsError::CrlBuildError(
                    "issuer certificate key usage does not permit CRL signing".to_string(),
                ));
            }
        }
        Ok(())
    }
}
