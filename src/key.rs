use std::fmt;

use const_oid::ObjectIdentifier;
use const_oid::db::{rfc5912, rfc8410};
use ed25519_dalek::SigningKey as Ed25519SigningKey;
use p256::ecdsa::{SigningKey as P256SigningKey, VerifyingKey as P256VerifyingKey};
use p384::ecdsa::{SigningKey as P384SigningKey, VerifyingKey as P384VerifyingKey};
use p521::ecdsa::SigningKey as P521SigningKey;
use pkcs8::{DecodePrivateKey, EncodePublicKey};
use rand_core::OsRng;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey as RsaSigningKey;
use rsa::signature::{RandomizedSigner, SignatureEncoding, Signer};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::cert::SignatureAlgorithm;
use crate::error::{Result, TlsUtilsError};
use crate::pem_utils::decode_pem_block;
use crate::preamble::{PemPreamble, classify};

/// Key algorithm families, named the way resource diagnostics report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Rsa,
    Ecdsa(EcdsaCurve),
    Ed25519,
}

/// Supported ECDSA curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcdsaCurve {
    P256,
    P384,
    P521,
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAlgorithm::Rsa => f.write_str("RSA"),
            KeyAlgorithm::Ecdsa(_) => f.write_str("ECDSA"),
            KeyAlgorithm::Ed25519 => f.write_str("ED25519"),
        }
    }
}

impl fmt::Display for EcdsaCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcdsaCurve::P256 => f.write_str("P256"),
            EcdsaCurve::P384 => f.write_str("P384"),
            EcdsaCurve::P521 => f.write_str("P521"),
        }
    }
}

/// Signing-capable private keys.
pub enum KeyPair {
    Rsa {
        private: Box<RsaPrivateKey>,
        public: RsaPublicKey,
    },
    EcdsaP256 {
        signing_key: P256SigningKey,
        verifying_key: P256VerifyingKey,
    },
    EcdsaP384 {
        signing_key: P384SigningKey,
        verifying_key: P384VerifyingKey,
    },
    EcdsaP521 {
        signing_key: P521SigningKey,
        public_key: p521::PublicKey,
    },
    Ed25519 {
        signing_key: Ed25519SigningKey,
    },
}

// Key material stays out of Debug output.
impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}

fn key_error(err: impl fmt::Display) -> TlsUtilsError {
    TlsUtilsError::KeyParseError(err.to_string())
}

impl KeyPair {
    fn from_rsa(private: RsaPrivateKey) -> Self {
        let public = RsaPublicKey::from(&private);
        KeyPair::Rsa {
            private: Box::new(private),
            public,
        }
    }

    fn from_p256(signing_key: P256SigningKey) -> Self {
        let verifying_key = *signing_key.verifying_key();
        KeyPair::EcdsaP256 {
            signing_key,
            verifying_key,
        }
    }

    fn from_p384(signing_key: P384SigningKey) -> Self {
        let verifying_key = *signing_key.verifying_key();
        KeyPair::EcdsaP384 {
            signing_key,
            verifying_key,
        }
    }

    fn from_p521(secret: p521::SecretKey) -> Result<Self> {
        let signing_key = P521SigningKey::from_bytes(&secret.to_bytes()).map_err(key_error)?;
        Ok(KeyPair::EcdsaP521 {
            signing_key,
            public_key: secret.public_key(),
        })
    }

    /// Import a PKCS#8 `PrivateKeyInfo`, dispatching on its algorithm OID.
    pub fn import_from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let info = pkcs8::PrivateKeyInfo::try_from(der).map_err(key_error)?;
        let oid = info.algorithm.oid;

        if oid == rfc5912::RSA_ENCRYPTION {
            return RsaPrivateKey::from_pkcs8_der(der)
                .map(Self::from_rsa)
                .map_err(key_error);
        }
        if oid == rfc8410::ID_ED_25519 {
            let signing_key = Ed25519SigningKey::from_pkcs8_der(der).map_err(key_error)?;
            return Ok(KeyPair::Ed25519 { signing_key });
        }
        if oid == rfc5912::ID_EC_PUBLIC_KEY {
            let curve = info.algorithm.parameters_oid().map_err(key_error)?;
            return match curve {
                rfc5912::SECP_256_R_1 => P256SigningKey::from_pkcs8_der(der)
                    .map(Self::from_p256)
                    .map_err(key_error),
                rfc5912::SECP_384_R_1 => P384SigningKey::from_pkcs8_der(der)
                    .map(Self::from_p384)
                    .map_err(key_error),
                rfc5912::SECP_521_R_1 => p521::SecretKey::from_pkcs8_der(der)
                    .map_err(key_error)
                    .and_then(Self::from_p521),
                other => Err(unsupported_curve(other)),
            };
        }

        Err(TlsUtilsError::KeyParseError(format!(
            "unsupported private key algorithm {oid}"
        )))
    }

    /// Import a PKCS#1 `RSAPrivateKey`.
    pub fn import_from_pkcs1_der(der: &[u8]) -> Result<Self> {
        RsaPrivateKey::from_pkcs1_der(der)
            .map(Self::from_rsa)
            .map_err(key_error)
    }

    /// Import a SEC1 `ECPrivateKey` on P-256, P-384 or P-521.
    pub fn import_from_sec1_der(der: &[u8]) -> Result<Self> {
        if let Ok(secret) = p256::SecretKey::from_sec1_der(der) {
            return Ok(Self::from_p256(P256SigningKey::from(secret)));
        }
        if let Ok(secret) = p384::SecretKey::from_sec1_der(der) {
            return Ok(Self::from_p384(P384SigningKey::from(secret)));
        }
        match p521::SecretKey::from_sec1_der(der) {
            Ok(secret) => Self::from_p521(secret),
            Err(_) => Err(TlsUtilsError::KeyParseError(
                "EC private key is malformed or not on a supported curve (P256, P384, P521)"
                    .to_string(),
            )),
        }
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            KeyPair::Rsa { .. } => KeyAlgorithm::Rsa,
            KeyPair::EcdsaP256 { .. } => KeyAlgorithm::Ecdsa(EcdsaCurve::P256),
            KeyPair::EcdsaP384 { .. } => KeyAlgorithm::Ecdsa(EcdsaCurve::P384),
            KeyPair::EcdsaP521 { .. } => KeyAlgorithm::Ecdsa(EcdsaCurve::P521),
            KeyPair::Ed25519 { .. } => KeyAlgorithm::Ed25519,
        }
    }

    /// The signature algorithm this key produces with [`KeyPair::sign_data`].
    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        match self {
            KeyPair::Rsa { .. } => SignatureAlgorithm::Sha256WithRSA,
            KeyPair::EcdsaP256 { .. } => SignatureAlgorithm::Sha256WithECDSA,
            KeyPair::EcdsaP384 { .. } => SignatureAlgorithm::Sha384WithECDSA,
            KeyPair::EcdsaP521 { .. } => SignatureAlgorithm::Sha512WithECDSA,
            KeyPair::Ed25519 { .. } => SignatureAlgorithm::Ed25519,
        }
    }

    /// DER-encoded `SubjectPublicKeyInfo` of the public half.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        let document = match self {
            KeyPair::Rsa { public, .. } => public.to_public_key_der(),
            KeyPair::EcdsaP256 { verifying_key, .. } => verifying_key.to_public_key_der(),
            KeyPair::EcdsaP384 { verifying_key, .. } => verifying_key.to_public_key_der(),
            KeyPair::EcdsaP521 { public_key, .. } => public_key.to_public_key_der(),
            KeyPair::Ed25519 { signing_key } => signing_key.verifying_key().to_public_key_der(),
        }
        .map_err(|e| TlsUtilsError::EncodingError(e.to_string()))?;
        Ok(document.as_bytes().to_vec())
    }

    /// Signs `data` and returns the signature in its X.509 encoding: raw for
    /// RSA and Ed25519, a DER `Ecdsa-Sig-Value` for ECDSA.
    pub fn sign_data(&self, data: &[u8]) -> Result<Vec<u8>> {
        let sign_error = |e: rsa::signature::Error| TlsUtilsError::CrlBuildError(e.to_string());
        match self {
            KeyPair::Rsa { private, .. } => {
                let signing_key: RsaSigningKey<Sha256> = RsaSigningKey::new(*private.clone());
                let signature = signing_key
                    .try_sign_with_rng(&mut OsRng, data)
                    .map_err(sign_error)?;
                Ok(signature.to_vec())
            }
            KeyPair::EcdsaP256 { signing_key, .. } => {
                let signature: p256::ecdsa::Signature = signing_key
                    .try_sign_with_rng(&mut OsRng, data)
                    .map_err(sign_error)?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
            KeyPair::EcdsaP384 { signing_key, .. } => {
                let signature: p384::ecdsa::Signature = signing_key
                    .try_sign_with_rng(&mut OsRng, data)
                    .map_err(sign_error)?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
            // P-521 signs deterministically (RFC 6979) with SHA-512.
            KeyPair::EcdsaP521 { signing_key, .. } => {
                let signature: p521::ecdsa::Signature =
                    signing_key.try_sign(data).map_err(sign_error)?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
            KeyPair::Ed25519 { signing_key } => {
                let signature = ed25519_dalek::Signer::sign(signing_key, data);
                Ok(signature.to_bytes().to_vec())
            }
        }
    }
}

fn unsupported_curve(oid: ObjectIdentifier) -> TlsUtilsError {
    TlsUtilsError::KeyParseError(format!(
        "unsupported ECDSA curve {oid}; supported curves are {}, {}, {}",
        EcdsaCurve::P256,
        EcdsaCurve::P384,
        EcdsaCurve::P521
    ))
}

/// Decodes a PEM private key into a signing key plus the PEM sub-kind it was
/// encoded as.
///
/// Accepts PKCS#8 (`PRIVATE KEY`), PKCS#1 (`RSA PRIVATE KEY`) and SEC1
/// (`EC PRIVATE KEY`). OpenSSH keys and password-protected blocks are
/// rejected because they cannot be used for signing here.
pub fn parse_private_key_pem(data: impl AsRef<[u8]>) -> Result<(KeyPair, PemPreamble)> {
    let block = decode_pem_block(data).map_err(key_error)?;
    let preamble = classify(&block).map_err(key_error)?;

    if block.headers().get("Proc-Type").is_some() {
        return Err(TlsUtilsError::KeyParseError(
            "encrypted private key PEM blocks are not supported".to_string(),
        ));
    }

    let key = match preamble {
        PemPreamble::PrivateKeyPkcs8 => KeyPair::import_from_pkcs8_der(block.contents())?,
        PemPreamble::PrivateKeyRsa => KeyPair::import_from_pkcs1_der(block.contents())?,
        PemPreamble::PrivateKeyEc => KeyPair::import_from_sec1_der(block.contents())?,
        other => {
            return Err(TlsUtilsError::KeyParseError(format!(
                "\"{other}\" is not a supported signing key type"
            )));
        }
    };

    Ok((key, preamble))
}
