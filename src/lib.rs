//! # tlsutils - PEM Key Encryption and CRL Synthesis
//!
//! tlsutils backs two resources of an infrastructure orchestration host,
//! built entirely on RustCrypto libraries:
//!
//! - **Encrypted PEM**: encrypts a PEM private key under a password in the
//!   legacy `Proc-Type: 4,ENCRYPTED` format understood by OpenSSL.
//! - **X.509 CRL**: builds and signs a Certificate Revocation List from an
//!   issuer key, an issuer certificate and the certificates to revoke.
//!
//! Both report a content identity over their inputs so the host can tell
//! whether anything changed since the last evaluation.
//!
//! ## Supported Key Types
//!
//! - **RSA**: PKCS#1 (`RSA PRIVATE KEY`) and PKCS#8 (`PRIVATE KEY`)
//! - **ECDSA**: P-256 and P-384, SEC1 (`EC PRIVATE KEY`) and PKCS#8
//! - **Ed25519**: PKCS#8
//!
//! ## Quick Start
//!
//! ### Encrypting a Private Key
//!
//! ```rust,no_run
//! use tlsutils::encrypted_pem::derive_encrypted_key;
//!
//! # fn main() -> Result<(), tlsutils::error::TlsUtilsError> {
//! let key_pem = std::fs::read_to_string("ca.key").unwrap_or_default();
//! let artifact = derive_encrypted_key(&key_pem, "correct horse")?;
//! println!("{}", artifact.pem);
//! println!("id: {}", artifact.identity.to_hex());
//! # Ok(())
//! # }
//! ```
//!
//! ### Revoking Certificates
//!
//! ```rust,no_run
//! use tlsutils::crl::synthesize_crl;
//!
//! # fn main() -> Result<(), tlsutils::error::TlsUtilsError> {
//! # let (ca_key, ca_cert, leaf) = (String::new(), String::new(), String::new());
//! let artifact = synthesize_crl(&ca_key, &ca_cert, &[leaf])?;
//! for entry in artifact.crl.revoked_entries() {
//!     println!("revoked {:?} at {}", entry.serial_number, entry.revocation_time_utc());
//! }
//! println!("{}", artifact.crl_pem);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is a [`error::TlsUtilsError`]; the first one aborts the
//! operation and no partial output is produced.
//!
//! ```rust
//! use tlsutils::{crl::synthesize_crl, error::TlsUtilsError};
//!
//! match synthesize_crl::<&str>("not a key", "", &[]) {
//!     Err(TlsUtilsError::KeyParseError(msg)) => println!("bad key: {msg}"),
//!     Err(e) => println!("other error: {e}"),
//!     Ok(_) => unreachable!(),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`preamble`]: The recognized PEM labels
//! - [`pem_utils`]: PEM block encoding and decoding
//! - [`key`]: Private key import and signing
//! - [`cert`]: Certificate parsing and X.509 extensions
//! - [`encrypted_pem`]: Password-based PEM encryption
//! - [`crl`]: CRL construction, signing and inspection
//! - [`issuer`]: Entities that sign CRLs
//! - [`identity`]: Content hashes for change detection
//! - [`provider`]: The resources registered with the host
//! - [`error`]: Error types

pub mod cert;
pub mod crl;
pub mod encrypted_pem;
pub mod error;
pub mod identity;
pub mod issuer;
pub mod key;
pub mod pem_utils;
pub mod preamble;
pub mod provider;
