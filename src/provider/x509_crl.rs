use std::fmt;

use serde::{Deserialize, Serialize};

use super::Resource;
use super::schema::{FieldSchema, ResourceSchema};
use crate::crl::{crl_identity, synthesize_crl};
use crate::error::Result;
use crate::identity::requires_refresh;

/// `tlsutils_x509_crl`: a CRL signed by an issuer certificate's key.
#[derive(Debug, Clone, Copy)]
pub struct X509Crl;

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct X509CrlConfig {
    pub private_key_pem: String,
    pub certificate_pem: String,
    pub revocation_list: Vec<String>,
}

impl fmt::Debug for X509CrlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("X509CrlConfig")
            .field("private_key_pem", &"<redacted>")
            .field("certificate_pem", &self.certificate_pem)
            .field("revocation_list", &self.revocation_list.len())
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct X509CrlState {
    pub id: String,
    pub crl_pem: String,
}

impl Resource for X509Crl {
    const SCHEMA: ResourceSchema = ResourceSchema {
        type_name: "tlsutils_x509_crl",
        description: "Generate an X.509 CRL",
        fields: &[
            FieldSchema::input("private_key_pem", "Issuer private key in PEM format.").sensitive(),
            FieldSchema::input("certificate_pem", "Issuer certificate in PEM format."),
            FieldSchema::input("revocation_list", "Revoked certificates in PEM format.").list(),
            FieldSchema::computed("crl_pem", "CRL in PEM format."),
            FieldSchema::computed("id", "SHA-1 of the inputs, base64 encoded."),
        ],
    };

    type Config = X509CrlConfig;
    type State = X509CrlState;

    #[tracing::instrument(skip_all)]
    fn create(config: &X509CrlConfig) -> Result<X509CrlState> {
        let artifact = synthesize_crl(
            &config.private_key_pem,
            &config.certificate_pem,
            &config.revocation_list,
        )?;
        let state = X509CrlState {
            id: artifact.identity.to_base64(),
            crl_pem: artifact.crl_pem,
        };
        tracing::info!(
            id = %state.id,
            revoked = config.revocation_list.len(),
            "CRL created"
        );
        Ok(state)
    }

    /// Keeps the stored CRL while the inputs hash to the stored id.
    #[tracing::instrument(skip_all)]
    fn read(config: &X509CrlConfig, state: &X509CrlState) -> Result<X509CrlState> {
        let current = crl_identity(
            &config.private_key_pem,
            &config.certificate_pem,
            &config.revocation_list,
        );
        if !requires_refresh(&state.id, &current.to_base64()) {
            tracing::debug!(id = %state.id, "CRL inputs unchanged");
            return Ok(state.clone());
        }
        tracing::info!(stored = %state.id, "CRL inputs changed, regenerating");
        Self::create(config)
    }
}
