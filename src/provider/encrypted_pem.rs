use std::fmt;

use serde::{Deserialize, Serialize};

use super::Resource;
use super::schema::{FieldSchema, ResourceSchema};
use crate::encrypted_pem::derive_encrypted_key;
use crate::error::Result;

/// `tlsutils_encrypted_pem`: a private key encrypted under a password.
#[derive(Debug, Clone, Copy)]
pub struct EncryptedPem;

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncryptedPemConfig {
    pub pem: String,
    pub password: String,
}

impl fmt::Debug for EncryptedPemConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedPemConfig")
            .field("pem", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPemState {
    pub id: String,
    pub encrypted_pem: String,
}

impl Resource for EncryptedPem {
    const SCHEMA: ResourceSchema = ResourceSchema {
        type_name: "tlsutils_encrypted_pem",
        description: "Encrypt a PEM private key with a password",
        fields: &[
            FieldSchema::input("pem", "Private key in PEM format.").sensitive(),
            FieldSchema::input("password", "Password protecting the key.").sensitive(),
            FieldSchema::computed("encrypted_pem", "Encrypted private key in PEM format.")
                .sensitive(),
            FieldSchema::computed("id", "SHA-1 of the inputs, hex encoded."),
        ],
    };

    type Config = EncryptedPemConfig;
    type State = EncryptedPemState;

    #[tracing::instrument(skip_all)]
    fn create(config: &EncryptedPemConfig) -> Result<EncryptedPemState> {
        let artifact = derive_encrypted_key(&config.pem, &config.password)?;
        let state = EncryptedPemState {
            id: artifact.identity.to_hex(),
            encrypted_pem: artifact.pem,
        };
        tracing::info!(id = %state.id, "encrypted PEM created");
        Ok(state)
    }

    /// Re-encrypts on every read. The id is stable for unchanged inputs,
    /// the ciphertext is not.
    #[tracing::instrument(skip_all)]
    fn read(config: &EncryptedPemConfig, _state: &EncryptedPemState) -> Result<EncryptedPemState> {
        Self::create(config)
    }
}
