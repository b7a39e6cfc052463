//! Resources exposed to an infrastructure orchestration host.
//!
//! Each resource turns a typed configuration into a typed state. The host
//! owns persistence and calls [`Resource::create`] once, [`Resource::read`]
//! on every refresh and [`Resource::delete`] when the resource is removed.
//! Every input forces replacement, so there is no update operation.

pub mod encrypted_pem;
pub mod schema;
pub mod x509_crl;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
pub use encrypted_pem::{EncryptedPem, EncryptedPemConfig, EncryptedPemState};
use schema::ResourceSchema;
pub use x509_crl::{X509Crl, X509CrlConfig, X509CrlState};

/// Every resource this provider registers, read by the host at startup.
pub static RESOURCES: &[&ResourceSchema] = &[&EncryptedPem::SCHEMA, &X509Crl::SCHEMA];

/// Looks up a registered resource by its type name.
pub fn resource(type_name: &str) -> Option<&'static ResourceSchema> {
    RESOURCES
        .iter()
        .copied()
        .find(|schema| schema.type_name == type_name)
}

pub trait Resource {
    const SCHEMA: ResourceSchema;

    /// Host-supplied inputs.
    type Config: DeserializeOwned;

    /// Persisted outputs. The default value is the state of a deleted
    /// resource.
    type State: Serialize + DeserializeOwned + Clone + Default;

    fn create(config: &Self::Config) -> Result<Self::State>;

    /// Brings `state` in line with `config`.
    fn read(config: &Self::Config, state: &Self::State) -> Result<Self::State>;

    /// Nothing exists outside the host's state, so deleting only clears it.
    fn delete(_state: Self::State) -> Self::State {
        tracing::info!(resource = Self::SCHEMA.type_name, "deleted");
        Self::State::default()
    }
}
