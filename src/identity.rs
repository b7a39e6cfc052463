//! Content-addressed resource identity.
//!
//! An [`Identity`] is the SHA-1 digest of the ordered concatenation of a
//! resource's inputs. The orchestration host stores it next to the computed
//! artifact and compares it on the next evaluation to decide whether the
//! inputs changed.
//!
//! This is a change detector only. SHA-1 collisions are practical to
//! construct and are accepted here; nothing relies on the identity for
//! integrity or authenticity.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha1::{Digest, Sha1};

/// A 20-byte SHA-1 content hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity([u8; 20]);

impl Identity {
    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase hexadecimal rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Standard, padded base64 rendering.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.to_hex())
    }
}

/// Incremental form of [`hash`].
#[derive(Clone, Default)]
pub struct IdentityHasher {
    inner: Sha1,
}

impl IdentityHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one part. Parts are concatenated without separators.
    pub fn update(&mut self, part: impl AsRef<[u8]>) -> &mut Self {
        self.inner.update(part.as_ref());
        self
    }

    pub fn finish(self) -> Identity {
        Identity(self.inner.finalize().into())
    }
}

/// Hashes the ordered concatenation of `parts`.
///
/// Parts are not delimited, so only the concatenated bytes count:
/// `hash(["x", "xx"])` equals `hash(["xx", "x"])`. Swapping two distinct
/// parts of equal length does change the digest.
pub fn hash<I, P>(parts: I) -> Identity
where
    I: IntoIterator<Item = P>,
    P: AsRef<[u8]>,
{
    let mut hasher = IdentityHasher::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finish()
}

/// Read-check for resources that only recompute on input change.
///
/// Returns `true` when the identity stored by the host no longer matches the
/// identity of the current inputs, or when nothing has been stored yet.
pub fn requires_refresh(stored_id: &str, current: &str) -> bool {
    stored_id.is_empty() || stored_id != current
}
