use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512_256};
use std::fmt;

use crate::transaction::ApplicationId;

const CHECKSUM_LEN: usize = 4;
const APP_ID_PREFIX: &[u8] = b"appID";

/// An account address in its textual (checksummed base32) form.
///
/// Addresses are compared verbatim; the layout engine never decodes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Encodes a 32-byte public key as `base32(key || checksum)` without padding, where the
    /// checksum is the last four bytes of `sha512_256(key)`.
    pub fn from_public_key(public_key: &[u8; 32]) -> Self {
        let digest = Sha512_256::digest(public_key);
        let mut bytes = Vec::with_capacity(public_key.len() + CHECKSUM_LEN);
        bytes.extend_from_slice(public_key);
        bytes.extend_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
        Self(BASE32_NOPAD.encode(&bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derives the implicit account address owned by an application.
///
/// The derivation is chain-specific; layout code only requires that it is pure and
/// deterministic for a given application id.
pub trait AppAddressResolver {
    fn app_address(&self, application_id: ApplicationId) -> Address;
}

impl<F> AppAddressResolver for F
where
    F: Fn(ApplicationId) -> Address,
{
    fn app_address(&self, application_id: ApplicationId) -> Address {
        self(application_id)
    }
}

/// Mainnet/testnet derivation: `sha512_256("appID" || big_endian_u64(id))` used as the public key.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainAppAddress;

impl AppAddressResolver for ChainAppAddress {
    fn app_address(&self, application_id: ApplicationId) -> Address {
        let mut hasher = Sha512_256::new();
        hasher.update(APP_ID_PREFIX);
        hasher.update(application_id.to_be_bytes());
        let digest = hasher.finalize();
        let mut public_key = [0u8; 32];
        public_key.copy_from_slice(&digest);
        Address::from_public_key(&public_key)
    }
}
