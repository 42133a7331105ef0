//! Test account provisioning
//!
//! A [`TestAccount`] is a freshly generated ed25519 keypair together with the
//! ledger address derived from its public key. Accounts are created once per
//! workflow invocation and never persisted.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Scheme flag hashed in front of the public key during address derivation.
const ED25519_SCHEME_FLAG: u8 = 0x00;

/// A ledger address: `0x` followed by 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerAddress(String);

impl LedgerAddress {
    /// Derive the address deterministically from an ed25519 public key.
    pub fn from_public_key(key: &VerifyingKey) -> Self {
        let mut hasher = Sha256::new();
        hasher.update([ED25519_SCHEME_FLAG]);
        hasher.update(key.as_bytes());
        Self(format!("0x{}", hex::encode(hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LedgerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A provisioned test account: keypair plus derived address.
pub struct TestAccount {
    keypair: SigningKey,
    address: LedgerAddress,
}

impl TestAccount {
    /// Generate a fresh keypair and derive its address. No network I/O.
    pub fn generate() -> Self {
        let keypair = SigningKey::generate(&mut OsRng);
        let address = LedgerAddress::from_public_key(&keypair.verifying_key());
        Self { keypair, address }
    }

    pub fn address(&self) -> &LedgerAddress {
        &self.address
    }

    pub fn public_key(&self) -> VerifyingKey {
        self.keypair.verifying_key()
    }

    /// Sign a message with the account's private key.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.keypair.sign(message)
    }
}

impl std::fmt::Debug for TestAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose key material in logs
        f.debug_struct("TestAccount")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
