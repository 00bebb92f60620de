//! Key Management
//!
//! Ed25519 account keys and NEM addresses.
//!
//! Security: the private key lives in an `ed25519_dalek::SigningKey`, which
//! zeroizes itself on drop. Hex renderings of the key are handed out in
//! `Zeroizing<String>` wrappers so they do not outlive their use.

use anyhow::{anyhow, Result};
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use ripemd::Ripemd160;
use sha3::{Digest, Keccak256};
use std::fmt;
use zeroize::Zeroizing;

use crate::config::Network;

/// Raw address length: version byte, 20-byte key hash, 4-byte checksum
const ADDRESS_BYTES: usize = 25;

/// Characters per group in the dashed address form
const PRETTY_GROUP: usize = 6;

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Account keys for one wallet.
#[derive(Clone)]
pub struct AccountKeys {
    signing_key: SigningKey,
    network: Network,
}

impl fmt::Debug for AccountKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountKeys")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl AccountKeys {
    /// Generate a new random account
    pub fn generate(network: Network) -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
            network,
        }
    }

    /// Restore an account from its 32-byte private key
    pub fn from_private_key(bytes: &[u8], network: Network) -> Result<Self> {
        let secret: [u8; 32] = bytes
            .try_into()
            .map_err(|_| anyhow!("Private key must be 32 bytes, got {}", bytes.len()))?;
        let secret = Zeroizing::new(secret);

        Ok(Self {
            signing_key: SigningKey::from_bytes(&secret),
            network,
        })
    }

    /// Private key bytes
    pub fn private_key_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }

    /// Private key as lowercase hex
    pub fn private_key_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.private_key_bytes().as_slice()))
    }

    /// Public key bytes
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Public key as lowercase hex
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key_bytes())
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Address for this account on its network
    pub fn address(&self) -> Address {
        Address::from_public_key(&self.public_key_bytes(), self.network)
    }

    /// Sign a message, returning the 64-byte signature
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

/// A NEM account address (40 base32 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Derive an address from a public key: RIPEMD-160 of the Keccak-256
    /// key hash, behind the network version byte.
    pub fn from_public_key(public_key: &[u8; 32], network: Network) -> Self {
        let key_hash = Ripemd160::digest(Keccak256::digest(public_key));

        let mut raw = Vec::with_capacity(ADDRESS_BYTES);
        raw.push(network.address_version());
        raw.extend_from_slice(&key_hash);

        let checksum = Keccak256::digest(&raw);
        raw.extend_from_slice(&checksum[..4]);

        Self(base32_encode(&raw))
    }

    /// Plain form, as sent to the ledger
    pub fn plain(&self) -> &str {
        &self.0
    }

    /// Dash-separated form, as shown to the user
    pub fn pretty(&self) -> String {
        self.0
            .as_bytes()
            .chunks(PRETTY_GROUP)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// RFC 4648 base32 without padding
fn base32_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits = 0;

    for &byte in data {
        buffer = (buffer << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(BASE32_ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(BASE32_ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }

    out
}
