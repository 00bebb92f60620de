//! Encrypted Wallet Format
//!
//! A `.wlt` file is the base64 encoding of a JSON document holding the
//! account's private key encrypted with:
//! - Argon2id for password-based key derivation
//! - ChaCha20-Poly1305 for authenticated encryption
//!
//! The address and network are stored in clear so a decrypted key can be
//! checked against what the wallet claims to be.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

use crate::config::Network;
use crate::keys::AccountKeys;

/// Current wallet file format version
const WALLET_VERSION: u32 = 1;

/// Argon2 parameters (tuned for security vs. usability)
const ARGON2_MEMORY_KB: u32 = 65536; // 64 MB
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 4;

/// Opaque wallet bytes, exactly as stored on disk.
#[derive(Clone, PartialEq, Eq)]
pub struct WalletBlob(Vec<u8>);

impl WalletBlob {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for WalletBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletBlob({} bytes)", self.0.len())
    }
}

/// Encrypted wallet document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedWallet {
    /// File format version
    version: u32,

    /// Wallet name (the mosaic it was created for)
    pub name: String,

    /// Network the address belongs to
    pub network: Network,

    /// Plain address of the encrypted key
    pub address: String,

    /// Argon2 salt (base64, PHC format)
    salt: String,

    /// ChaCha20-Poly1305 nonce (12 bytes, hex encoded)
    nonce: String,

    /// Encrypted private key (hex encoded)
    ciphertext: String,

    /// Creation time (RFC 3339)
    pub created_at: String,
}

impl EncryptedWallet {
    /// Encrypt account keys under a password
    pub fn encrypt(name: &str, keys: &AccountKeys, password: &str) -> Result<Self> {
        // Generate random salt for Argon2
        let salt = SaltString::generate(&mut OsRng);

        // Derive encryption key from password
        let key = derive_key(password, salt.as_str())?;

        // Generate random nonce
        let mut nonce_bytes = [0u8; 12];
        rand::thread_rng().fill(&mut nonce_bytes);

        let cipher = ChaCha20Poly1305::new_from_slice(key.as_slice())
            .map_err(|_| anyhow!("Failed to create cipher"))?;

        let nonce = Nonce::from_slice(&nonce_bytes);
        let ciphertext = cipher
            .encrypt(nonce, keys.private_key_bytes().as_slice())
            .map_err(|_| anyhow!("Encryption failed"))?;

        Ok(Self {
            version: WALLET_VERSION,
            name: name.to_string(),
            network: keys.network(),
            address: keys.address().plain().to_string(),
            salt: salt.to_string(),
            nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(ciphertext),
            created_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Decrypt the wallet to retrieve the account keys
    pub fn decrypt(&self, password: &str) -> Result<AccountKeys> {
        if self.version != WALLET_VERSION {
            return Err(anyhow!(
                "Unsupported wallet version: {} (expected {})",
                self.version,
                WALLET_VERSION
            ));
        }

        let key = derive_key(password, &self.salt)?;

        let nonce_bytes = hex::decode(&self.nonce).map_err(|_| anyhow!("Invalid nonce format"))?;
        let ciphertext =
            hex::decode(&self.ciphertext).map_err(|_| anyhow!("Invalid ciphertext format"))?;

        if nonce_bytes.len() != 12 {
            return Err(anyhow!("Invalid nonce length"));
        }

        let cipher = ChaCha20Poly1305::new_from_slice(key.as_slice())
            .map_err(|_| anyhow!("Failed to create cipher"))?;

        let nonce = Nonce::from_slice(&nonce_bytes);
        let plaintext = Zeroizing::new(
            cipher
                .decrypt(nonce, ciphertext.as_slice())
                .map_err(|_| anyhow!("Decryption failed - wrong password?"))?,
        );

        let keys = AccountKeys::from_private_key(&plaintext, self.network)?;
        if keys.address().plain() != self.address {
            return Err(anyhow!("Wallet address does not match its private key"));
        }

        Ok(keys)
    }

    /// Serialize to the on-disk blob
    pub fn to_blob(&self) -> Result<WalletBlob> {
        let json = serde_json::to_vec(self)?;
        Ok(WalletBlob(STANDARD.encode(json).into_bytes()))
    }

    /// Parse an on-disk blob
    pub fn from_blob(blob: &WalletBlob) -> Result<Self> {
        let text = std::str::from_utf8(blob.as_bytes())
            .map_err(|_| anyhow!("Wallet file is not valid text"))?;
        let json = STANDARD
            .decode(text.trim())
            .map_err(|e| anyhow!("Failed to decode wallet file: {}", e))?;
        serde_json::from_slice(&json).map_err(|e| anyhow!("Failed to parse wallet file: {}", e))
    }
}

/// Derive a 32-byte encryption key from password using Argon2id
fn derive_key(password: &str, salt: &str) -> Result<Zeroizing<[u8; 32]>> {
    let salt = SaltString::from_b64(salt).map_err(|_| anyhow!("Invalid salt format"))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2::Params::new(
            ARGON2_MEMORY_KB,
            ARGON2_ITERATIONS,
            ARGON2_PARALLELISM,
            Some(32),
        )
        .map_err(|_| anyhow!("Invalid Argon2 parameters"))?,
    );

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| anyhow!("Key derivation failed"))?;

    let hash_output = hash.hash.ok_or_else(|| anyhow!("No hash output"))?;
    let hash_bytes = hash_output.as_bytes();

    let mut key = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&hash_bytes[..32]);

    Ok(key)
}
