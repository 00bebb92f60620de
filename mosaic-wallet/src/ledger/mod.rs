//! Ledger collaborator
//!
//! Everything cryptographic or network-bound sits behind [`Ledger`]: wallet
//! creation and opening, balance queries, transfer previews and
//! submission. The command flows only sequence calls to it, so they can run
//! against [`nis::NisLedger`] or a substitute in tests.

pub mod nis;
pub mod rpc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WalletError;
use crate::keys::{AccountKeys, Address};
use crate::keystore::WalletBlob;

/// NIS announce code for an accepted transaction
const ANNOUNCE_SUCCESS: u32 = 1;

/// Fully qualified mosaic id (`namespace:name`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicId {
    pub namespace_id: String,
    pub name: String,
}

impl MosaicId {
    pub fn new(namespace_id: &str, name: &str) -> Self {
        Self {
            namespace_id: namespace_id.to_string(),
            name: name.to_string(),
        }
    }

    /// The native ledger currency
    pub fn xem() -> Self {
        Self::new("nem", "xem")
    }
}

impl fmt::Display for MosaicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace_id, self.name)
    }
}

/// One mosaic owned by an account, in micro-units
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicHolding {
    pub mosaic_id: MosaicId,
    pub quantity: u64,
}

/// Balance snapshot in micro-units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Balances {
    pub xem: u64,
    pub mosaic: u64,
}

impl Balances {
    /// Pick XEM and `mosaic` out of an account's holdings; absent means 0.
    pub fn from_holdings(holdings: &[MosaicHolding], mosaic: &MosaicId) -> Self {
        let quantity_of = |id: &MosaicId| {
            holdings
                .iter()
                .filter(|h| &h.mosaic_id == id)
                .map(|h| h.quantity)
                .sum::<u64>()
        };

        Self {
            xem: quantity_of(&MosaicId::xem()),
            mosaic: quantity_of(mosaic),
        }
    }
}

/// A decrypted account, held for one command invocation.
#[derive(Debug, Clone)]
pub struct UnlockedAccount {
    keys: AccountKeys,
}

impl UnlockedAccount {
    pub fn new(keys: AccountKeys) -> Self {
        Self { keys }
    }

    pub fn address(&self) -> Address {
        self.keys.address()
    }

    pub fn public_key_hex(&self) -> String {
        self.keys.public_key_hex()
    }

    /// Private key hex; only ever displayed when a wallet is created
    pub fn private_key_hex(&self) -> zeroize::Zeroizing<String> {
        self.keys.private_key_hex()
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.keys.sign(message)
    }
}

/// A validated transfer of the wallet's mosaic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Micro-units of the mosaic
    pub amount: u64,
    /// Recipient address, passed through to the ledger unchanged
    pub recipient: String,
}

/// A transfer built for the signing account, shown before confirmation.
///
/// The bytes in `data` are exactly what gets signed once the user agrees,
/// so the fee on screen is the fee announced.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransferPreview {
    /// Network fee in XEM micro-units
    pub fee: u64,
    /// Serialized transaction (hex)
    pub data: String,
}

/// Outcome of announcing a transaction
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnounceResult {
    pub code: u32,
    #[serde(rename = "type")]
    pub kind: u32,
    pub message: String,
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

impl AnnounceResult {
    pub fn is_success(&self) -> bool {
        self.code == ANNOUNCE_SUCCESS
    }
}

impl fmt::Display for AnnounceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)?;
        if let Some(hash) = &self.transaction_hash {
            write!(f, "\nTransaction hash: {}", hash)?;
        }
        Ok(())
    }
}

/// Capabilities the wallet needs from the ledger.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Create a new encrypted wallet named `name`
    fn create_wallet(&self, name: &str, password: &str) -> Result<WalletBlob>;

    /// Decrypt a wallet; a bad password or corrupt blob is
    /// [`WalletError::Decryption`]
    fn open_wallet(&self, blob: &WalletBlob, password: &str)
        -> Result<UnlockedAccount, WalletError>;

    /// XEM and mosaic balances for an address
    async fn balances(&self, address: &Address) -> Result<Balances>;

    /// Build the transfer `account` would sign, with its fee
    async fn prepare_transfer(
        &self,
        request: &TransferRequest,
        account: &UnlockedAccount,
    ) -> Result<TransferPreview>;

    /// Sign and announce a previewed transfer, unchanged
    async fn send_mosaic(
        &self,
        request: &TransferRequest,
        preview: &TransferPreview,
        account: &UnlockedAccount,
    ) -> Result<AnnounceResult>;
}
