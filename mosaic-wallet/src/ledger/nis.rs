//! NEM ledger backed by the local keystore and a wallet gateway.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use super::rpc::RpcPool;
use super::{
    AnnounceResult, Balances, Ledger, MosaicId, TransferPreview, TransferRequest, UnlockedAccount,
};
use crate::config::{MosaicSettings, Network};
use crate::error::WalletError;
use crate::keys::{AccountKeys, Address};
use crate::keystore::{EncryptedWallet, WalletBlob};

pub struct NisLedger {
    rpc: RpcPool,
    mosaic: MosaicId,
    network: Network,
}

impl NisLedger {
    pub fn new(settings: &MosaicSettings) -> Result<Self> {
        Ok(Self {
            rpc: RpcPool::new(&settings.endpoints)?,
            mosaic: settings.mosaic_id(),
            network: settings.network,
        })
    }
}

#[async_trait]
impl Ledger for NisLedger {
    fn create_wallet(&self, name: &str, password: &str) -> Result<WalletBlob> {
        let keys = AccountKeys::generate(self.network);
        let wallet = EncryptedWallet::encrypt(name, &keys, password)?;
        info!("Created {} wallet for {}", self.network.as_str(), keys.address());
        wallet.to_blob()
    }

    fn open_wallet(
        &self,
        blob: &WalletBlob,
        password: &str,
    ) -> Result<UnlockedAccount, WalletError> {
        let wallet = EncryptedWallet::from_blob(blob)
            .map_err(|e| WalletError::Decryption(e.to_string()))?;
        let keys = wallet
            .decrypt(password)
            .map_err(|e| WalletError::Decryption(e.to_string()))?;
        Ok(UnlockedAccount::new(keys))
    }

    async fn balances(&self, address: &Address) -> Result<Balances> {
        let holdings = self.rpc.mosaics_owned(address.plain()).await?;
        debug!("{} holds {} mosaics", address, holdings.len());
        Ok(Balances::from_holdings(&holdings, &self.mosaic))
    }

    async fn prepare_transfer(
        &self,
        request: &TransferRequest,
        account: &UnlockedAccount,
    ) -> Result<TransferPreview> {
        let preview = self
            .rpc
            .prepare_transfer(
                &request.recipient,
                &self.mosaic,
                request.amount,
                &account.public_key_hex(),
            )
            .await?;
        debug!("Prepared transfer to {} with fee {}", request.recipient, preview.fee);
        Ok(preview)
    }

    async fn send_mosaic(
        &self,
        request: &TransferRequest,
        preview: &TransferPreview,
        account: &UnlockedAccount,
    ) -> Result<AnnounceResult> {
        let bytes = hex::decode(&preview.data)
            .map_err(|_| anyhow!("Gateway returned malformed transaction data"))?;
        let signature = account.sign(&bytes);

        let result = self.rpc.announce(&preview.data, &hex::encode(signature)).await?;
        info!("Announced transfer to {}: {}", request.recipient, result.message);
        Ok(result)
    }
}
