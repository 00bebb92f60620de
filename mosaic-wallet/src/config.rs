//! Mosaic settings
//!
//! A single TOML file names the mosaic this wallet is specialized for. The
//! name drives the wallet paths and every user-facing string.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::WalletError;
use crate::ledger::MosaicId;

/// Settings file looked up in the working directory when none is given
pub const DEFAULT_SETTINGS_FILE: &str = "mosaic-settings.toml";

/// NEM network the wallet talks to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// Address version byte ('N' prefix on mainnet, 'T' on testnet)
    pub fn address_version(self) -> u8 {
        match self {
            Network::Mainnet => 0x68,
            Network::Testnet => 0x98,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }
}

/// Wallet settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MosaicSettings {
    /// Mosaic display name (also the mosaic name inside its namespace)
    #[serde(default = "default_mosaic_name")]
    pub mosaic_name: String,

    /// Namespace the mosaic is defined in
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Network for address derivation
    #[serde(default)]
    pub network: Network,

    /// Wallet gateway endpoints, tried in order
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,

    /// Override for `<home>/<name>-wallets`
    #[serde(default)]
    pub wallets_dir: Option<PathBuf>,

    /// Bound on the password/confirmation loop of `wallet create`
    #[serde(default)]
    pub max_password_attempts: Option<u32>,
}

fn default_mosaic_name() -> String {
    "mosaic".to_string()
}

fn default_namespace() -> String {
    "mosaic".to_string()
}

fn default_endpoints() -> Vec<String> {
    vec!["http://127.0.0.1:7890".to_string()]
}

impl Default for MosaicSettings {
    fn default() -> Self {
        Self {
            mosaic_name: default_mosaic_name(),
            namespace: default_namespace(),
            network: Network::default(),
            endpoints: default_endpoints(),
            wallets_dir: None,
            max_password_attempts: None,
        }
    }
}

impl MosaicSettings {
    /// Load settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read settings {}: {}", path.display(), e))?;
        let settings: MosaicSettings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Resolve settings: an explicit path must exist, otherwise the default
    /// file is used when present, otherwise built-in defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let fallback = Path::new(DEFAULT_SETTINGS_FILE);
        if fallback.exists() {
            debug!("Using settings from {}", fallback.display());
            return Self::from_file(fallback);
        }

        debug!("No settings file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<(), WalletError> {
        let name = self.mosaic_name.trim();
        if name.is_empty() {
            return Err(WalletError::InvalidSettings(
                "mosaic_name must not be empty".to_string(),
            ));
        }
        if name.contains(|c: char| c == '/' || c == '\\') {
            return Err(WalletError::InvalidSettings(
                "mosaic_name must not contain path separators".to_string(),
            ));
        }
        if self.namespace.trim().is_empty() {
            return Err(WalletError::InvalidSettings(
                "namespace must not be empty".to_string(),
            ));
        }
        if self.endpoints.is_empty() {
            return Err(WalletError::InvalidSettings(
                "at least one endpoint is required".to_string(),
            ));
        }
        if self.max_password_attempts == Some(0) {
            return Err(WalletError::InvalidSettings(
                "max_password_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The mosaic this wallet holds.
    pub fn mosaic_id(&self) -> MosaicId {
        MosaicId::new(&self.namespace, &self.mosaic_name)
    }

    /// Directory holding wallet files.
    pub fn wallets_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.wallets_dir {
            return Ok(dir.clone());
        }
        let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(home.join(format!("{}-wallets", self.mosaic_name)))
    }

    /// File name of the default wallet.
    pub fn wallet_file_name(&self) -> String {
        format!("{}-wallet.wlt", self.mosaic_name)
    }
}
