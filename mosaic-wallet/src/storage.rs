//! Wallet Storage
//!
//! Owns the on-disk layout: `<wallets dir>/<name>-wallet.wlt`. Wallet files
//! are write-once; a new wallet never replaces an existing file.

use anyhow::Result;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::MosaicSettings;
use crate::error::WalletError;
use crate::keystore::WalletBlob;

/// Timestamp prefix for wallets saved next to an existing default wallet
/// (ISO 8601 basic format, safe in file names on every platform)
const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.3fZ";

/// Wallet file store
#[derive(Debug, Clone)]
pub struct WalletStore {
    dir: PathBuf,
    file_name: String,
}

impl WalletStore {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    /// Store for the configured mosaic
    pub fn from_settings(settings: &MosaicSettings) -> Result<Self> {
        Ok(Self::new(settings.wallets_dir()?, settings.wallet_file_name()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the default wallet
    pub fn default_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Check if the default wallet exists
    pub fn exists(&self) -> bool {
        self.default_path().exists()
    }

    /// Fail with a locating error when there is no default wallet
    pub fn require_existing(&self) -> Result<(), WalletError> {
        if self.exists() {
            Ok(())
        } else {
            Err(WalletError::WalletNotFound {
                file: self.file_name.clone(),
                path: self.default_path(),
            })
        }
    }

    /// Save a new wallet, returning the path it was written to.
    ///
    /// The default path is used when free; otherwise the file name gets a
    /// timestamp prefix.
    pub fn save(&self, blob: &WalletBlob) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let default_path = self.default_path();
        match write_new(&default_path, blob.as_bytes()) {
            Ok(()) => return Ok(default_path),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!("{} exists, saving under a timestamped name", default_path.display());
            }
            Err(e) => return Err(e.into()),
        }

        let stamp = chrono::Utc::now().format(STAMP_FORMAT);
        let path = self.dir.join(format!("{}-{}", stamp, self.file_name));
        write_new(&path, blob.as_bytes())?;

        Ok(path)
    }

    /// Load the default wallet
    pub fn load(&self) -> Result<WalletBlob> {
        let path = self.default_path();
        match fs::read(&path) {
            Ok(bytes) => Ok(WalletBlob::from_bytes(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(WalletError::WalletNotFound {
                file: self.file_name.clone(),
                path,
            }
            .into()),
            Err(e) => Err(anyhow::anyhow!("Failed to read wallet file: {}", e)),
        }
    }
}

/// Write a file that must not exist yet, with restricted permissions
fn write_new(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
